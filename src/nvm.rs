//! The non-volatile memory provider contract and its unlock-key scope guard
//! (SPEC_FULL.md §2 item 3, §5, §9 "Unlock bracket as scoped acquisition").

use std::ops::{Deref, DerefMut};

/// Outcome of a destructive NVM primitive or of sampling the status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NvmStatus {
    Ok,
    Error,
}

/// Device-specific flash/EEPROM/config-memory primitives.
///
/// Config memory shares `eeprom_read`/`eeprom_write` with EEPROM proper —
/// on this device family the same primitive addresses both regions, per
/// SPEC_FULL.md §4.4 (`READ_CONFIG`/`WRITE_CONFIG`).
pub trait NvmProvider {
    /// Reads a single flash byte.
    fn flash_read(&mut self, address: u32) -> u8;

    /// Erases the page containing `page_address`. `page_address` is always
    /// page-aligned by the caller.
    fn flash_page_erase(&mut self, page_address: u32) -> NvmStatus;

    /// Writes `data` (exactly one page) starting at `page_address`.
    fn flash_row_write(&mut self, page_address: u32, data: &[u8]) -> NvmStatus;

    /// Reads a single EEPROM or config-memory byte.
    fn eeprom_read(&mut self, address: u32) -> u8;

    /// Writes a single EEPROM or config-memory byte.
    fn eeprom_write(&mut self, address: u32, value: u8);

    /// `true` while the last NVM operation is still in progress.
    fn busy(&self) -> bool;

    /// The last operation's status.
    fn status(&self) -> NvmStatus;

    /// Clears the status register.
    fn status_clear(&mut self);

    /// Arms the unlock-key register. Must be called immediately before a
    /// single destructive primitive.
    fn set_key(&mut self, key: u16);

    /// Disarms the unlock-key register.
    fn clear_key(&mut self);
}

/// Scoped unlock bracket: arms the key on construction, disarms it on drop,
/// so every control-flow exit — including an early `return` inside a
/// handler — clears the key exactly once.
pub struct UnlockGuard<'a, N: NvmProvider> {
    nvm: &'a mut N,
}

impl<'a, N: NvmProvider> UnlockGuard<'a, N> {
    pub fn new(nvm: &'a mut N, key: u16) -> Self {
        nvm.set_key(key);
        UnlockGuard { nvm }
    }
}

impl<'a, N: NvmProvider> Deref for UnlockGuard<'a, N> {
    type Target = N;

    fn deref(&self) -> &N {
        self.nvm
    }
}

impl<'a, N: NvmProvider> DerefMut for UnlockGuard<'a, N> {
    fn deref_mut(&mut self) -> &mut N {
        self.nvm
    }
}

impl<'a, N: NvmProvider> Drop for UnlockGuard<'a, N> {
    fn drop(&mut self) {
        self.nvm.clear_key();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingNvm {
        key: Option<u16>,
        key_history: Vec<Option<u16>>,
    }

    impl NvmProvider for RecordingNvm {
        fn flash_read(&mut self, _address: u32) -> u8 {
            0
        }
        fn flash_page_erase(&mut self, _page_address: u32) -> NvmStatus {
            NvmStatus::Ok
        }
        fn flash_row_write(&mut self, _page_address: u32, _data: &[u8]) -> NvmStatus {
            NvmStatus::Ok
        }
        fn eeprom_read(&mut self, _address: u32) -> u8 {
            0
        }
        fn eeprom_write(&mut self, _address: u32, _value: u8) {}
        fn busy(&self) -> bool {
            false
        }
        fn status(&self) -> NvmStatus {
            NvmStatus::Ok
        }
        fn status_clear(&mut self) {}
        fn set_key(&mut self, key: u16) {
            self.key = Some(key);
            self.key_history.push(self.key);
        }
        fn clear_key(&mut self) {
            self.key = None;
            self.key_history.push(self.key);
        }
    }

    #[test]
    fn guard_clears_key_on_normal_drop() {
        let mut nvm = RecordingNvm::default();
        {
            let _guard = UnlockGuard::new(&mut nvm, 0xAA55);
            assert_eq!(nvm.key, Some(0xAA55));
        }
        assert_eq!(nvm.key, None);
    }

    #[test]
    fn guard_clears_key_on_early_return() {
        fn do_erase(nvm: &mut RecordingNvm) -> NvmStatus {
            let mut guard = UnlockGuard::new(nvm, 0xAA55);
            if true {
                return NvmStatus::Error;
            }
            guard.flash_page_erase(0x3000)
        }

        let mut nvm = RecordingNvm::default();
        let _ = do_erase(&mut nvm);
        assert_eq!(nvm.key, None);
        assert_eq!(nvm.key_history, vec![Some(0xAA55), None]);
    }
}
