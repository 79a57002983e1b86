//! Device/part parameterization.
//!
//! The original firmware baked its memory map into preprocessor constants
//! because it was compiled once per part. This crate takes the same values
//! as a runtime [`BootConfig`] so the same core can serve any part in the
//! family by changing one value at startup instead of recompiling.

use crate::constants::PAGE_SIZE;

/// Runtime memory-map and key parameterization for a specific target part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootConfig {
    /// Total program flash size, in bytes.
    pub progmem_size: u32,
    /// First byte of the application region; also the lower bound enforced
    /// on write/erase/config addresses.
    pub start_of_app: u32,
    /// Application reset vector address (equal to `start_of_app` on this
    /// family).
    pub new_reset_vector: u32,
    /// Address of the 2-byte reference checksum placed by the postbuild
    /// step, consumed only by the boot-time integrity check.
    pub checksum_address: u32,
    /// Number of bytes the boot-time integrity check sums over, starting at
    /// `start_of_app`.
    pub checksum_length: u32,
    /// Base address of the 4-byte user-ID region read by `READ_VERSION`.
    pub user_id_start: u32,
    /// Base address of the 2-byte device ID read by `READ_VERSION`.
    pub device_id_start: u32,
    /// First byte of the EEPROM address range.
    pub eeprom_start: u32,
    /// Size of the EEPROM address range, in bytes.
    pub eeprom_size: u32,
    /// Base address of device configuration memory (documentation only;
    /// `READ_CONFIG`/`WRITE_CONFIG` bound addresses against
    /// `new_reset_vector`, not this value — see DESIGN.md).
    pub config_bytes_start: u32,
    /// 16-bit value that must be presented to unlock destructive operations.
    pub unlock_key: u16,
}

impl BootConfig {
    /// Address of the single persisted firmware-upgrade status byte.
    pub fn status_address(&self) -> u32 {
        self.progmem_size - 2
    }

    /// `PROGMEM_SIZE / PAGE_SIZE`, reported by `READ_VERSION` as the maximum
    /// packet size in pages.
    pub fn max_packet_size(&self) -> u32 {
        self.progmem_size / PAGE_SIZE
    }
}

impl Default for BootConfig {
    /// Defaults for a 64KiB-flash part with a 128-byte page, matching the
    /// reference memory map in SPEC_FULL.md §6.
    fn default() -> Self {
        BootConfig {
            progmem_size: 0x1_0000,
            start_of_app: 0x3000,
            new_reset_vector: 0x3000,
            checksum_address: 0x1_0000 - 4,
            checksum_length: 0x1_0000 - 0x3000 - 4,
            user_id_start: 0x20_0000,
            device_id_start: 0x3F_FFFE,
            eeprom_start: 0x38_0000,
            eeprom_size: 0x400,
            config_bytes_start: 0x30_0000,
            unlock_key: 0xAA55,
        }
    }
}
