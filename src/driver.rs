//! Entry decision and command loop (SPEC_FULL.md §4.1, §4.5, §4.6, §4.7).
//!
//! Everything here except [`run`] and [`bootloader_entry`] is a plain
//! function over trait objects, so it is exercised directly by unit tests
//! without a `!`-returning call ever executing. `run`/`bootloader_entry`
//! are thin, untested wrappers around those functions — see SPEC_FULL.md
//! §1.1.

use crate::config::BootConfig;
use crate::constants::HEADER_BYTES;
use crate::dispatch::dispatch;
use crate::frame::Frame;
use crate::nvm::NvmProvider;
use crate::platform::Platform;
use crate::transport::Transport;
use crate::verify::{integrity_check, VerifyResult};

/// Outcome of sampling the entry condition at reset (SPEC_FULL.md §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDecision {
    /// Stay resident and run the command loop.
    EnterBootloader,
    /// Jump straight to the application.
    JumpToApp,
}

/// Decides whether to stay resident, given the entry pin state and the
/// application image's checksum.
///
/// The entry pin always wins: if it is asserted, the bootloader stays
/// resident even over a verified-good image. Otherwise the application
/// region is checksummed via [`integrity_check`]; `Fail` or `Error` forces
/// entry just as much as the pin does (SPEC_FULL.md §4.1 step 4).
pub fn decide_entry<P: Platform, N: NvmProvider>(
    platform: &mut P,
    nvm: &mut N,
    cfg: &BootConfig,
) -> EntryDecision {
    platform.settle_delay();
    if platform.entry_active() {
        log::debug!("entry pin asserted, staying resident");
        return EntryDecision::EnterBootloader;
    }

    let verdict = integrity_check(
        nvm,
        cfg.start_of_app,
        cfg.checksum_length,
        cfg.checksum_address,
        cfg.progmem_size,
    );
    match verdict {
        VerifyResult::Ok => EntryDecision::JumpToApp,
        VerifyResult::Fail => {
            log::debug!("application image checksum mismatch, staying resident");
            EntryDecision::EnterBootloader
        }
        VerifyResult::Error => {
            log::debug!("application image verification parameters invalid, staying resident");
            EntryDecision::EnterBootloader
        }
    }
}

/// Services one request: reads a frame header, conditionally reads its
/// payload, dispatches it, and conditionally writes back a response.
///
/// The header/payload split mirrors the original firmware's byte-at-a-time
/// read loop (it only knows how many payload bytes follow once it has seen
/// `data_length` in the header) while staying a single buffered read per
/// stage, which is observably equivalent for a blocking transport
/// (SPEC_FULL.md §4.5).
pub fn service_one_request<T: Transport, N: NvmProvider>(
    transport: &mut T,
    nvm: &mut N,
    cfg: &BootConfig,
    frame: &mut Frame,
    reset_pending: &mut bool,
) -> Result<(), crate::error::Error> {
    transport.read(&mut frame.raw_mut()[..HEADER_BYTES])?;

    let payload_len = frame.data_length() as usize;
    if payload_len > 0 {
        let end = HEADER_BYTES + payload_len.min(frame.data().len());
        transport.read(&mut frame.raw_mut()[HEADER_BYTES..end])?;
    }

    let response_len = dispatch(frame, nvm, cfg, reset_pending);

    transport.write(&frame.raw()[..response_len])?;
    while !transport.tx_done() {}

    Ok(())
}

/// The resident command loop. Runs until a `RESET_DEVICE` command is
/// serviced, then resets the platform.
///
/// A transport-level `Err` is logged and the read is retried rather than
/// propagated — per SPEC_FULL.md §4.7 a framing glitch on the wire must
/// never abort the session, only a serviced `RESET_DEVICE` ends it.
pub fn run<P: Platform, T: Transport, N: NvmProvider>(
    platform: &mut P,
    transport: &mut T,
    nvm: &mut N,
    cfg: &BootConfig,
) -> ! {
    platform.indicator_on();

    let mut frame = Frame::new();
    let mut reset_pending = false;

    loop {
        match service_one_request(transport, nvm, cfg, &mut frame, &mut reset_pending) {
            Ok(()) => {
                if reset_pending {
                    log::debug!("reset command serviced, resetting");
                    platform.indicator_off();
                    platform.reset();
                }
            }
            Err(err) => {
                log::warn!("transport error, retrying: {err}");
            }
        }
    }
}

/// Top-level entry point: decides whether to stay resident, then either
/// runs the command loop or jumps straight to the application.
pub fn bootloader_entry<P: Platform, T: Transport, N: NvmProvider>(
    platform: &mut P,
    transport: &mut T,
    nvm: &mut N,
    cfg: &BootConfig,
) -> ! {
    match decide_entry(platform, nvm, cfg) {
        EntryDecision::EnterBootloader => {
            if let Err(err) = transport.init() {
                log::warn!("transport init failed, staying resident anyway: {err}");
            }
            run(platform, transport, nvm, cfg)
        }
        EntryDecision::JumpToApp => platform.jump_to_app(),
    }
}
