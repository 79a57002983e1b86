//! Opcode routing (SPEC_FULL.md §4.3, §4.4).

use crate::config::BootConfig;
use crate::constants::{Opcode, COMMAND_SUCCESS, ERROR_INVALID_COMMAND, HEADER_BYTES};
use crate::frame::Frame;
use crate::handlers;
use crate::nvm::NvmProvider;

/// Executes the opcode already decoded in `frame`, writing the response back
/// into the same buffer and returning its length.
///
/// `RESET_DEVICE` and unrecognized opcodes are handled inline rather than in
/// `handlers`, since neither touches NVM or needs a dedicated unit — per
/// SPEC_FULL.md §4.3 a reset is acknowledged before the caller performs it,
/// and an unknown opcode is answered without ever unlocking anything.
pub fn dispatch<N: NvmProvider>(
    frame: &mut Frame,
    nvm: &mut N,
    cfg: &BootConfig,
    reset_pending: &mut bool,
) -> usize {
    let opcode = frame.opcode();
    log::trace!("dispatching opcode {:?}", opcode);

    match opcode {
        Opcode::ReadVersion => handlers::read_version(frame, cfg, nvm),
        Opcode::ReadFlash => handlers::read_flash(frame, cfg, nvm),
        Opcode::WriteFlash => handlers::write_flash(frame, cfg, nvm),
        Opcode::EraseFlash => handlers::erase_flash(frame, cfg, nvm),
        Opcode::ReadEeData => handlers::read_ee_data(frame, cfg, nvm),
        Opcode::WriteEeData => handlers::write_ee_data(frame, cfg, nvm),
        Opcode::ReadConfig => handlers::read_config(frame, cfg, nvm),
        Opcode::WriteConfig => handlers::write_config(frame, cfg, nvm),
        Opcode::CalcChecksum => handlers::calc_checksum(frame, cfg, nvm),
        Opcode::ResetDevice => {
            *reset_pending = true;
            frame.set_status(COMMAND_SUCCESS);
            HEADER_BYTES + 1
        }
        Opcode::Unknown => {
            log::warn!("unrecognized opcode 0x{:02X}", frame.command());
            frame.set_status(ERROR_INVALID_COMMAND);
            HEADER_BYTES + 1
        }
    }
}
