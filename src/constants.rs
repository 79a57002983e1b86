//! Wire-protocol constants: header geometry, opcodes, and status bytes.
//!
//! These mirror the `#define`s in the original vendor bootloader's
//! `bl_bootload.h` one-for-one; device/part-specific values (flash size,
//! checksum location, …) live in [`crate::config::BootConfig`] instead,
//! since those vary per target and were preprocessor constants only because
//! the original was compiled once per part.

use num_enum::FromPrimitive;

/// Size of the fixed request/response header, in bytes.
pub const HEADER_BYTES: usize = 9;

/// Capacity of the variable-length payload region, in bytes.
///
/// Equal to the flash page/row size on the reference part. Real devices use
/// 128 or 256; this crate is built against 128.
pub const FRAME_DATA_CAPACITY: usize = 128;

/// Total frame buffer size: header + payload + one spare status byte that
/// overlaps `data[0]` on responses with no payload.
pub const FRAME_CAPACITY: usize = HEADER_BYTES + FRAME_DATA_CAPACITY + 1;

/// Minimum erase/write granularity, in bytes. Equal to `FRAME_DATA_CAPACITY`
/// on this family (a write always spans exactly one page).
pub const PAGE_SIZE: u32 = FRAME_DATA_CAPACITY as u32;

/// Firmware version reported by `READ_VERSION`.
pub const MINOR_VERSION: u8 = 0x08;
pub const MAJOR_VERSION: u8 = 0x00;

/// Status byte: command completed successfully.
pub const COMMAND_SUCCESS: u8 = 0x01;
/// Status byte: payload exceeded `FRAME_DATA_CAPACITY`.
pub const COMMAND_OVERLOAD_ERROR: u8 = 0xFC;
/// Status byte: wrong unlock key, or an NVM primitive failed.
pub const COMMAND_PROCESSING_ERROR: u8 = 0xFD;
/// Status byte: address outside the permitted region, or misaligned.
pub const ERROR_ADDRESS_OUT_OF_RANGE: u8 = 0xFE;
/// Status byte: unrecognized opcode.
pub const ERROR_INVALID_COMMAND: u8 = 0xFF;

/// Start-of-text sentinel the transport prefixes onto every response.
pub const SENTINEL: u8 = 0x55;

/// Opcode byte (frame offset 0).
///
/// `FromPrimitive` gives us `Opcode::from(byte)`; any value that doesn't
/// match a known opcode collapses into `Unknown`, mirroring the dispatcher's
/// `default:` branch in the original `switch`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Opcode {
    ReadVersion = 0x00,
    ReadFlash = 0x01,
    WriteFlash = 0x02,
    EraseFlash = 0x03,
    ReadEeData = 0x04,
    WriteEeData = 0x05,
    ReadConfig = 0x06,
    WriteConfig = 0x07,
    CalcChecksum = 0x08,
    ResetDevice = 0x09,
    #[num_enum(default)]
    Unknown = 0xFF,
}
