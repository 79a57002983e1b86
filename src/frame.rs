//! The protocol frame: a fixed-capacity buffer shared by the request and
//! the response, plus byte-offset field accessors over it.
//!
//! Layout (see SPEC_FULL.md §3):
//!
//! ```text
//! offset  field          size
//! 0       command        1
//! 1..3    data_length    2 (LE)
//! 3       unlock_key_lo  1
//! 4       unlock_key_hi  1
//! 5       address_lo     1
//! 6       address_hi     1
//! 7       address_up     1
//! 8       address_ext    1
//! 9..     data           <= FRAME_DATA_CAPACITY
//! ```

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::{Opcode, FRAME_CAPACITY, HEADER_BYTES};

/// A single request/response frame buffer.
///
/// Only one frame is ever in flight: the same buffer is read into, mutated
/// in place by a handler, and written back out, preserving the
/// single-frame-in-flight invariant without needing `static mut` storage —
/// the caller owns one `Frame` value for the lifetime of the command loop.
pub struct Frame {
    buf: [u8; FRAME_CAPACITY],
}

impl Frame {
    pub fn new() -> Self {
        Frame {
            buf: [0u8; FRAME_CAPACITY],
        }
    }

    /// The raw opcode byte at offset 0.
    pub fn command(&self) -> u8 {
        self.buf[0]
    }

    /// The opcode, with any unrecognized byte collapsing to `Opcode::Unknown`.
    pub fn opcode(&self) -> Opcode {
        Opcode::from(self.buf[0])
    }

    /// Little-endian payload length at offset 1..3.
    pub fn data_length(&self) -> u16 {
        LittleEndian::read_u16(&self.buf[1..3])
    }

    pub fn set_data_length(&mut self, len: u16) {
        LittleEndian::write_u16(&mut self.buf[1..3], len);
    }

    /// The 16-bit unlock key, `(unlock_key_hi << 8) | unlock_key_lo`.
    pub fn unlock_key(&self) -> u16 {
        u16::from_le_bytes([self.buf[3], self.buf[4]])
    }

    /// Offset 8, reused on large-flash parts as bits 16..23 of the
    /// `CALC_CHECKSUM` length (see DESIGN.md for why this offset and not the
    /// original firmware's literal one).
    pub fn address_ext(&self) -> u8 {
        self.buf[8]
    }

    /// The 24-bit effective address: `address_up<<16 | address_hi<<8 | address_lo`.
    pub fn addr24(&self) -> u32 {
        (self.buf[7] as u32) << 16 | (self.buf[6] as u32) << 8 | (self.buf[5] as u32)
    }

    /// Immutable view of the payload region (offset 9 onward).
    pub fn data(&self) -> &[u8] {
        &self.buf[HEADER_BYTES..]
    }

    /// Mutable view of the payload region (offset 9 onward).
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buf[HEADER_BYTES..]
    }

    /// Sets `data[0]`, the conventional status-byte slot for every handler
    /// except `READ_VERSION`/`CALC_CHECKSUM`.
    pub fn set_status(&mut self, status: u8) {
        self.buf[HEADER_BYTES] = status;
    }

    /// The full buffer, for the transport to read the header (and,
    /// conditionally, the payload) into.
    pub fn raw_mut(&mut self) -> &mut [u8; FRAME_CAPACITY] {
        &mut self.buf
    }

    /// The full buffer, for the transport to write a response of a given
    /// length out of.
    pub fn raw(&self) -> &[u8; FRAME_CAPACITY] {
        &self.buf
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}
