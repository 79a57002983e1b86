//! The byte-stream transport contract (SPEC_FULL.md §2 item 2, §4.6).

use crate::error::Error;

/// A blocking byte-stream transport with an autobaud handshake.
///
/// Implementations are responsible for prefixing every `write` with the
/// start-of-text sentinel (`constants::SENTINEL`) — the core never writes
/// that byte itself, since it is a wire-framing concern, not a protocol
/// payload concern.
pub trait Transport {
    /// Performs the autobaud handshake. Blocks until the baud rate locks or
    /// an error-retry attempt succeeds; implementations are expected to
    /// retry internally rather than give up (SPEC_FULL.md §9 "Autobaud").
    fn init(&mut self) -> Result<(), Error>;

    /// Blocking read of exactly `buf.len()` bytes.
    fn read(&mut self, buf: &mut [u8]) -> Result<(), Error>;

    /// Blocking write of exactly `buf.len()` bytes, prefixed on the wire by
    /// the sentinel byte.
    fn write(&mut self, buf: &[u8]) -> Result<(), Error>;

    /// `true` once the last byte written has physically shifted out.
    fn tx_done(&mut self) -> bool;
}
