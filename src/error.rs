use thiserror::Error;

/// Failures that can occur while talking to the host over the transport.
///
/// Command-level failures are not represented here — per the wire protocol
/// they are status bytes written into the response frame (see
/// [`crate::constants`]), not `Result` errors. This type only covers the
/// transport itself failing to deliver or accept bytes.
#[derive(Error, Debug)]
pub enum Error {
    /// The transport's autobaud handshake did not lock onto a baud rate.
    #[error("autobaud handshake failed")]
    HandshakeFailed,

    /// A `read`/`write` call could not move the requested number of bytes.
    #[error("transport short transfer: expected {expected} bytes, moved {actual}")]
    ShortTransfer { expected: usize, actual: usize },

    /// Catch-all for a transport implementation's own I/O failure.
    #[error("transport I/O error: {0}")]
    Io(String),
}
