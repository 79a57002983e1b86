//! A host-testable reimplementation of a resident serial bootloader core for
//! PIC18-family 8-bit microcontrollers.
//!
//! UART, NVM, and pin/LED drivers are not implemented here — they are
//! consumed through the [`transport`], [`nvm`], and [`platform`] trait
//! contracts so the protocol state machine, command dispatcher, and
//! integrity verifier can be built and tested under `std` without target
//! hardware (see SPEC_FULL.md §1.1).

pub mod config;
pub mod constants;
pub mod dispatch;
pub mod driver;
mod error;
pub mod frame;
pub mod handlers;
pub mod nvm;
pub mod platform;
pub mod transport;
pub mod verify;

pub use error::Error;
