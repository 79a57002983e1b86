//! The platform facade: the handful of pin/indicator/reset primitives the
//! core needs but never implements itself (SPEC_FULL.md §4.8).

/// Board-specific primitives the bootloader core drives but does not own.
pub trait Platform {
    /// Turns the bootloader-active indicator on.
    fn indicator_on(&mut self);

    /// Turns the bootloader-active indicator off.
    fn indicator_off(&mut self);

    /// Samples the entry-select pin; `true` means "force bootloader entry".
    fn entry_active(&mut self) -> bool;

    /// Spins for the calibration period that lets weak pullups on the entry
    /// pin settle before it is sampled.
    fn settle_delay(&mut self);

    /// Performs a hardware reset. Never returns.
    fn reset(&mut self) -> !;

    /// Clears call/bank-select state and branches to the application reset
    /// vector. Never returns.
    fn jump_to_app(&mut self) -> !;
}
