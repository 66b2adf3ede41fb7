//! Interfaces to the hardware collaborators.
//!
//! The core never touches peripherals directly. Each board (or the
//! simulator) implements these traits over its own drivers.

use crate::keypad::DriveLine;

/// Character display with cursor-addressed writes.
pub trait CharDisplay {
    /// Blank every cell.
    fn clear(&mut self);

    /// Write `text` starting at (`column`, `row`). Characters falling outside
    /// the display are dropped.
    fn write(
        &mut self,
        column: u8,
        row: u8,
        text: &str,
    );
}

/// ADC input channel number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdcChannel(pub u8);

/// Single-shot analog-to-digital converter.
pub trait AnalogInput {
    /// One raw conversion, nominally 0..=4095. Values are not range-checked by
    /// callers.
    fn read(
        &mut self,
        channel: AdcChannel,
    ) -> u16;
}

/// Output side of the keypad matrix.
pub trait DriveOutput {
    /// Drive `line` high (`true`) or low.
    fn set(
        &mut self,
        line: DriveLine,
        high: bool,
    );

    /// Level last written to `line`.
    fn read(
        &self,
        line: DriveLine,
    ) -> bool;
}
