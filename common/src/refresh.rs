//! Periodic redraw of the 16x2 character display.
//!
//! ```text
//!   0123456789012345
//! 0 Temp: 103.0°C
//! 1 Sec:07   Ind:05
//! ```
//!
//! The refresh only reads shared state. It clears the display and rewrites
//! every field on each run, so a half-drawn frame is never left behind.

use core::fmt::Write;

use heapless::String;

use crate::config::{
    INDICATOR_LABEL, INDICATOR_LABEL_COL, INDICATOR_VALUE_COL, SECONDS_LABEL, SECONDS_LABEL_COL, SECONDS_VALUE_COL,
    TEMP_LABEL, TEMP_LABEL_COL, TEMP_UNIT, TEMP_UNIT_COL, TEMP_VALUE_COL,
};
use crate::hal::CharDisplay;
use crate::shared::SharedState;

/// Longest rendered field ("206.0" plus slack for out-of-range readings).
pub const FIELD_CAPACITY: usize = 8;

// =============================================================================
// Field Formatting
// =============================================================================

/// Temperature as a 5-wide, right-aligned, one-decimal field.
///
/// Values wider than the field (never produced by a 12-bit LM35 reading) are
/// cut at [`FIELD_CAPACITY`] rather than overflowing.
pub fn format_temperature(degrees: f32) -> String<FIELD_CAPACITY> {
    let mut s = String::new();
    write!(s, "{degrees:>5.1}").ok();
    s
}

/// Zero-padded two-digit field. Values above 99 print in full.
pub fn format_two_digits(value: u32) -> String<FIELD_CAPACITY> {
    let mut s = String::new();
    write!(s, "{value:02}").ok();
    s
}

// =============================================================================
// Refresh
// =============================================================================

pub struct DisplayRefresh<'a> {
    shared: &'a SharedState,
}

impl<'a> DisplayRefresh<'a> {
    pub const fn new(shared: &'a SharedState) -> Self { Self { shared } }

    /// Redraw every field from one read of the shared state.
    pub fn refresh<D: CharDisplay + ?Sized>(
        &self,
        display: &mut D,
    ) {
        let temperature = self.shared.temperature();
        let seconds = self.shared.seconds();
        let indicator = self.shared.buttons().indicator();

        display.clear();

        display.write(TEMP_LABEL_COL, 0, TEMP_LABEL);
        display.write(TEMP_VALUE_COL, 0, &format_temperature(temperature));
        display.write(TEMP_UNIT_COL, 0, TEMP_UNIT);

        display.write(SECONDS_LABEL_COL, 1, SECONDS_LABEL);
        display.write(SECONDS_VALUE_COL, 1, &format_two_digits(u32::from(seconds)));
        display.write(INDICATOR_LABEL_COL, 1, INDICATOR_LABEL);
        display.write(INDICATOR_VALUE_COL, 1, &format_two_digits(indicator));
    }
}

#[cfg(test)]
mod tests {
    use std::string::{String as StdString, ToString};
    use std::vec::Vec;

    use super::*;
    use crate::keypad::Button;

    /// Records every call instead of drawing.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(u8, u8, StdString)>,
        clears: usize,
    }

    impl CharDisplay for Recorder {
        fn clear(&mut self) {
            self.clears += 1;
            self.calls.clear();
        }

        fn write(
            &mut self,
            column: u8,
            row: u8,
            text: &str,
        ) {
            self.calls.push((column, row, text.to_string()));
        }
    }

    impl Recorder {
        fn field(
            &self,
            column: u8,
            row: u8,
        ) -> &str {
            self.calls
                .iter()
                .find(|(c, r, _)| *c == column && *r == row)
                .map(|(_, _, t)| t.as_str())
                .unwrap_or_default()
        }
    }

    #[test]
    fn test_format_two_digits() {
        assert_eq!(format_two_digits(0).as_str(), "00");
        assert_eq!(format_two_digits(9).as_str(), "09");
        assert_eq!(format_two_digits(10).as_str(), "10");
        assert_eq!(format_two_digits(99).as_str(), "99");
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(0.0).as_str(), "  0.0");
        assert_eq!(format_temperature(25.04).as_str(), " 25.0");
        assert_eq!(format_temperature(103.025).as_str(), "103.0");
        assert_eq!(format_temperature(206.0).as_str(), "206.0");
    }

    #[test]
    fn test_refresh_writes_every_field() {
        let shared = SharedState::new();
        shared.set_seconds(7);
        shared.set_temperature(103.025);
        shared.apply_press(Button::S1);
        shared.apply_press(Button::S4);

        let mut display = Recorder::default();
        DisplayRefresh::new(&shared).refresh(&mut display);

        assert_eq!(display.clears, 1, "display is cleared once per refresh");
        assert_eq!(display.calls.len(), 7);
        assert_eq!(display.field(0, 0), "Temp:");
        assert_eq!(display.field(6, 0), "103.0");
        assert_eq!(display.field(11, 0), "\u{b0}C");
        assert_eq!(display.field(0, 1), "Sec:");
        assert_eq!(display.field(5, 1), "07");
        assert_eq!(display.field(9, 1), "Ind:");
        assert_eq!(display.field(14, 1), "05");
    }

    #[test]
    fn test_refresh_does_not_mutate_state() {
        let shared = SharedState::new();
        shared.set_seconds(42);
        shared.set_temperature(21.5);
        shared.apply_press(Button::S3);
        shared.ticks.on_tick();

        let before = (shared.seconds(), shared.temperature(), shared.buttons(), shared.ticks.count(crate::ticks::TaskId::Time));
        let mut display = Recorder::default();
        let refresh = DisplayRefresh::new(&shared);
        for _ in 0..10 {
            refresh.refresh(&mut display);
        }
        let after = (shared.seconds(), shared.temperature(), shared.buttons(), shared.ticks.count(crate::ticks::TaskId::Time));
        assert_eq!(before, after);
    }

    #[test]
    fn test_refresh_at_startup() {
        let shared = SharedState::new();
        let mut display = Recorder::default();
        DisplayRefresh::new(&shared).refresh(&mut display);
        assert_eq!(display.field(6, 0), "  0.0");
        assert_eq!(display.field(5, 1), "00");
        assert_eq!(display.field(14, 1), "00");
    }
}
