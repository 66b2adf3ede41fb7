//! Compile-time configuration for the indicator.
//!
//! Every constant here is fixed at build time. Nothing is reconfigurable at
//! runtime; a wrong value is a configuration bug, caught either by the
//! `const` assertions below or by [`Dispatcher::check`](crate::dispatcher::Dispatcher::check)
//! at startup.

// =============================================================================
// Tick Source
// =============================================================================

/// Interval between two tick-source firings in milliseconds.
pub const TICK_INTERVAL_MS: u32 = 50;

// =============================================================================
// Task Periods (in ticks)
// =============================================================================

/// Button (drive-line strobe) task period. 2 ticks = 100 ms per drive phase.
pub const BUTTON_TASK_PERIOD: u32 = 2;

/// Time task period. 20 ticks = 1 s.
pub const TIME_TASK_PERIOD: u32 = 20;

/// Temperature task period. 8 ticks = 400 ms between samples.
pub const TEMPERATURE_TASK_PERIOD: u32 = 8;

const _: () = assert!(BUTTON_TASK_PERIOD > 0);
const _: () = assert!(TIME_TASK_PERIOD > 0);
const _: () = assert!(TEMPERATURE_TASK_PERIOD > 0);

// =============================================================================
// Display Refresh
// =============================================================================

/// Period of the independent display refresh source in milliseconds.
pub const DISPLAY_REFRESH_MS: u32 = 100;

// =============================================================================
// Temperature
// =============================================================================

/// ADC channel the LM35 sensor is wired to.
pub const TEMPERATURE_ADC_CHANNEL: u8 = 0;

/// Full-scale raw ADC reading (12-bit converter).
pub const ADC_FULL_SCALE: u16 = 4095;

/// Temperature in degrees at full-scale reading.
pub const FULL_SCALE_DEGREES: f32 = 206.0;

/// Only every Nth temperature sample is committed to the display.
pub const TEMPERATURE_DECIMATION: u8 = 5;

const _: () = assert!(TEMPERATURE_DECIMATION > 0);

// =============================================================================
// Keypad
// =============================================================================

/// Combined indicator value at which all accumulators reset to zero.
pub const BUTTON_RESET_THRESHOLD: u8 = 100;

// Each accumulator is kept in one byte of the packed snapshot word.
const _: () = assert!(BUTTON_RESET_THRESHOLD as u32 + 4 <= u8::MAX as u32);

// =============================================================================
// Seconds Counter
// =============================================================================

/// Highest value shown by the seconds counter before it wraps to 0.
pub const SECONDS_WRAP: u8 = 99;

// =============================================================================
// Character Display Layout (16x2)
// =============================================================================

/// Number of character columns on the display.
pub const LCD_COLUMNS: usize = 16;

/// Number of character rows on the display.
pub const LCD_ROWS: usize = 2;

/// Row 0: temperature label, value and unit.
pub const TEMP_LABEL: &str = "Temp:";
pub const TEMP_LABEL_COL: u8 = 0;
pub const TEMP_VALUE_COL: u8 = 6;
pub const TEMP_UNIT: &str = "\u{b0}C";
pub const TEMP_UNIT_COL: u8 = 11;

/// Row 1: seconds label and value.
pub const SECONDS_LABEL: &str = "Sec:";
pub const SECONDS_LABEL_COL: u8 = 0;
pub const SECONDS_VALUE_COL: u8 = 5;

/// Row 1: combined indicator label and value.
pub const INDICATOR_LABEL: &str = "Ind:";
pub const INDICATOR_LABEL_COL: u8 = 9;
pub const INDICATOR_VALUE_COL: u8 = 14;

const _: () = assert!((TEMP_UNIT_COL as usize) + 2 <= LCD_COLUMNS);
const _: () = assert!((INDICATOR_VALUE_COL as usize) + 2 <= LCD_COLUMNS);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_periods_in_wall_time() {
        assert_eq!(BUTTON_TASK_PERIOD * TICK_INTERVAL_MS, 100);
        assert_eq!(TIME_TASK_PERIOD * TICK_INTERVAL_MS, 1000, "time task must run once per second");
        assert_eq!(TEMPERATURE_TASK_PERIOD * TICK_INTERVAL_MS, 400);
    }

    #[test]
    fn test_row_layout_does_not_overlap() {
        // Temperature value is at most "206.0" (5 chars)
        assert!(TEMP_VALUE_COL as usize + 5 <= TEMP_UNIT_COL as usize);
        assert!(TEMP_LABEL_COL as usize + TEMP_LABEL.len() <= TEMP_VALUE_COL as usize);
        assert!(SECONDS_VALUE_COL as usize + 2 <= INDICATOR_LABEL_COL as usize);
        assert!(INDICATOR_LABEL_COL as usize + INDICATOR_LABEL.len() <= INDICATOR_VALUE_COL as usize);
    }
}
