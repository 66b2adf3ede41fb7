//! Timing and scenario constants for the simulator.
//!
//! These use `std::time::Duration` or only make sense on the host, so they
//! live here rather than in the common crate.

use std::time::Duration;

use tempclock_common::Button;

/// Virtual time advanced per simulation step.
pub const STEP_MS: u32 = 1;

/// Real time per virtual millisecond in the window front end.
pub const REAL_TIME_PER_MS: Duration = Duration::from_millis(1);

/// Headless run length when `--seconds` is not given.
pub const DEFAULT_HEADLESS_SECONDS: u32 = 12;

/// Headless front end prints the display every this many milliseconds.
pub const PRINT_INTERVAL_MS: u32 = 1000;

/// Window scale factor (the 16x2 module is small at 1:1).
pub const WINDOW_SCALE: u32 = 2;

// =============================================================================
// Simulated LM35
// =============================================================================

/// Mean room temperature of the simulated sensor.
pub const AMBIENT_DEGREES: f32 = 23.5;

/// Amplitude of the slow temperature drift.
pub const DRIFT_DEGREES: f32 = 2.0;

/// Period of the temperature drift.
pub const DRIFT_PERIOD_MS: f32 = 30_000.0;

/// Peak ADC noise in counts.
pub const ADC_NOISE_COUNTS: u32 = 3;

// =============================================================================
// Headless Scenario
// =============================================================================

/// A button held down from `from_ms` until `until_ms`.
#[derive(Clone, Copy, Debug)]
pub struct Hold {
    pub button: Button,
    pub from_ms: u32,
    pub until_ms: u32,
}

impl Hold {
    #[inline]
    pub const fn active(
        &self,
        now_ms: u32,
    ) -> bool {
        now_ms >= self.from_ms && now_ms < self.until_ms
    }
}

/// Scripted presses for headless runs. Each hold is long enough to span at
/// least one active phase of its drive line.
pub const SCENARIO: [Hold; 5] = [
    Hold {
        button: Button::S1,
        from_ms: 1_500,
        until_ms: 1_700,
    },
    Hold {
        button: Button::S2,
        from_ms: 3_000,
        until_ms: 3_200,
    },
    Hold {
        button: Button::S3,
        from_ms: 4_500,
        until_ms: 5_300,
    },
    Hold {
        button: Button::S4,
        from_ms: 6_000,
        until_ms: 6_200,
    },
    Hold {
        button: Button::S4,
        from_ms: 8_000,
        until_ms: 12_000,
    },
];
