//! Process-wide state shared between the dispatcher and the handlers.
//!
//! Every field has exactly one producer:
//!
//! | Field | Producer | Consumers |
//! |---|---|---|
//! | tick counters | tick source (increment), dispatcher (reset) | dispatcher |
//! | drive phase | button task | keypad decoder |
//! | button accumulators | keypad decoder | display refresh |
//! | temperature | temperature task | display refresh |
//! | seconds | time task | display refresh |
//!
//! All fields are word-sized atomics, so any handler may preempt any other
//! without a lock. The four button accumulators live in a single word and are
//! updated with one compare-and-swap, so a reader always gets a consistent
//! snapshot, never a half-applied reset.
//!
//! The tick counters are private. The tick handler and the foreground loop
//! each take their handle exactly once at startup; a second take fails.

use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use crate::dispatcher::{ConfigError, Dispatcher};
use crate::keypad::{Button, ButtonState, DriveLine};
use crate::ticks::{TickCounters, TickSource};

const TICK_SOURCE_CLAIM: u8 = 1 << 0;
const DISPATCHER_CLAIM: u8 = 1 << 1;

pub struct SharedState {
    /// Per-task tick counters.
    pub(crate) ticks: TickCounters,
    /// Handles already taken, one bit each.
    claims: AtomicU8,
    /// Packed [`ButtonState`].
    buttons: AtomicU32,
    /// Mirror of the drive-line output levels, one bit per line.
    drive: AtomicU8,
    /// Committed temperature as `f32` bits.
    temperature: AtomicU32,
    /// Wrapping 0..=99 seconds counter.
    seconds: AtomicU8,
}

impl SharedState {
    /// Startup values: everything zero, no drive line active.
    pub const fn new() -> Self {
        Self {
            ticks: TickCounters::new(),
            claims: AtomicU8::new(0),
            buttons: AtomicU32::new(0),
            drive: AtomicU8::new(0),
            temperature: AtomicU32::new(0),
            seconds: AtomicU8::new(0),
        }
    }

    // -------------------------------------------------------------------------
    // Tick handles
    // -------------------------------------------------------------------------

    fn claim(
        &self,
        bit: u8,
    ) -> bool {
        self.claims.fetch_or(bit, Ordering::AcqRel) & bit == 0
    }

    /// The tick handler's handle. Succeeds once.
    pub fn take_tick_source(&self) -> Result<TickSource<'_>, ConfigError> {
        if self.claim(TICK_SOURCE_CLAIM) {
            Ok(TickSource::new(&self.ticks))
        } else {
            Err(ConfigError::TickSourceTaken)
        }
    }

    /// An empty dispatcher over these counters. Succeeds once.
    pub fn take_dispatcher(&self) -> Result<Dispatcher<'_>, ConfigError> {
        if self.claim(DISPATCHER_CLAIM) {
            Ok(Dispatcher::new(&self.ticks))
        } else {
            Err(ConfigError::DispatcherTaken)
        }
    }

    // -------------------------------------------------------------------------
    // Keypad
    // -------------------------------------------------------------------------

    /// Snapshot of all four accumulators.
    #[inline]
    pub fn buttons(&self) -> ButtonState { ButtonState::unpack(self.buttons.load(Ordering::Acquire)) }

    /// Apply one detected press atomically. Returns the new state.
    pub fn apply_press(
        &self,
        button: Button,
    ) -> ButtonState {
        let mut current = self.buttons.load(Ordering::Relaxed);
        loop {
            let next = ButtonState::unpack(current).press(button);
            match self
                .buttons
                .compare_exchange_weak(current, next.pack(), Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }

    /// Whether a drive line is currently driven active.
    #[inline]
    pub fn drive_active(
        &self,
        line: DriveLine,
    ) -> bool {
        self.drive.load(Ordering::Acquire) & line.mask() != 0
    }

    /// Record the level just written to a drive line.
    #[inline]
    pub fn set_drive(
        &self,
        line: DriveLine,
        active: bool,
    ) {
        if active {
            self.drive.fetch_or(line.mask(), Ordering::Release);
        } else {
            self.drive.fetch_and(!line.mask(), Ordering::Release);
        }
    }

    // -------------------------------------------------------------------------
    // Temperature
    // -------------------------------------------------------------------------

    /// Last committed temperature in degrees.
    #[inline]
    pub fn temperature(&self) -> f32 { f32::from_bits(self.temperature.load(Ordering::Relaxed)) }

    #[inline]
    pub fn set_temperature(
        &self,
        degrees: f32,
    ) {
        self.temperature.store(degrees.to_bits(), Ordering::Relaxed);
    }

    // -------------------------------------------------------------------------
    // Seconds
    // -------------------------------------------------------------------------

    #[inline]
    pub fn seconds(&self) -> u8 { self.seconds.load(Ordering::Relaxed) }

    #[inline]
    pub fn set_seconds(
        &self,
        seconds: u8,
    ) {
        self.seconds.store(seconds, Ordering::Relaxed);
    }
}

impl Default for SharedState {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::ticks::TaskId;

    #[test]
    fn test_initial_state() {
        let shared = SharedState::new();
        assert_eq!(shared.buttons(), ButtonState::ZERO);
        assert_eq!(shared.temperature(), 0.0);
        assert_eq!(shared.seconds(), 0);
        assert!(!shared.drive_active(DriveLine::One));
        assert!(!shared.drive_active(DriveLine::Two));
    }

    #[test]
    fn test_drive_lines_are_independent() {
        let shared = SharedState::new();
        shared.set_drive(DriveLine::Two, true);
        assert!(!shared.drive_active(DriveLine::One));
        assert!(shared.drive_active(DriveLine::Two));

        shared.set_drive(DriveLine::One, true);
        shared.set_drive(DriveLine::Two, false);
        assert!(shared.drive_active(DriveLine::One));
        assert!(!shared.drive_active(DriveLine::Two));
    }

    #[test]
    fn test_temperature_round_trips_bits() {
        let shared = SharedState::new();
        shared.set_temperature(23.75);
        assert_eq!(shared.temperature(), 23.75);
    }

    #[test]
    fn test_apply_press_returns_new_state() {
        let shared = SharedState::new();
        let state = shared.apply_press(Button::S3);
        assert_eq!(state.accumulators(), [0, 0, 3, 0]);
        assert_eq!(shared.buttons(), state);
    }

    #[test]
    fn test_handles_are_taken_once() {
        let shared = SharedState::new();
        let source = shared.take_tick_source().unwrap();
        assert_eq!(shared.take_tick_source().err(), Some(ConfigError::TickSourceTaken));

        let dispatcher = shared.take_dispatcher().unwrap();
        assert!(matches!(shared.take_dispatcher(), Err(ConfigError::DispatcherTaken)));

        source.on_tick();
        assert_eq!(shared.ticks.count(TaskId::Time), 1);
        drop(dispatcher);
    }

    #[test]
    fn test_snapshot_is_never_torn() {
        // One writer pressing buttons, one reader taking snapshots concurrently.
        // Every snapshot must be a state reachable by the reset law: sum below
        // the threshold and each accumulator a multiple of its weight.
        let shared = Arc::new(SharedState::new());
        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..20_000 {
                    shared.apply_press(Button::ALL[i % 4]);
                }
            })
        };

        for _ in 0..20_000 {
            let snapshot = shared.buttons();
            assert!(snapshot.indicator() < 100);
            for button in Button::ALL {
                assert_eq!(snapshot.accumulator(button) % button.weight(), 0);
            }
        }
        writer.join().unwrap();
    }
}
