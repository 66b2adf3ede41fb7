//! Dispatcher-bound task bodies.
//!
//! - [`StrobeTask`]: toggles the keypad drive lines (the "button task")
//! - [`TimeTask`]: wrapping seconds counter
//! - [`TemperatureTask`]: LM35 sampling with decimation

use crate::config::{ADC_FULL_SCALE, FULL_SCALE_DEGREES, SECONDS_WRAP, TEMPERATURE_ADC_CHANNEL, TEMPERATURE_DECIMATION};
use crate::dispatcher::Task;
use crate::hal::{AdcChannel, AnalogInput, DriveOutput};
use crate::keypad::DriveLine;
use crate::shared::SharedState;

// =============================================================================
// Button Task
// =============================================================================

/// Alternates the active drive line of the keypad matrix.
///
/// Each line is toggled on its own, so starting from opposite levels the two
/// lines stay in opposite phases. The new levels are mirrored into the shared
/// state for the edge handler.
pub struct StrobeTask<'a, O: DriveOutput> {
    shared: &'a SharedState,
    output: O,
}

impl<'a, O: DriveOutput> StrobeTask<'a, O> {
    /// Drive line 1 starts active, drive line 2 inactive.
    pub fn new(
        shared: &'a SharedState,
        mut output: O,
    ) -> Self {
        output.set(DriveLine::One, true);
        output.set(DriveLine::Two, false);
        shared.set_drive(DriveLine::One, true);
        shared.set_drive(DriveLine::Two, false);
        Self { shared, output }
    }

    fn toggle(
        &mut self,
        line: DriveLine,
    ) {
        let level = !self.output.read(line);
        self.output.set(line, level);
        self.shared.set_drive(line, level);
    }

    /// The drive output, for front ends that inspect pin levels.
    pub fn output(&self) -> &O { &self.output }
}

impl<O: DriveOutput> Task for StrobeTask<'_, O> {
    fn run(&mut self) {
        self.toggle(DriveLine::One);
        self.toggle(DriveLine::Two);
    }
}

// =============================================================================
// Time Task
// =============================================================================

/// Next value of the seconds counter.
#[inline]
pub const fn next_second(seconds: u8) -> u8 { if seconds >= SECONDS_WRAP { 0 } else { seconds + 1 } }

pub struct TimeTask<'a> {
    shared: &'a SharedState,
}

impl<'a> TimeTask<'a> {
    pub const fn new(shared: &'a SharedState) -> Self { Self { shared } }
}

impl Task for TimeTask<'_> {
    fn run(&mut self) { self.shared.set_seconds(next_second(self.shared.seconds())); }
}

// =============================================================================
// Temperature Task
// =============================================================================

/// Linear conversion of a raw LM35 reading to degrees.
///
/// No offset, no calibration, no range check.
#[inline]
pub fn raw_to_degrees(raw: u16) -> f32 { f32::from(raw) * FULL_SCALE_DEGREES / f32::from(ADC_FULL_SCALE) }

/// Samples on every run, commits every [`TEMPERATURE_DECIMATION`]th sample.
pub struct TemperatureTask<'a, A: AnalogInput> {
    shared: &'a SharedState,
    adc: A,
    /// 0..TEMPERATURE_DECIMATION, wraps.
    decimation: u8,
}

impl<'a, A: AnalogInput> TemperatureTask<'a, A> {
    pub const fn new(
        shared: &'a SharedState,
        adc: A,
    ) -> Self {
        Self {
            shared,
            adc,
            decimation: 0,
        }
    }

    /// Position in the decimation cycle.
    #[inline]
    pub const fn decimation(&self) -> u8 { self.decimation }

    /// The ADC, for front ends that change the simulated input.
    pub fn adc_mut(&mut self) -> &mut A { &mut self.adc }
}

impl<A: AnalogInput> Task for TemperatureTask<'_, A> {
    fn run(&mut self) {
        let degrees = raw_to_degrees(self.adc.read(AdcChannel(TEMPERATURE_ADC_CHANNEL)));
        self.decimation += 1;
        if self.decimation >= TEMPERATURE_DECIMATION {
            self.decimation = 0;
            self.shared.set_temperature(degrees);
        }
    }
}
