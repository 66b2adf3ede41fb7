//! Virtual peripherals: drive-line pins, the keypad matrix and the LM35 ADC.

use core::f32::consts::TAU;
use std::cell::Cell;

use tempclock_common::config::{ADC_FULL_SCALE, FULL_SCALE_DEGREES, TEMPERATURE_ADC_CHANNEL};
use tempclock_common::hal::{AdcChannel, AnalogInput, DriveOutput};
use tempclock_common::{Button, DriveLine, SenseLine};

use crate::timing::{ADC_NOISE_COUNTS, AMBIENT_DEGREES, DRIFT_DEGREES, DRIFT_PERIOD_MS};

// =============================================================================
// Drive Pins
// =============================================================================

/// Output latches of the two drive lines.
///
/// Shared by reference between the button task (writer) and the keypad
/// model (reader), hence the cells.
#[derive(Default)]
pub struct SimPins {
    levels: [Cell<bool>; 2],
}

impl SimPins {
    pub fn new() -> Self { Self::default() }

    #[inline]
    pub fn level(
        &self,
        line: DriveLine,
    ) -> bool {
        self.levels[line as usize].get()
    }
}

impl DriveOutput for &SimPins {
    fn set(
        &mut self,
        line: DriveLine,
        high: bool,
    ) {
        self.levels[line as usize].set(high);
    }

    fn read(
        &self,
        line: DriveLine,
    ) -> bool {
        self.level(line)
    }
}

// =============================================================================
// Keypad Matrix
// =============================================================================

/// Electrical model of the 2x2 matrix.
///
/// A sense line is high while any held button on it sits on an active drive
/// line. Only rising edges raise an interrupt, so a held button produces one
/// edge each time its drive line turns active.
#[derive(Default)]
pub struct SimKeypad {
    held: [bool; 4],
    sense: [bool; 2],
}

impl SimKeypad {
    pub fn new() -> Self { Self::default() }

    pub fn set_held(
        &mut self,
        held: [bool; 4],
    ) {
        self.held = held;
    }

    fn sense_level(
        &self,
        line: SenseLine,
        pins: &SimPins,
    ) -> bool {
        Button::ALL.iter().any(|&button| {
            let (drive, sense) = button.lines();
            self.held[button.index()] && sense == line && pins.level(drive)
        })
    }

    /// Latch the sense lines and report which ones rose since the last call.
    pub fn sample(
        &mut self,
        pins: &SimPins,
    ) -> [bool; 2] {
        let mut rising = [false; 2];
        for (i, line) in [SenseLine::One, SenseLine::Two].into_iter().enumerate() {
            let level = self.sense_level(line, pins);
            rising[i] = level && !self.sense[i];
            self.sense[i] = level;
        }
        rising
    }
}

// =============================================================================
// LM35 on the ADC
// =============================================================================

/// What the simulated ADC converts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AdcSource {
    /// LM35 at room temperature with slow drift and a few counts of noise.
    Lm35,
    /// Constant raw reading.
    Fixed(u16),
}

pub struct SimAdc<'a> {
    clock: &'a Cell<u32>,
    source: AdcSource,
    /// LCG state for conversion noise.
    noise: u32,
}

impl<'a> SimAdc<'a> {
    pub const fn new(
        clock: &'a Cell<u32>,
        source: AdcSource,
    ) -> Self {
        Self {
            clock,
            source,
            noise: 0x2545_f491,
        }
    }

    fn next_noise(&mut self) -> i32 {
        self.noise = self.noise.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let span = 2 * ADC_NOISE_COUNTS + 1;
        ((self.noise >> 16) % span) as i32 - ADC_NOISE_COUNTS as i32
    }

    fn lm35(&mut self) -> u16 {
        let phase = self.clock.get() as f32 / DRIFT_PERIOD_MS * TAU;
        let degrees = AMBIENT_DEGREES + DRIFT_DEGREES * phase.sin();
        let counts = (degrees * f32::from(ADC_FULL_SCALE) / FULL_SCALE_DEGREES).round() as i32;
        (counts + self.next_noise()).clamp(0, i32::from(ADC_FULL_SCALE)) as u16
    }
}

impl AnalogInput for SimAdc<'_> {
    fn read(
        &mut self,
        channel: AdcChannel,
    ) -> u16 {
        // Nothing is wired to the other inputs
        if channel != AdcChannel(TEMPERATURE_ADC_CHANNEL) {
            return 0;
        }
        match self.source {
            AdcSource::Lm35 => self.lm35(),
            AdcSource::Fixed(raw) => raw,
        }
    }
}
