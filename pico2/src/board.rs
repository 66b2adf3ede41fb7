//! embassy-rp implementations of the core's hardware traits.

use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::gpio::Output;
use embassy_rp::spi::Config as SpiConfig;
use tempclock_common::DriveLine;
use tempclock_common::config::TEMPERATURE_ADC_CHANNEL;
use tempclock_common::hal::{AdcChannel, AnalogInput, DriveOutput};
use tempclock_pico2::config::SPI_FREQUENCY_HZ;

/// SPI configuration for the ST7789 display.
pub fn display_spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = SPI_FREQUENCY_HZ;
    config
}

/// Keypad drive lines on two push-pull outputs.
pub struct DrivePins {
    one: Output<'static>,
    two: Output<'static>,
}

impl DrivePins {
    pub fn new(
        one: Output<'static>,
        two: Output<'static>,
    ) -> Self {
        Self { one, two }
    }

    fn pin(
        &mut self,
        line: DriveLine,
    ) -> &mut Output<'static> {
        match line {
            DriveLine::One => &mut self.one,
            DriveLine::Two => &mut self.two,
        }
    }
}

impl DriveOutput for DrivePins {
    fn set(
        &mut self,
        line: DriveLine,
        high: bool,
    ) {
        let pin = self.pin(line);
        if high {
            pin.set_high();
        } else {
            pin.set_low();
        }
    }

    fn read(
        &self,
        line: DriveLine,
    ) -> bool {
        match line {
            DriveLine::One => self.one.is_set_high(),
            DriveLine::Two => self.two.is_set_high(),
        }
    }
}

/// LM35 on ADC0, one blocking conversion per read.
pub struct Lm35Adc {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl Lm35Adc {
    pub fn new(
        adc: Adc<'static, Blocking>,
        channel: Channel<'static>,
    ) -> Self {
        Self { adc, channel }
    }
}

impl AnalogInput for Lm35Adc {
    fn read(
        &mut self,
        channel: AdcChannel,
    ) -> u16 {
        // Only ADC0 is wired
        if channel != AdcChannel(TEMPERATURE_ADC_CHANNEL) {
            return 0;
        }
        // A failed conversion reads as 0, like an unplugged sensor
        self.adc.blocking_read(&mut self.channel).unwrap_or(0)
    }
}
