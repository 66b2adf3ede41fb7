//! Board configuration for the Pico 2 with a Pimoroni PIM715 Display Pack 2.8".
//!
//! Pin numbers are informational (startup log, docs); the binary takes the
//! matching `embassy_rp` peripherals.
//!
//! | Function | GPIO | Notes |
//! |---|---|---|
//! | Keypad drive line 1 | GP2 | push-pull output, active high |
//! | Keypad drive line 2 | GP3 | push-pull output, active high |
//! | Keypad sense line 1 | GP4 | input, pull-down, rising edge |
//! | Keypad sense line 2 | GP5 | input, pull-down, rising edge |
//! | LM35 output | GP26 | ADC0; the pack's red LED channel shares it and stays unused |
//! | Sense 1 activity LED | GP27 | pack RGB LED green, active low |
//! | Sense 2 activity LED | GP28 | pack RGB LED blue, active low |
//! | Display DC | GP16 | |
//! | Display CS | GP17 | |
//! | Display CLK | GP18 | SPI0 |
//! | Display MOSI | GP19 | SPI0 |
//! | Display backlight | GP20 | |

use embedded_graphics::prelude::*;
use tempclock_common::lcd::GRID_SIZE;

// =============================================================================
// Pins
// =============================================================================

pub const DRIVE_ONE_GPIO: u8 = 2;
pub const DRIVE_TWO_GPIO: u8 = 3;
pub const SENSE_ONE_GPIO: u8 = 4;
pub const SENSE_TWO_GPIO: u8 = 5;
pub const LM35_GPIO: u8 = 26;
pub const SENSE_ONE_LED_GPIO: u8 = 27;
pub const SENSE_TWO_LED_GPIO: u8 = 28;

// =============================================================================
// Display
// =============================================================================

/// The ST7789 supports up to 62.5 MHz SPI clock.
pub const SPI_FREQUENCY_HZ: u32 = 62_500_000;

/// Panel dimensions (landscape after 90° rotation).
pub const PANEL_WIDTH: u32 = 320;
pub const PANEL_HEIGHT: u32 = 240;

/// Only the emulated character module is buffered and flushed.
pub const FRAME_WIDTH: u32 = GRID_SIZE.width;
pub const FRAME_HEIGHT: u32 = GRID_SIZE.height;
pub const FRAME_BYTES: usize = (FRAME_WIDTH * FRAME_HEIGHT * 2) as usize;

/// Top-left of the module on the panel, centred.
pub const FRAME_ORIGIN: Point = Point::new(
    ((PANEL_WIDTH - FRAME_WIDTH) / 2) as i32,
    ((PANEL_HEIGHT - FRAME_HEIGHT) / 2) as i32,
);

const _: () = assert!(FRAME_WIDTH <= PANEL_WIDTH && FRAME_HEIGHT <= PANEL_HEIGHT);

// =============================================================================
// Interrupt Priorities
// =============================================================================

// Lower number is more urgent. The dispatcher runs in thread mode, below all
// of these.

/// Tick source and sense-line edge handlers.
pub const HANDLER_PRIORITY: u8 = 2;

/// Display refresh.
pub const REFRESH_PRIORITY: u8 = 3;

const _: () = assert!(HANDLER_PRIORITY < REFRESH_PRIORITY);
