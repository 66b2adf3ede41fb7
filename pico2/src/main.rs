//! Time & temperature indicator firmware for Raspberry Pi Pico 2 (RP2350).
//!
//! # Architecture
//!
//! The hardware handlers are embassy tasks on two interrupt executors, so
//! they preempt the foreground the way interrupt service routines would:
//!
//! | Executor | IRQ | Priority | Tasks |
//! |---|---|---|---|
//! | high | `SWI_IRQ_1` | P2 | tick source (50 ms `Ticker`), two sense-line edge handlers |
//! | medium | `SWI_IRQ_0` | P3 | display refresh (100 ms) |
//! | thread mode | | lowest | dispatcher polling loop: button, time and temperature tasks |
//!
//! Handlers and tasks communicate only through the atomics in
//! [`SharedState`], which lives in a `static`.
//!
//! # Display
//!
//! There is no character LCD on the board. The 16x2 module is drawn with
//! ProFont into a framebuffer covering only the module area and flushed into
//! the centre of the PIM715 ST7789 panel by DMA.

#![no_std]
#![no_main]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod board;
mod st7789;

use cortex_m_rt::entry;
use defmt::{debug, info, unwrap};
use embassy_executor::InterruptExecutor;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::spi::Spi;
use embassy_time::{Duration, Ticker};
use embedded_graphics::prelude::*;
use static_cell::ConstStaticCell;
use tempclock_common::colors::BLACK;
use tempclock_common::config::{
    BUTTON_TASK_PERIOD, DISPLAY_REFRESH_MS, TEMPERATURE_TASK_PERIOD, TICK_INTERVAL_MS, TIME_TASK_PERIOD,
};
use tempclock_common::lcd::{TextGrid, draw_grid};
use tempclock_common::refresh::DisplayRefresh;
use tempclock_common::tasks::{StrobeTask, TemperatureTask, TimeTask};
use tempclock_common::ticks::TickSource;
use tempclock_common::{KeypadDecoder, SenseLine, SharedState, TaskId};
use tempclock_pico2::config::{
    DRIVE_ONE_GPIO, DRIVE_TWO_GPIO, FRAME_BYTES, FRAME_ORIGIN, HANDLER_PRIORITY, LM35_GPIO, REFRESH_PRIORITY,
    SENSE_ONE_GPIO, SENSE_ONE_LED_GPIO, SENSE_TWO_GPIO, SENSE_TWO_LED_GPIO,
};
use tempclock_pico2::framebuffer::Framebuffer;
use {defmt_rtt as _, panic_probe as _};

use crate::board::{DrivePins, Lm35Adc, display_spi_config};
use crate::st7789::St7789;

#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"tempclock"),
    embassy_rp::binary_info::rp_program_description!(c"Time & temperature indicator with 2x2 keypad"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

// =============================================================================
// Shared State and Executors
// =============================================================================

static SHARED: SharedState = SharedState::new();

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_MED: InterruptExecutor = InterruptExecutor::new();

/// Framebuffer for the character module area.
static FRAME: ConstStaticCell<[u8; FRAME_BYTES]> = ConstStaticCell::new([0; FRAME_BYTES]);

#[interrupt]
unsafe fn SWI_IRQ_1() {
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

#[interrupt]
unsafe fn SWI_IRQ_0() {
    unsafe { EXECUTOR_MED.on_interrupt() }
}

const fn nvic_priority(level: u8) -> Priority {
    match level {
        0 => Priority::P0,
        1 => Priority::P1,
        2 => Priority::P2,
        3 => Priority::P3,
        4 => Priority::P4,
        5 => Priority::P5,
        6 => Priority::P6,
        _ => Priority::P7,
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Periodic tick: advances every task's counter.
#[embassy_executor::task]
async fn tick_task(source: TickSource<'static>) {
    info!("Tick source started ({} ms)", TICK_INTERVAL_MS);
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(TICK_INTERVAL_MS)));
    loop {
        ticker.next().await;
        source.on_tick();
    }
}

/// Rising edge on a sense line: decode against the drive phase and blink the
/// line's activity LED.
#[embassy_executor::task(pool_size = 2)]
async fn sense_edge_task(
    line: SenseLine,
    mut input: Input<'static>,
    mut led: Output<'static>,
) {
    info!("Sense line {} handler started", line);
    let decoder = KeypadDecoder::new(&SHARED);
    loop {
        input.wait_for_rising_edge().await;
        led.toggle();
        if let Some(button) = decoder.on_edge(line) {
            debug!("{} pressed, indicator {}", button, SHARED.buttons().indicator());
        }
    }
}

/// Display refresh: redraw the character grid and push it to the panel.
#[embassy_executor::task]
async fn refresh_task(
    mut panel: St7789<'static>,
    frame: &'static mut [u8; FRAME_BYTES],
) {
    panel.init(BLACK).await;
    info!(
        "Display refresh started ({} ms, module at {},{})",
        DISPLAY_REFRESH_MS, FRAME_ORIGIN.x, FRAME_ORIGIN.y
    );

    let refresh = DisplayRefresh::new(&SHARED);
    let mut grid = TextGrid::new();
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(DISPLAY_REFRESH_MS)));
    loop {
        refresh.refresh(&mut grid);
        draw_grid(&mut Framebuffer::new(&mut *frame), &grid, Point::zero());
        panel.flush(frame).await;
        ticker.next().await;
    }
}

// =============================================================================
// Entry
// =============================================================================

#[entry]
fn main() -> ! {
    info!("tempclock starting...");
    let p = embassy_rp::init(Default::default());

    // Foreground tasks
    let drive = DrivePins::new(Output::new(p.PIN_2, Level::Low), Output::new(p.PIN_3, Level::Low));
    let lm35 = Lm35Adc::new(
        Adc::new_blocking(p.ADC, AdcConfig::default()),
        Channel::new_pin(p.PIN_26, Pull::None),
    );
    info!(
        "Keypad: drive GP{}/GP{}, sense GP{}/GP{}; LM35 on GP{}",
        DRIVE_ONE_GPIO, DRIVE_TWO_GPIO, SENSE_ONE_GPIO, SENSE_TWO_GPIO, LM35_GPIO
    );

    let mut strobe = StrobeTask::new(&SHARED, drive);
    let mut time = TimeTask::new(&SHARED);
    let mut temperature = TemperatureTask::new(&SHARED, lm35);

    let mut dispatcher = unwrap!(SHARED.take_dispatcher());
    unwrap!(dispatcher.bind(TaskId::Button, BUTTON_TASK_PERIOD, &mut strobe));
    unwrap!(dispatcher.bind(TaskId::Time, TIME_TASK_PERIOD, &mut time));
    unwrap!(dispatcher.bind(TaskId::Temperature, TEMPERATURE_TASK_PERIOD, &mut temperature));
    unwrap!(dispatcher.check());
    for binding in dispatcher.bindings() {
        info!("Task {} every {} ticks", binding.name(), binding.period());
    }

    // Display
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let _backlight = Output::new(p.PIN_20, Level::High);
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, display_spi_config());
    let panel = St7789::new(spi, dc, cs);

    interrupt::SWI_IRQ_0.set_priority(nvic_priority(REFRESH_PRIORITY));
    let spawner = EXECUTOR_MED.start(interrupt::SWI_IRQ_0);
    spawner.spawn(refresh_task(panel, FRAME.take())).unwrap();

    // Tick and keypad handlers; activity LEDs are active low
    let sense_one = Input::new(p.PIN_4, Pull::Down);
    let sense_two = Input::new(p.PIN_5, Pull::Down);
    let led_one = Output::new(p.PIN_27, Level::High);
    let led_two = Output::new(p.PIN_28, Level::High);
    info!("Activity LEDs on GP{}/GP{}", SENSE_ONE_LED_GPIO, SENSE_TWO_LED_GPIO);

    interrupt::SWI_IRQ_1.set_priority(nvic_priority(HANDLER_PRIORITY));
    let spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    spawner.spawn(tick_task(unwrap!(SHARED.take_tick_source()))).unwrap();
    spawner.spawn(sense_edge_task(SenseLine::One, sense_one, led_one)).unwrap();
    spawner.spawn(sense_edge_task(SenseLine::Two, sense_two, led_two)).unwrap();
    info!("Handlers at P{}, refresh at P{}", HANDLER_PRIORITY, REFRESH_PRIORITY);

    dispatcher.run()
}
