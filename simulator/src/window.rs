//! SDL2 window front end.
//!
//! Keys Q/W/A/S are buttons S1..S4, laid out like the matrix. Virtual time is
//! paced to the wall clock.

use std::ops::ControlFlow;
use std::thread;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use tempclock_common::Button;
use tempclock_common::colors::BLACK;
use tempclock_common::lcd::{GRID_SIZE, TextGrid, draw_grid};
use tempclock_common::log::EventLog;

use crate::sim::Frontend;
use crate::timing::{REAL_TIME_PER_MS, WINDOW_SCALE};

fn key_button(keycode: Keycode) -> Option<Button> {
    match keycode {
        Keycode::Q => Some(Button::S1),
        Keycode::W => Some(Button::S2),
        Keycode::A => Some(Button::S3),
        Keycode::S => Some(Button::S4),
        _ => None,
    }
}

pub struct WindowFrontend {
    display: SimulatorDisplay<Rgb565>,
    window: Window,
    held: [bool; 4],
    started: Instant,
    printed: u32,
}

impl WindowFrontend {
    pub fn new() -> Self {
        let mut display = SimulatorDisplay::new(GRID_SIZE);
        display.clear(BLACK).ok();
        let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
        let window = Window::new("tempclock", &output_settings);
        Self {
            display,
            window,
            held: [false; 4],
            started: Instant::now(),
            printed: 0,
        }
    }
}

impl Frontend for WindowFrontend {
    fn buttons(
        &mut self,
        _now_ms: u32,
    ) -> [bool; 4] {
        self.held
    }

    fn frame(
        &mut self,
        grid: &TextGrid,
        log: &EventLog,
        now_ms: u32,
    ) -> ControlFlow<()> {
        draw_grid(&mut self.display, grid, Point::zero());
        self.window.update(&self.display);

        for ev in self.window.events() {
            match ev {
                SimulatorEvent::Quit => return ControlFlow::Break(()),
                SimulatorEvent::KeyDown { keycode, repeat, .. } if !repeat => {
                    if let Some(button) = key_button(keycode) {
                        self.held[button.index()] = true;
                    }
                }
                SimulatorEvent::KeyUp { keycode, .. } => {
                    if let Some(button) = key_button(keycode) {
                        self.held[button.index()] = false;
                    }
                }
                _ => {}
            }
        }

        for line in log.since(self.printed) {
            println!("{}", line);
        }
        self.printed = log.pushed();

        let target = REAL_TIME_PER_MS * now_ms;
        let elapsed = self.started.elapsed();
        if let Some(remaining) = target.checked_sub(elapsed) {
            thread::sleep(remaining);
        }

        ControlFlow::Continue(())
    }
}
