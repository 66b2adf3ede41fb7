//! Desktop simulator for the time & temperature indicator.
//!
//! Runs the common core against virtual hardware. Headless by default:
//!
//! ```text
//! simulator [--seconds N] [--png PATH]
//! ```
//!
//! plays a scripted set of key presses, prints the display once per second
//! with the latest events, and optionally saves the final display as a PNG.
//! Built with `--features window` and run without `--seconds`, it opens an
//! SDL2 window instead.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod hardware;
mod headless;
mod sim;
mod timing;
#[cfg(feature = "window")]
mod window;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use tempclock_common::TaskId;
use tempclock_common::lcd::{GRID_SIZE, TextGrid, draw_grid};

use crate::hardware::AdcSource;
use crate::headless::Headless;
use crate::sim::{Frontend, Options, Report};
use crate::timing::{DEFAULT_HEADLESS_SECONDS, PRINT_INTERVAL_MS, SCENARIO, WINDOW_SCALE};

const USAGE: &str = "usage: simulator [--seconds N] [--png PATH]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    seconds: Option<u32>,
    png: Option<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seconds" => {
                let value = args.next().ok_or("--seconds needs a value")?;
                let seconds = value
                    .parse::<u32>()
                    .ok()
                    .filter(|&s| s > 0 && s <= u32::MAX / 1000)
                    .ok_or_else(|| format!("invalid --seconds value `{}`", value))?;
                parsed.seconds = Some(seconds);
            }
            "--png" => {
                let value = args.next().ok_or("--png needs a path")?;
                parsed.png = Some(PathBuf::from(value));
            }
            other => return Err(format!("unexpected argument `{}`", other)),
        }
    }
    Ok(parsed)
}

fn save_png(
    grid: &TextGrid,
    path: &Path,
) -> Result<(), String> {
    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(GRID_SIZE);
    draw_grid(&mut display, grid, Point::zero());
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    display
        .to_rgb_output_image(&output_settings)
        .save_png(path)
        .map_err(|e| e.to_string())
}

fn print_summary(report: &Report) {
    println!(
        "ran {} ms: {} button, {} time, {} temperature passes; {} presses; accumulators {:?}",
        report.elapsed_ms,
        report.passes[TaskId::Button.index()],
        report.passes[TaskId::Time.index()],
        report.passes[TaskId::Temperature.index()],
        report.presses,
        report.buttons.accumulators(),
    );
}

#[cfg(feature = "window")]
fn interactive(args: &Args) -> Option<Box<dyn Frontend>> {
    if args.seconds.is_some() {
        return None;
    }
    Some(Box::new(window::WindowFrontend::new()))
}

#[cfg(not(feature = "window"))]
fn interactive(_args: &Args) -> Option<Box<dyn Frontend>> { None }

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    let (mut frontend, limit_ms) = match interactive(&args) {
        Some(frontend) => (frontend, None),
        None => {
            let seconds = args.seconds.unwrap_or(DEFAULT_HEADLESS_SECONDS);
            let headless: Box<dyn Frontend> = Box::new(Headless::new(&SCENARIO, PRINT_INTERVAL_MS));
            (headless, Some(seconds * 1000))
        }
    };

    let options = Options {
        limit_ms,
        adc: AdcSource::Lm35,
    };
    let report = match sim::run(frontend.as_mut(), options) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    print_summary(&report);

    if let Some(path) = &args.png {
        if let Err(e) = save_png(&report.grid, path) {
            eprintln!("failed to write {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        println!("saved {}", path.display());
    }

    ExitCode::SUCCESS
}
