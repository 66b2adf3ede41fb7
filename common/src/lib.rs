//! Core of the tempclock firmware.
//!
//! A cooperative periodic-task dispatcher driven by a hardware tick, a 2x2
//! strobe/sense keypad, an LM35 temperature channel, a wrapping seconds
//! counter and a 16x2 character display. Everything here is
//! platform-agnostic and shared between the simulator and the Pico 2 build:
//!
//! - [`config`]: periods, conversion constants and display layout
//! - [`ticks`]: task identities and per-task tick counters
//! - [`dispatcher`]: task bindings and the polling loop
//! - [`keypad`]: button matrix decoding and the accumulator law
//! - [`shared`]: state shared between handlers and tasks
//! - [`tasks`]: button (drive strobe), time and temperature tasks
//! - [`refresh`]: display refresh and field formatting
//! - [`hal`]: traits implemented by each board
//! - [`vectors`]: handler table for boards without a real one
//! - [`lcd`]: character grid and its graphics rendering
//! - [`colors`]: panel palette
//! - [`log`]: event ring buffer for front ends
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` outside of tests and never allocates. Shared state
//! uses only word-sized atomics, so it can live in a `static`.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod colors;
pub mod config;
pub mod dispatcher;
pub mod hal;
pub mod keypad;
pub mod lcd;
pub mod log;
pub mod refresh;
pub mod shared;
pub mod tasks;
pub mod ticks;
pub mod vectors;

// Re-export commonly used items
pub use dispatcher::{ConfigError, Dispatcher, Task};
pub use keypad::{Button, ButtonState, DriveLine, KeypadDecoder, SenseLine};
pub use shared::SharedState;
pub use ticks::TaskId;
