//! Colour constants for the character-LCD look.
//!
//! The panel imitates a yellow-green STN module: a backlit bezel, faintly
//! visible unlit cells, and dark ink for set pixels.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// Backlight around and between the character cells.
/// RGB565: (14, 44, 2).
pub const BACKLIGHT: Rgb565 = Rgb565::new(14, 44, 2);

/// Unlit character cell, slightly darker than the backlight.
/// RGB565: (12, 38, 2).
pub const UNLIT_CELL: Rgb565 = Rgb565::new(12, 38, 2);

/// Lit pixels of a character.
/// RGB565: (2, 8, 2).
pub const INK: Rgb565 = Rgb565::new(2, 8, 2);

/// Clear colour for the rest of the panel.
pub const BLACK: Rgb565 = Rgb565::BLACK;
