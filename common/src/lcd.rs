//! 16x2 character display emulated on a graphics panel.
//!
//! [`TextGrid`] is the character memory: it implements [`CharDisplay`] and
//! clips writes the way a character module drops characters past the end of
//! a line. [`draw_grid`] renders the grid with ProFont onto any
//! `embedded-graphics` target, so the simulator window, PNG snapshots and the
//! ST7789 framebuffer all show the same picture.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use profont::PROFONT_24_POINT;

use crate::colors::{BACKLIGHT, INK, UNLIT_CELL};
use crate::config::{LCD_COLUMNS, LCD_ROWS};
use crate::hal::CharDisplay;

// =============================================================================
// Geometry
// =============================================================================

pub const FONT: &MonoFont<'static> = &PROFONT_24_POINT;

const INK_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(FONT, INK);

/// Backlight gap between cells.
pub const CELL_GAP: u32 = 2;

/// Bezel around the cell matrix.
pub const BEZEL: u32 = 8;

pub const CELL_WIDTH: u32 = FONT.character_size.width;
pub const CELL_HEIGHT: u32 = FONT.character_size.height;

/// Pixel size of the whole emulated module.
pub const GRID_SIZE: Size = Size::new(
    2 * BEZEL + LCD_COLUMNS as u32 * (CELL_WIDTH + CELL_GAP) - CELL_GAP,
    2 * BEZEL + LCD_ROWS as u32 * (CELL_HEIGHT + CELL_GAP) - CELL_GAP,
);

/// Must fit the 320x240 ST7789 panel in landscape.
const _: () = assert!(GRID_SIZE.width <= 320 && GRID_SIZE.height <= 240);

/// Top-left pixel of a character cell, relative to the grid origin.
#[inline]
pub const fn cell_origin(
    column: usize,
    row: usize,
) -> Point {
    Point::new(
        (BEZEL + column as u32 * (CELL_WIDTH + CELL_GAP)) as i32,
        (BEZEL + row as u32 * (CELL_HEIGHT + CELL_GAP)) as i32,
    )
}

// =============================================================================
// Character Memory
// =============================================================================

/// Row text, up to four UTF-8 bytes per cell.
pub type RowText = String<{ LCD_COLUMNS * 4 }>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextGrid {
    cells: [[char; LCD_COLUMNS]; LCD_ROWS],
}

impl TextGrid {
    pub const fn new() -> Self { Self { cells: [[' '; LCD_COLUMNS]; LCD_ROWS] } }

    /// Character at a cell, `None` outside the grid.
    pub fn cell(
        &self,
        column: usize,
        row: usize,
    ) -> Option<char> {
        self.cells.get(row).and_then(|r| r.get(column)).copied()
    }

    /// One row as a string, trailing blanks included.
    pub fn row(
        &self,
        row: usize,
    ) -> RowText {
        let mut s = RowText::new();
        if let Some(cells) = self.cells.get(row) {
            for &c in cells {
                s.push(c).ok();
            }
        }
        s
    }
}

impl Default for TextGrid {
    fn default() -> Self { Self::new() }
}

impl CharDisplay for TextGrid {
    fn clear(&mut self) { self.cells = [[' '; LCD_COLUMNS]; LCD_ROWS]; }

    fn write(
        &mut self,
        column: u8,
        row: u8,
        text: &str,
    ) {
        let Some(cells) = self.cells.get_mut(usize::from(row)) else {
            return;
        };
        for (cell, c) in cells.iter_mut().skip(usize::from(column)).zip(text.chars()) {
            *cell = c;
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Draw the whole module with its top-left corner at `origin`.
pub fn draw_grid<D>(
    display: &mut D,
    grid: &TextGrid,
    origin: Point,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(origin, GRID_SIZE)
        .into_styled(PrimitiveStyle::with_fill(BACKLIGHT))
        .draw(display)
        .ok();

    let cell_style = PrimitiveStyle::with_fill(UNLIT_CELL);
    let mut glyph = [0u8; 4];
    for (row, cells) in grid.cells.iter().enumerate() {
        for (column, &c) in cells.iter().enumerate() {
            let top_left = origin + cell_origin(column, row);
            Rectangle::new(top_left, Size::new(CELL_WIDTH, CELL_HEIGHT))
                .into_styled(cell_style)
                .draw(display)
                .ok();
            if c != ' ' {
                Text::with_baseline(c.encode_utf8(&mut glyph), top_left, INK_STYLE, Baseline::Top)
                    .draw(display)
                    .ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// In-memory target that remembers the last colour of every pixel.
    struct Canvas {
        size: Size,
        pixels: HashMap<Point, Rgb565>,
    }

    impl Canvas {
        fn new(size: Size) -> Self {
            Self {
                size,
                pixels: HashMap::new(),
            }
        }

        fn count_in(
            &self,
            area: Rectangle,
            color: Rgb565,
        ) -> usize {
            area.points().filter(|p| self.pixels.get(p) == Some(&color)).count()
        }
    }

    impl OriginDimensions for Canvas {
        fn size(&self) -> Size { self.size }
    }

    impl DrawTarget for Canvas {
        type Color = Rgb565;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(
            &mut self,
            pixels: I,
        ) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if self.bounding_box().contains(point) {
                    self.pixels.insert(point, color);
                }
            }
            Ok(())
        }
    }

    fn cell_area(
        column: usize,
        row: usize,
    ) -> Rectangle {
        Rectangle::new(cell_origin(column, row), Size::new(CELL_WIDTH, CELL_HEIGHT))
    }

    #[test]
    fn test_write_and_read_back() {
        let mut grid = TextGrid::new();
        grid.write(0, 0, "Temp:");
        grid.write(14, 1, "42");
        assert_eq!(grid.row(0).as_str(), "Temp:           ");
        assert_eq!(grid.row(1).as_str(), "              42");
        assert_eq!(grid.cell(15, 1), Some('2'));
    }

    #[test]
    fn test_write_clips_at_right_edge() {
        let mut grid = TextGrid::new();
        grid.write(14, 0, "abcd");
        assert_eq!(grid.row(0).as_str(), "              ab");
        assert_eq!(grid.row(1).as_str(), " ".repeat(LCD_COLUMNS), "no wrap onto the next row");
    }

    #[test]
    fn test_write_outside_grid_is_dropped() {
        let mut grid = TextGrid::new();
        grid.write(0, 2, "x");
        grid.write(16, 0, "x");
        assert_eq!(grid, TextGrid::new());
        assert_eq!(grid.cell(16, 0), None);
        assert_eq!(grid.cell(0, 2), None);
    }

    #[test]
    fn test_multibyte_character_takes_one_cell() {
        let mut grid = TextGrid::new();
        grid.write(11, 0, "\u{b0}C");
        assert_eq!(grid.cell(11, 0), Some('\u{b0}'));
        assert_eq!(grid.cell(12, 0), Some('C'));
    }

    #[test]
    fn test_clear_blanks_grid() {
        let mut grid = TextGrid::new();
        grid.write(0, 0, "Sec:");
        grid.clear();
        assert_eq!(grid, TextGrid::default());
    }

    #[test]
    fn test_draw_grid_inks_only_written_cells() {
        let mut grid = TextGrid::new();
        grid.write(0, 0, "T");
        let mut canvas = Canvas::new(GRID_SIZE);
        draw_grid(&mut canvas, &grid, Point::zero());

        assert!(canvas.count_in(cell_area(0, 0), INK) > 0, "glyph drawn in its cell");
        assert_eq!(canvas.count_in(cell_area(1, 0), INK), 0);
        assert_eq!(
            canvas.count_in(cell_area(15, 1), UNLIT_CELL),
            (CELL_WIDTH * CELL_HEIGHT) as usize,
            "blank cell is fully unlit"
        );
        assert_eq!(canvas.pixels.get(&Point::zero()), Some(&BACKLIGHT), "bezel is backlit");
    }

    #[test]
    fn test_draw_grid_honours_origin() {
        let grid = TextGrid::new();
        let offset = Point::new(10, 20);
        let mut canvas = Canvas::new(GRID_SIZE + Size::new(10, 20));
        draw_grid(&mut canvas, &grid, offset);
        assert_eq!(canvas.pixels.get(&Point::new(9, 19)), None);
        assert_eq!(canvas.pixels.get(&offset), Some(&BACKLIGHT));
    }
}
