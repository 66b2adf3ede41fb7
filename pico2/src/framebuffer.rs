//! RGB565 framebuffer for the character module area of the panel.
//!
//! Pixels are stored big-endian, the byte order the ST7789 expects, so a
//! finished frame goes to the panel in one SPI transfer.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::{FRAME_BYTES, FRAME_HEIGHT, FRAME_WIDTH};

const WIDTH: usize = FRAME_WIDTH as usize;

#[inline]
fn pixel_bytes(color: Rgb565) -> [u8; 2] { RawU16::from(color).into_inner().to_be_bytes() }

/// Draw target over a borrowed frame. Create one per frame.
pub struct Framebuffer<'a> {
    bytes: &'a mut [u8; FRAME_BYTES],
}

impl<'a> Framebuffer<'a> {
    pub fn new(bytes: &'a mut [u8; FRAME_BYTES]) -> Self { Self { bytes } }

    #[inline]
    fn offset(
        x: u32,
        y: u32,
    ) -> usize {
        (y as usize * WIDTH + x as usize) * 2
    }

    #[inline]
    fn set_pixel(
        &mut self,
        point: Point,
        color: Rgb565,
    ) {
        if point.x >= 0 && point.y >= 0 && (point.x as u32) < FRAME_WIDTH && (point.y as u32) < FRAME_HEIGHT {
            let idx = Self::offset(point.x as u32, point.y as u32);
            self.bytes[idx..idx + 2].copy_from_slice(&pixel_bytes(color));
        }
    }
}

impl OriginDimensions for Framebuffer<'_> {
    fn size(&self) -> Size { Size::new(FRAME_WIDTH, FRAME_HEIGHT) }
}

impl DrawTarget for Framebuffer<'_> {
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
            self.set_pixel(point, color);
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let drawable_area = area.intersection(&self.bounding_box());
        if drawable_area.size == Size::zero() {
            return Ok(());
        }

        let pixel = pixel_bytes(color);
        let x = drawable_area.top_left.x as u32;
        let width = drawable_area.size.width as usize;
        for y in drawable_area.rows() {
            let start = Self::offset(x, y as u32);
            for chunk in self.bytes[start..start + width * 2].chunks_exact_mut(2) {
                chunk.copy_from_slice(&pixel);
            }
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let pixel = pixel_bytes(color);
        for chunk in self.bytes.chunks_exact_mut(2) {
            chunk.copy_from_slice(&pixel);
        }
        Ok(())
    }
}
