//! Async ST7789 transport for embassy-rp.
//!
//! The panel keeps whatever was last written to it, so only the character
//! module window is refreshed after start-up. The rest of the panel is
//! cleared once during `init()`.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Async, Spi};
use embassy_time::Timer;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use tempclock_pico2::config::{FRAME_BYTES, FRAME_HEIGHT, FRAME_ORIGIN, FRAME_WIDTH, PANEL_HEIGHT, PANEL_WIDTH};

// ST7789 Commands
const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const NORON: u8 = 0x13;
const INVON: u8 = 0x21;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

// MADCTL flags
const MADCTL_MX: u8 = 0x40; // Column address order
const MADCTL_MV: u8 = 0x20; // Row/column exchange

/// Pixels per SPI write while clearing the panel.
const CLEAR_CHUNK_PIXELS: usize = 320;

/// Owns the SPI bus and control pins of the panel.
pub struct St7789<'d> {
    spi: Spi<'d, SPI0, Async>,
    dc: Output<'d>,
    cs: Output<'d>,
}

impl<'d> St7789<'d> {
    pub fn new(
        spi: Spi<'d, SPI0, Async>,
        dc: Output<'d>,
        cs: Output<'d>,
    ) -> Self {
        Self { spi, dc, cs }
    }

    /// Reset and configure the panel, fill it with `background`, then leave
    /// the address window on the character module.
    pub async fn init(
        &mut self,
        background: Rgb565,
    ) {
        self.write_command(SWRESET).await;
        Timer::after_millis(150).await;

        self.write_command(SLPOUT).await;
        Timer::after_millis(10).await;

        // RGB565
        self.write_command(COLMOD).await;
        self.write_data(&[0x55]).await;

        // Landscape: MV=1 (row/col exchange), MX=1 (mirror X)
        self.write_command(MADCTL).await;
        self.write_data(&[MADCTL_MV | MADCTL_MX]).await;

        // Inversion on (required for PIM715)
        self.write_command(INVON).await;
        Timer::after_millis(10).await;

        self.write_command(NORON).await;
        Timer::after_millis(10).await;

        self.set_window(0, 0, PANEL_WIDTH as u16, PANEL_HEIGHT as u16).await;
        self.fill_window(background, (PANEL_WIDTH * PANEL_HEIGHT) as usize).await;

        self.write_command(DISPON).await;
        Timer::after_millis(10).await;

        self.set_window(
            FRAME_ORIGIN.x as u16,
            FRAME_ORIGIN.y as u16,
            FRAME_WIDTH as u16,
            FRAME_HEIGHT as u16,
        )
        .await;
    }

    /// Send a command byte (DC low, CS low during transfer).
    async fn write_command(
        &mut self,
        cmd: u8,
    ) {
        self.cs.set_low();
        self.dc.set_low();
        self.spi.write(&[cmd]).await.ok();
        self.cs.set_high();
    }

    /// Send data bytes (DC high, CS low during transfer).
    async fn write_data(
        &mut self,
        data: &[u8],
    ) {
        self.cs.set_low();
        self.dc.set_high();
        self.spi.write(data).await.ok();
        self.cs.set_high();
    }

    async fn set_window(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
    ) {
        let x1 = x + w - 1;
        let y1 = y + h - 1;

        self.write_command(CASET).await;
        self.write_data(&[(x >> 8) as u8, x as u8, (x1 >> 8) as u8, x1 as u8])
            .await;

        self.write_command(RASET).await;
        self.write_data(&[(y >> 8) as u8, y as u8, (y1 >> 8) as u8, y1 as u8])
            .await;
    }

    /// Stream `pixels` copies of one colour into the current window.
    async fn fill_window(
        &mut self,
        color: Rgb565,
        pixels: usize,
    ) {
        let bytes = RawU16::from(color).into_inner().to_be_bytes();
        let mut chunk = [0u8; CLEAR_CHUNK_PIXELS * 2];
        for pair in chunk.chunks_exact_mut(2) {
            pair.copy_from_slice(&bytes);
        }

        self.cs.set_low();
        self.dc.set_low();
        self.spi.blocking_write(&[RAMWR]).ok();
        self.dc.set_high();
        let mut remaining = pixels;
        while remaining > 0 {
            let n = remaining.min(CLEAR_CHUNK_PIXELS);
            self.spi.write(&chunk[..n * 2]).await.ok();
            remaining -= n;
        }
        self.cs.set_high();
    }

    /// Send one frame into the character module window via DMA.
    pub async fn flush(
        &mut self,
        frame: &[u8; FRAME_BYTES],
    ) {
        self.cs.set_low();
        self.dc.set_low();
        // Blocking write for the single command byte (faster than DMA setup)
        self.spi.blocking_write(&[RAMWR]).ok();
        self.dc.set_high();
        self.spi.write(frame).await.ok();
        self.cs.set_high();
    }
}
