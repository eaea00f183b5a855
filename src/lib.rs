//! Bit-banged refresh engine for HUB75 RGB LED matrix panels.
//!
//! ## How HUB75 LED Displays Work
//!
//! HUB75 RGB LED matrix panels are scanned, time-multiplexed displays that behave like a long
//! daisy-chained shift register rather than a random-access framebuffer.
//!
//! ### Signal names
//! - **R1 G1 B1 / R2 G2 B2** – Serial colour data for the upper and lower halves of the active scan line
//! - **CLK** – Shift-register clock; every pulse pushes the six colour bits one pixel along
//! - **LAT / STB** – Latch; copies the shift-register contents to the LED drivers for the row currently selected by the address lines
//! - **OE** – Output-Enable (active LOW): LEDs are lit while OE is LOW and blanked when it is HIGH
//! - **A B C D** – Row-address select lines (choose which pair of rows is lit)
//!
//! ### Row-pair scanning
//! A 32×32 panel is a 1/16-scan panel: the four address lines select one of
//! sixteen row pairs, row `s` of the top half and row `s + 16` of the bottom
//! half, which are driven in parallel through the two sets of colour lines.
//!
//! ### Brightness and colour depth (Binary Code Modulation)
//! The panel can only switch an LED fully on or fully off. Eight bits of
//! intensity per channel are produced by Binary Code Modulation (BCM): for
//! every row pair the driver shifts out eight bit-planes, one per bit of the
//! channel values, and lights each plane for a time proportional to its binary
//! weight (1, 2, 4, … 128). The sum of the on-times of the planes whose bit is
//! set is proportional to the channel value.
//!
//! ## This crate
//!
//! Everything here is driven from the CPU, pin by pin, with no DMA or timer
//! peripherals involved:
//!
//! - [`gamma::GammaTable`] – 256-entry perceptual correction lookup
//! - [`framebuffer::FrameBuffer`] – packed [`Pixel`]s, drawable with `embedded-graphics`
//! - [`pattern::NoiseGenerator`] – gamma-ramped pseudo-random noise
//! - [`driver`] – row address and bit-plane column drivers
//! - [`outputs`] – the [`outputs::Hub75Outputs`] capability trait and its `embedded-hal` pin implementation
//! - [`timing::BitPlaneWeights`] – the exponential hold table
//! - [`engine::ScanEngine`] – the scan-refresh loop
//! - [`link`] – single-slot completion signal for the serial status link
//! - [`controller::Controller`] – startup sequence, frame cadence and heartbeat
//!
//! The hold time of each plane is a busy-wait through
//! [`embedded_hal::delay::DelayNs`]. The ratios between planes are what matter
//! for correct brightness; anything that preempts the busy-wait for a noticeable
//! fraction of the shortest hold shows up as flicker.
//!
//! ## Available Feature Flags
//!
//! ### `defmt` Feature
//! Implements `defmt::Format` for the public data types and emits log events
//! from the controller through the `defmt` logging framework.
//!
//! ### `critical-section` Feature
//! Forwards to `portable-atomic/critical-section`. Required on targets without
//! atomic compare-and-swap (e.g. `thumbv6m-none-eabi`) so the completion signal
//! can be consumed atomically.
#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use bitfield::bitfield;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::pixelcolor::RgbColor;

pub mod config;
pub mod controller;
pub mod driver;
pub mod engine;
pub mod framebuffer;
pub mod gamma;
pub mod link;
pub mod outputs;
pub mod pattern;
pub mod timing;

#[cfg(test)]
mod mock;

pub use config::Config;
pub use controller::Controller;
pub use engine::ScanEngine;
pub use framebuffer::FrameBuffer;
pub use gamma::GammaTable;

/// Color type used by the `embedded-graphics` integration
pub type Color = Rgb888;

/// Panel height in pixels
pub const HEIGHT: usize = 32;

/// Panel width in pixels
pub const WIDTH: usize = 32;

/// Number of bit-planes per channel
pub const PLANES: u8 = 8;

/// Number of row-address lines (A-D)
pub const ADDRESS_LINES: usize = 4;

/// Computes the number of row pairs scanned for a panel with `rows` rows
///
/// # Arguments
///
/// * `rows` - Total number of rows in the display
///
/// # Returns
///
/// Number of row-pair addresses, one per pair of parallel-driven rows
#[must_use]
pub const fn compute_rows(rows: usize) -> usize {
    rows / 2
}

bitfield! {
    /// A packed 24-bit colour value.
    ///
    /// The bit layout is as follows:
    /// - Bits 31-24: ignored
    /// - Bits 23-16: Channel C (blue)
    /// - Bits 15-8: Channel B (green)
    /// - Bits 7-0: Channel A (red)
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct Pixel(u32);
    impl Debug;
    /// Channel A intensity
    pub u8, a, set_a: 7, 0;
    /// Channel B intensity
    pub u8, b, set_b: 15, 8;
    /// Channel C intensity
    pub u8, c, set_c: 23, 16;
}

impl Pixel {
    /// A pixel with all channels off.
    pub const BLACK: Self = Self(0);

    /// Packs three channel intensities.
    #[must_use]
    pub const fn new(a: u8, b: u8, c: u8) -> Self {
        Self((a as u32) | ((b as u32) << 8) | ((c as u32) << 16))
    }

    /// Wraps a raw packed value. Bits above 23 are kept but never read.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw packed value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns bit `plane` of channels A, B and C.
    #[must_use]
    pub const fn plane_bits(self, plane: u8) -> [bool; 3] {
        let p = plane as u32;
        [
            (self.0 >> p) & 1 != 0,
            (self.0 >> (p + 8)) & 1 != 0,
            (self.0 >> (p + 16)) & 1 != 0,
        ]
    }
}

impl From<Color> for Pixel {
    fn from(color: Color) -> Self {
        Self::new(color.r(), color.g(), color.b())
    }
}

impl From<Pixel> for Color {
    fn from(pixel: Pixel) -> Self {
        Color::new(pixel.a(), pixel.b(), pixel.c())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Pixel {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Pixel({=u8:#x}, {=u8:#x}, {=u8:#x})", self.a(), self.b(), self.c());
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::format;

    use super::*;

    #[test]
    fn test_compute_rows() {
        assert_eq!(compute_rows(32), 16);
        assert_eq!(compute_rows(16), 8);
        assert_eq!(compute_rows(2), 1);
        assert_eq!(compute_rows(HEIGHT), 16);
    }

    #[test]
    fn test_pixel_channel_layout() {
        let pixel = Pixel::from_raw(0x0033_2211);
        assert_eq!(pixel.a(), 0x11);
        assert_eq!(pixel.b(), 0x22);
        assert_eq!(pixel.c(), 0x33);
        assert_eq!(Pixel::new(0x11, 0x22, 0x33), pixel);
    }

    #[test]
    fn test_pixel_setters() {
        let mut pixel = Pixel::BLACK;
        pixel.set_b(0xAB);
        assert_eq!(pixel.raw(), 0x0000_AB00);
        pixel.set_c(0xCD);
        pixel.set_a(0xEF);
        assert_eq!(pixel.raw(), 0x00CD_ABEF);
    }

    #[test]
    fn test_pixel_high_bits_ignored() {
        let pixel = Pixel::from_raw(0xFF00_0000);
        assert_eq!(pixel.a(), 0);
        assert_eq!(pixel.b(), 0);
        assert_eq!(pixel.c(), 0);
        for plane in 0..PLANES {
            assert_eq!(pixel.plane_bits(plane), [false; 3]);
        }
        assert_eq!(Color::from(pixel), Color::BLACK);
    }

    #[test]
    fn test_pixel_plane_bits() {
        let pixel = Pixel::new(0x50, 0x01, 0x80);
        assert_eq!(pixel.plane_bits(0), [false, true, false]);
        assert_eq!(pixel.plane_bits(4), [true, false, false]);
        assert_eq!(pixel.plane_bits(6), [true, false, false]);
        assert_eq!(pixel.plane_bits(7), [false, false, true]);
    }

    #[test]
    fn test_color_conversion() {
        let pixel = Pixel::from(Color::new(1, 2, 3));
        assert_eq!(pixel.raw(), 0x0003_0201);
        assert_eq!(Color::from(pixel), Color::new(1, 2, 3));
        assert_eq!(Pixel::from(Color::RED), Pixel::new(255, 0, 0));
    }

    #[test]
    fn test_pixel_debug() {
        let debug = format!("{:?}", Pixel::new(1, 2, 3));
        assert!(debug.contains("Pixel"));
    }
}
