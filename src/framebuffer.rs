//! Framebuffer holding one packed [`Pixel`] per LED.
//!
//! Pixels are stored row-major, so the linear index of a pixel is
//! `row * COLS + column`. Row `s` and row `s + ROWS / 2` are the two rows that
//! share row-pair address `s` and are read together by the scan engine.
//!
//! The framebuffer implements the `embedded-graphics` [`DrawTarget`] trait, so
//! any primitive, text or image can be drawn into it.
//!
//! # Example
//! ```rust
//! use embedded_graphics::pixelcolor::RgbColor;
//! use embedded_graphics::prelude::*;
//! use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
//! use hub75_bitbang::{Color, FrameBuffer};
//!
//! let mut framebuffer = FrameBuffer::<32, 32>::new();
//! Rectangle::new(Point::new(4, 4), Size::new(8, 8))
//!     .into_styled(PrimitiveStyle::with_fill(Color::GREEN))
//!     .draw(&mut framebuffer)
//!     .unwrap();
//! assert_eq!(framebuffer.get(4, 4).unwrap().b(), 255);
//! ```

use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::prelude::{OriginDimensions, Point, Size};

use crate::{compute_rows, Color, Pixel, ADDRESS_LINES, HEIGHT, WIDTH};

/// Test pattern value for the top-left corner (channel A)
pub const TEST_PATTERN_TOP_LEFT: Pixel = Pixel::from_raw(0x0000_0050);
/// Test pattern value for the top-right corner (channel B)
pub const TEST_PATTERN_TOP_RIGHT: Pixel = Pixel::from_raw(0x0000_5000);
/// Test pattern value for the bottom-left corner (channel C)
pub const TEST_PATTERN_BOTTOM_LEFT: Pixel = Pixel::from_raw(0x0050_0000);
/// Test pattern value for the bottom-right corner (channels B and C)
pub const TEST_PATTERN_BOTTOM_RIGHT: Pixel = Pixel::from_raw(0x0050_5000);

/// Framebuffer for a single panel.
///
/// # Type Parameters
/// - `ROWS`: Total number of rows in the panel, even and at most 32
/// - `COLS`: Number of columns in the panel
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer<const ROWS: usize = HEIGHT, const COLS: usize = WIDTH> {
    pixels: [[Pixel; COLS]; ROWS],
}

impl<const ROWS: usize, const COLS: usize> FrameBuffer<ROWS, COLS> {
    const GEOMETRY: () = assert!(
        ROWS > 0 && ROWS % 2 == 0 && COLS > 0 && compute_rows(ROWS) <= 1 << ADDRESS_LINES,
        "panel rows must be even and addressable with four address lines"
    );

    /// Creates a framebuffer with every pixel off.
    #[must_use]
    pub const fn new() -> Self {
        let () = Self::GEOMETRY;
        Self {
            pixels: [[Pixel::BLACK; COLS]; ROWS],
        }
    }

    /// Sets every pixel to zero.
    pub fn clear(&mut self) {
        self.as_mut_slice().fill(Pixel::BLACK);
    }

    /// Lights the four corners with distinct colours.
    ///
    /// Top-left is dim red, top-right dim green, bottom-left dim blue and
    /// bottom-right dim cyan, which makes swapped colour lines and mirrored
    /// halves easy to spot.
    pub fn fill_test_pattern(&mut self) {
        self.pixels[0][0] = TEST_PATTERN_TOP_LEFT;
        self.pixels[0][COLS - 1] = TEST_PATTERN_TOP_RIGHT;
        self.pixels[ROWS - 1][0] = TEST_PATTERN_BOTTOM_LEFT;
        self.pixels[ROWS - 1][COLS - 1] = TEST_PATTERN_BOTTOM_RIGHT;
    }

    /// Returns the pixel at column `x` of row `y`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<Pixel> {
        self.pixels.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Sets the pixel at column `x` of row `y`. Out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, pixel: Pixel) {
        if let Some(p) = self.pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
            *p = pixel;
        }
    }

    /// Set a pixel from an `embedded-graphics` point and colour.
    pub fn set_pixel(&mut self, p: Point, color: Color) {
        if p.x < 0 || p.y < 0 {
            return;
        }
        self.set(p.x as usize, p.y as usize, color.into());
    }

    /// One row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if `y >= ROWS`.
    #[inline]
    #[must_use]
    pub fn row(&self, y: usize) -> &[Pixel; COLS] {
        &self.pixels[y]
    }

    /// All pixels in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[Pixel] {
        self.pixels.as_flattened()
    }

    /// All pixels in row-major order, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [Pixel] {
        self.pixels.as_flattened_mut()
    }
}

impl<const ROWS: usize, const COLS: usize> Default for FrameBuffer<ROWS, COLS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROWS: usize, const COLS: usize> core::ops::Index<usize> for FrameBuffer<ROWS, COLS> {
    type Output = Pixel;

    fn index(&self, index: usize) -> &Pixel {
        &self.as_slice()[index]
    }
}

impl<const ROWS: usize, const COLS: usize> core::ops::IndexMut<usize> for FrameBuffer<ROWS, COLS> {
    fn index_mut(&mut self, index: usize) -> &mut Pixel {
        &mut self.as_mut_slice()[index]
    }
}

impl<const ROWS: usize, const COLS: usize> OriginDimensions for FrameBuffer<ROWS, COLS> {
    fn size(&self) -> Size {
        Size::new(COLS as u32, ROWS as u32)
    }
}

impl<const ROWS: usize, const COLS: usize> DrawTarget for FrameBuffer<ROWS, COLS> {
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = embedded_graphics::Pixel<Self::Color>>,
    {
        for pixel in pixels {
            self.set_pixel(pixel.0, pixel.1);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.as_mut_slice().fill(color.into());
        Ok(())
    }
}

impl<const ROWS: usize, const COLS: usize> core::fmt::Debug for FrameBuffer<ROWS, COLS> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let lit = self.as_slice().iter().filter(|p| **p != Pixel::BLACK).count();
        f.debug_struct("FrameBuffer")
            .field("rows", &ROWS)
            .field("cols", &COLS)
            .field("lit", &lit)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<const ROWS: usize, const COLS: usize> defmt::Format for FrameBuffer<ROWS, COLS> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "FrameBuffer<{}, {}>", ROWS, COLS);
    }
}
