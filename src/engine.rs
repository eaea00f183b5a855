//! The scan-refresh engine.
//!
//! One call to [`ScanEngine::render`] is one frame:
//!
//! ```text
//! for each row pair s:
//!     select_row(s)
//!     for each plane p in 0..8:
//!         for each column x, ascending:
//!             drive_column(top[s][x], bottom[s][x], p); pulse CLK
//!         pulse LAT
//!         OE on, hold weight[p], OE off
//! ```
//!
//! The display is always blanked before the address or the shift register
//! change again. While the next plane is shifted in, the panel would otherwise
//! keep showing the previous plane, adding its image to the next plane's time
//! slot.
//!
//! The engine never yields. The frame takes roughly
//! `ROWS / 2 * 255 * base_hold` of lit time plus the shifting overhead, and
//! the hold times are only as accurate as the [`DelayNs`] implementation and
//! whatever interrupts are allowed to run during them.

use embedded_hal::delay::DelayNs;

use crate::driver::{drive_column, select_row};
use crate::framebuffer::FrameBuffer;
use crate::outputs::Hub75Outputs;
use crate::timing::BitPlaneWeights;
use crate::{compute_rows, PLANES};

/// Drives a panel from a [`FrameBuffer`] using Binary Code Modulation.
#[derive(Debug)]
pub struct ScanEngine<O, D> {
    outputs: O,
    delay: D,
    weights: BitPlaneWeights,
}

impl<O: Hub75Outputs, D: DelayNs> ScanEngine<O, D> {
    /// Creates an engine. Call [`blank`](Self::blank) before the first frame
    /// if the outputs might power up enabled.
    pub fn new(outputs: O, delay: D, weights: BitPlaneWeights) -> Self {
        Self {
            outputs,
            delay,
            weights,
        }
    }

    /// Turns the display off.
    ///
    /// # Errors
    ///
    /// Returns the output error if the enable line cannot be driven.
    pub fn blank(&mut self) -> Result<(), O::Error> {
        self.outputs.set_display_enabled(false)
    }

    /// Renders one complete frame.
    ///
    /// # Errors
    ///
    /// Stops at the first output error and returns it. The display is left
    /// in whatever state the failing line left it.
    pub fn render<const ROWS: usize, const COLS: usize>(
        &mut self,
        framebuffer: &FrameBuffer<ROWS, COLS>,
    ) -> Result<(), O::Error> {
        let scan = compute_rows(ROWS);
        for s in 0..scan {
            select_row(&mut self.outputs, s as u8)?;
            let top = framebuffer.row(s);
            let bottom = framebuffer.row(s + scan);
            for plane in 0..PLANES {
                for (t, b) in top.iter().zip(bottom) {
                    drive_column(&mut self.outputs, *t, *b, plane)?;
                    self.outputs.pulse_clock()?;
                }
                self.show_plane(plane)?;
            }
        }
        Ok(())
    }

    fn show_plane(&mut self, plane: u8) -> Result<(), O::Error> {
        self.outputs.pulse_latch()?;
        self.outputs.set_display_enabled(true)?;
        self.weights.hold_for(&mut self.delay, plane);
        self.outputs.set_display_enabled(false)
    }

    /// The hold table in use.
    pub fn weights(&self) -> &BitPlaneWeights {
        &self.weights
    }

    /// Replaces the hold table, e.g. to dim the whole panel.
    pub fn set_weights(&mut self, weights: BitPlaneWeights) {
        self.weights = weights;
    }

    /// The output lines.
    pub fn outputs(&self) -> &O {
        &self.outputs
    }

    /// The delay provider.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Gives back the output lines and the delay provider.
    pub fn release(self) -> (O, D) {
        (self.outputs, self.delay)
    }
}
