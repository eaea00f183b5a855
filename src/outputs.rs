//! The digital lines of a HUB75 connector.
//!
//! [`Hub75Outputs`] is the capability the scan engine needs: one method per
//! line or line group. [`Hub75Pins`] implements it on top of thirteen
//! `embedded-hal` output pins.
//!
//! # Example
//! ```rust,ignore
//! // rp2040: every pin erased to the same dynamic type
//! let pins = Hub75Pins {
//!     address: [a.into_push_pull_output().into_dyn_pin(), /* B, C, D */],
//!     top: [r1, g1, b1],
//!     bottom: [r2, g2, b2],
//!     clock: clk,
//!     latch: lat,
//!     output_enable: oe,
//! };
//! ```

use embedded_hal::digital::{OutputPin, PinState};

use crate::driver::{ColumnBits, RowAddress};
use crate::ADDRESS_LINES;

/// Output lines driven by the scan engine.
///
/// Implementations only set levels; all sequencing is done by the caller.
pub trait Hub75Outputs {
    /// Error raised by the underlying lines
    type Error;

    /// Drives the four row-address lines.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be driven.
    fn set_address(&mut self, address: RowAddress) -> Result<(), Self::Error>;

    /// Drives the six colour lines.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be driven.
    fn set_colors(&mut self, bits: ColumnBits) -> Result<(), Self::Error>;

    /// Pulses the shift clock once, moving the colour lines into the panel's
    /// column shift register.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be driven.
    fn pulse_clock(&mut self) -> Result<(), Self::Error>;

    /// Pulses the latch, copying the shift register to the output drivers.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be driven.
    fn pulse_latch(&mut self) -> Result<(), Self::Error>;

    /// Lights (`true`) or blanks (`false`) the selected row pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be driven.
    fn set_display_enabled(&mut self, enabled: bool) -> Result<(), Self::Error>;
}

impl<T: Hub75Outputs + ?Sized> Hub75Outputs for &mut T {
    type Error = T::Error;

    fn set_address(&mut self, address: RowAddress) -> Result<(), Self::Error> {
        T::set_address(self, address)
    }

    fn set_colors(&mut self, bits: ColumnBits) -> Result<(), Self::Error> {
        T::set_colors(self, bits)
    }

    fn pulse_clock(&mut self) -> Result<(), Self::Error> {
        T::pulse_clock(self)
    }

    fn pulse_latch(&mut self) -> Result<(), Self::Error> {
        T::pulse_latch(self)
    }

    fn set_display_enabled(&mut self, enabled: bool) -> Result<(), Self::Error> {
        T::set_display_enabled(self, enabled)
    }
}

/// HUB75 connector wired to individual GPIO pins.
///
/// All pins share one type, which is what the HALs' erased or dynamic pin
/// types give you. Output enable is active low: the panel is lit while
/// `output_enable` is low.
#[derive(Debug)]
pub struct Hub75Pins<P> {
    /// A, B, C, D
    pub address: [P; ADDRESS_LINES],
    /// R1, G1, B1
    pub top: [P; 3],
    /// R2, G2, B2
    pub bottom: [P; 3],
    /// CLK
    pub clock: P,
    /// LAT / STB
    pub latch: P,
    /// OE
    pub output_enable: P,
}

impl<P: OutputPin> Hub75Pins<P> {
    /// Drives every line to its idle level: data and address low, clock and
    /// latch low, display blanked.
    ///
    /// # Errors
    ///
    /// Returns the first pin error encountered.
    pub fn idle(&mut self) -> Result<(), P::Error> {
        for pin in self
            .address
            .iter_mut()
            .chain(self.top.iter_mut())
            .chain(self.bottom.iter_mut())
        {
            pin.set_low()?;
        }
        self.clock.set_low()?;
        self.latch.set_low()?;
        self.output_enable.set_high()
    }
}

fn write_levels<P: OutputPin>(pins: &mut [P], levels: &[bool]) -> Result<(), P::Error> {
    for (pin, level) in pins.iter_mut().zip(levels) {
        pin.set_state(PinState::from(*level))?;
    }
    Ok(())
}

impl<P: OutputPin> Hub75Outputs for Hub75Pins<P> {
    type Error = P::Error;

    fn set_address(&mut self, address: RowAddress) -> Result<(), Self::Error> {
        write_levels(&mut self.address, &address.lines())
    }

    fn set_colors(&mut self, bits: ColumnBits) -> Result<(), Self::Error> {
        write_levels(&mut self.top, &bits.top())?;
        write_levels(&mut self.bottom, &bits.bottom())
    }

    fn pulse_clock(&mut self) -> Result<(), Self::Error> {
        self.clock.set_high()?;
        self.clock.set_low()
    }

    fn pulse_latch(&mut self) -> Result<(), Self::Error> {
        self.latch.set_high()?;
        self.latch.set_low()
    }

    fn set_display_enabled(&mut self, enabled: bool) -> Result<(), Self::Error> {
        self.output_enable.set_state(PinState::from(!enabled))
    }
}
