//! Row address and bit-plane column drivers.
//!
//! These turn framebuffer coordinates and pixel values into line levels and
//! hand them to a [`Hub75Outputs`] implementation. They hold no state; the
//! ordering rules (address before columns, columns in ascending order, one
//! clock pulse per column) are enforced by the scan engine.

use bitfield::bitfield;

use crate::outputs::Hub75Outputs;
use crate::{Pixel, ADDRESS_LINES};

bitfield! {
    /// Levels of the four row-address lines.
    ///
    /// The bit layout is as follows:
    /// - Bit 3: D
    /// - Bit 2: C
    /// - Bit 1: B
    /// - Bit 0: A
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct RowAddress(u8);
    impl Debug;
    /// Address line D
    pub d, set_d: 3;
    /// Address line C
    pub c, set_c: 2;
    /// Address line B
    pub b, set_b: 1;
    /// Address line A
    pub a, set_a: 0;
    /// The 4-bit row-pair address
    pub u8, addr, set_addr: 3, 0;
}

impl RowAddress {
    /// Address for row pair `index`. Bits above the fourth are dropped.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index & 0b1111)
    }

    /// Line levels in A, B, C, D order.
    #[must_use]
    pub fn lines(self) -> [bool; ADDRESS_LINES] {
        [self.a(), self.b(), self.c(), self.d()]
    }

    /// Rebuilds an address from line levels in A, B, C, D order.
    #[must_use]
    pub fn from_lines(lines: [bool; ADDRESS_LINES]) -> Self {
        let mut address = Self::default();
        address.set_a(lines[0]);
        address.set_b(lines[1]);
        address.set_c(lines[2]);
        address.set_d(lines[3]);
        address
    }
}

bitfield! {
    /// Levels of the six colour lines for one column of one bit-plane.
    ///
    /// The bit layout is as follows:
    /// - Bit 5: Blue channel for the bottom half
    /// - Bit 4: Green channel for the bottom half
    /// - Bit 3: Red channel for the bottom half
    /// - Bit 2: Blue channel for the top half
    /// - Bit 1: Green channel for the top half
    /// - Bit 0: Red channel for the top half
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct ColumnBits(u8);
    impl Debug;
    /// B2
    pub blu2, set_blu2: 5;
    /// G2
    pub grn2, set_grn2: 4;
    /// R2
    pub red2, set_red2: 3;
    /// B1
    pub blu1, set_blu1: 2;
    /// G1
    pub grn1, set_grn1: 1;
    /// R1
    pub red1, set_red1: 0;
}

impl ColumnBits {
    /// Extracts bit `plane` of every channel of the two pixels sharing a column.
    #[must_use]
    pub fn from_pixels(top: Pixel, bottom: Pixel, plane: u8) -> Self {
        let mut bits = Self::default();
        let [r, g, b] = top.plane_bits(plane);
        bits.set_color0(r, g, b);
        let [r, g, b] = bottom.plane_bits(plane);
        bits.set_color1(r, g, b);
        bits
    }

    fn set_color0(&mut self, r: bool, g: bool, b: bool) {
        self.set_red1(r);
        self.set_grn1(g);
        self.set_blu1(b);
    }

    fn set_color1(&mut self, r: bool, g: bool, b: bool) {
        self.set_red2(r);
        self.set_grn2(g);
        self.set_blu2(b);
    }

    /// R1, G1, B1 levels.
    #[must_use]
    pub fn top(self) -> [bool; 3] {
        [self.red1(), self.grn1(), self.blu1()]
    }

    /// R2, G2, B2 levels.
    #[must_use]
    pub fn bottom(self) -> [bool; 3] {
        [self.red2(), self.grn2(), self.blu2()]
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RowAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "RowAddress({=u8})", self.addr());
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ColumnBits {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ColumnBits({=u8:b})", self.0);
    }
}

/// Drives the address lines for row pair `index`.
///
/// The address must stay in place for all bit-planes of the row.
///
/// # Errors
///
/// Returns the output implementation's error if a line cannot be driven.
pub fn select_row<O: Hub75Outputs>(outputs: &mut O, index: u8) -> Result<(), O::Error> {
    outputs.set_address(RowAddress::new(index))
}

/// Drives the six colour lines for one column of bit-plane `plane`.
///
/// Must be followed by a shift-clock pulse before the next column.
///
/// # Errors
///
/// Returns the output implementation's error if a line cannot be driven.
pub fn drive_column<O: Hub75Outputs>(
    outputs: &mut O,
    top: Pixel,
    bottom: Pixel,
    plane: u8,
) -> Result<(), O::Error> {
    outputs.set_colors(ColumnBits::from_pixels(top, bottom, plane))
}
