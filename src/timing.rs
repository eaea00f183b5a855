//! Hold times for Binary Code Modulation.
//!
//! Plane `p` is lit for `base << p`, so the eight planes are lit for
//! 1, 2, 4, … 128 base units and the total on-time of a channel value `v` is
//! `v * base`. Only the base is tunable; the doubling is what makes the
//! brightness proportional to the channel value.

use embedded_hal::delay::DelayNs;
use fugit::NanosDurationU32;

use crate::PLANES;

/// Default hold time of bit-plane 0
pub const DEFAULT_BASE_HOLD: NanosDurationU32 = NanosDurationU32::from_ticks(250);

/// The exponential per-plane hold table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BitPlaneWeights {
    holds: [NanosDurationU32; PLANES as usize],
}

impl BitPlaneWeights {
    /// Builds the table from the hold time of plane 0.
    ///
    /// # Panics
    ///
    /// Panics if `base << 7` does not fit in a `u32` nanosecond count
    /// (a base above roughly 33 ms).
    #[must_use]
    pub const fn new(base: NanosDurationU32) -> Self {
        let base = base.ticks();
        assert!(base <= u32::MAX >> (PLANES - 1), "base hold time too long");
        let mut holds = [NanosDurationU32::from_ticks(0); PLANES as usize];
        let mut plane = 0;
        while plane < PLANES as usize {
            holds[plane] = NanosDurationU32::from_ticks(base << plane);
            plane += 1;
        }
        Self { holds }
    }

    /// Hold time of plane 0.
    #[must_use]
    pub const fn base(&self) -> NanosDurationU32 {
        self.holds[0]
    }

    /// Hold time of `plane`.
    ///
    /// # Panics
    ///
    /// Panics if `plane >= 8`.
    #[must_use]
    pub const fn hold(&self, plane: u8) -> NanosDurationU32 {
        self.holds[plane as usize]
    }

    /// All hold times, plane 0 first.
    #[must_use]
    pub const fn holds(&self) -> &[NanosDurationU32; PLANES as usize] {
        &self.holds
    }

    /// Total time a channel with value `value` is lit during one row pass.
    #[must_use]
    pub fn on_time(&self, value: u8) -> NanosDurationU32 {
        let ticks: u32 = (0..PLANES)
            .filter(|plane| value & (1u8 << *plane) != 0)
            .map(|plane| self.hold(plane).ticks())
            .sum();
        NanosDurationU32::from_ticks(ticks)
    }

    /// Total lit time of one row pass over all planes.
    #[must_use]
    pub fn row_period(&self) -> NanosDurationU32 {
        self.on_time(u8::MAX)
    }

    /// Busy-waits for the hold time of `plane`.
    pub fn hold_for<D: DelayNs>(&self, delay: &mut D, plane: u8) {
        delay.delay_ns(self.hold(plane).ticks());
    }
}

impl Default for BitPlaneWeights {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_HOLD)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BitPlaneWeights {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "BitPlaneWeights base: {=u32} ns", self.base().ticks());
    }
}
