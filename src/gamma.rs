//! Gamma correction lookup table.
//!
//! LED brightness is linear in on-time but the eye's response is not, so a
//! linear ramp of channel values looks like it saturates early. The table maps
//! a linear intensity `i` to `floor(255 * (i / 255) ^ gamma)`.
//!
//! The table is built once at startup and only read afterwards.

/// Default gamma exponent
pub const DEFAULT_GAMMA: f32 = 1.6;

/// 256-entry perceptual correction lookup.
#[derive(Clone, PartialEq, Eq)]
pub struct GammaTable {
    table: [u8; 256],
}

impl GammaTable {
    /// Builds the table with [`DEFAULT_GAMMA`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_exponent(DEFAULT_GAMMA)
    }

    /// Builds the table for an arbitrary exponent.
    ///
    /// Exponents above 1.0 darken the midtones, 1.0 gives the identity table.
    /// Results are clamped to `0..=255`.
    #[must_use]
    pub fn with_exponent(gamma: f32) -> Self {
        let gamma = f64::from(gamma);
        let mut table = [0u8; 256];
        for (i, entry) in (0..=255u8).zip(table.iter_mut()) {
            let linear = f64::from(i) / 255.0;
            let corrected = libm::floor(255.0 * libm::pow(linear, gamma));
            *entry = corrected.clamp(0.0, 255.0) as u8;
        }
        Self { table }
    }

    /// Corrected intensity for a linear intensity.
    #[inline]
    #[must_use]
    pub fn get(&self, linear: u8) -> u8 {
        self.table[usize::from(linear)]
    }

    /// The whole table.
    #[must_use]
    pub fn as_slice(&self) -> &[u8; 256] {
        &self.table
    }
}

impl Default for GammaTable {
    fn default() -> Self {
        Self::new()
    }
}

impl core::ops::Index<u8> for GammaTable {
    type Output = u8;

    fn index(&self, linear: u8) -> &u8 {
        &self.table[usize::from(linear)]
    }
}

impl core::fmt::Debug for GammaTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GammaTable")
            .field("midpoint", &self.table[128])
            .field("max", &self.table[255])
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for GammaTable {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "GammaTable midpoint: {}", self.table[128]);
    }
}
