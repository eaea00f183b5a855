//! Synthetic content for exercising the panel.
//!
//! The [`NoiseGenerator`] fills the framebuffer with pseudo-random colours
//! whose brightness ceiling ramps up with every call and wraps back to black
//! after 256 calls, sweeping through the whole gamma curve.

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;

use crate::framebuffer::FrameBuffer;
use crate::gamma::GammaTable;
use crate::Pixel;

/// Default PRNG seed
pub const DEFAULT_SEED: u64 = 0x5EED_B75C_0DE5_A11D;

/// Gamma-ramped noise generator.
#[derive(Clone)]
pub struct NoiseGenerator {
    rng: Xoshiro128StarStar,
    counter: u8,
}

impl NoiseGenerator {
    /// Creates a generator with the given PRNG seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro128StarStar::seed_from_u64(seed),
            counter: 0,
        }
    }

    /// The ramp counter, advanced by every [`randomize`](Self::randomize) call.
    #[must_use]
    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// The brightness ceiling the next [`randomize`](Self::randomize) call
    /// would use if the counter were `counter`. Never zero.
    #[must_use]
    pub fn ceiling(gamma: &GammaTable, counter: u8) -> u8 {
        gamma.get(counter).max(1)
    }

    /// Fills every pixel with fresh noise.
    ///
    /// Advances the ramp counter (wrapping), derives the ceiling from the gamma
    /// table, then draws each channel independently as `gamma[r % ceiling]`.
    /// Because the gamma curve never lies above the identity, no channel can
    /// exceed the ceiling.
    pub fn randomize<const ROWS: usize, const COLS: usize>(
        &mut self,
        framebuffer: &mut FrameBuffer<ROWS, COLS>,
        gamma: &GammaTable,
    ) {
        self.counter = self.counter.wrapping_add(1);
        let ceiling = u32::from(Self::ceiling(gamma, self.counter));

        for pixel in framebuffer.as_mut_slice() {
            let a = gamma.get((self.rng.next_u32() % ceiling) as u8);
            let b = gamma.get((self.rng.next_u32() % ceiling) as u8);
            let c = gamma.get((self.rng.next_u32() % ceiling) as u8);
            *pixel = Pixel::new(a, b, c);
        }
    }
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl core::fmt::Debug for NoiseGenerator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NoiseGenerator")
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}
