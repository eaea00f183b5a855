//! Runtime configuration.
//!
//! # Example
//! ```rust
//! use core::num::NonZeroU32;
//! use fugit::NanosDurationU32;
//! use hub75_bitbang::Config;
//!
//! const CONFIG: Config = Config::new()
//!     .with_base_hold(NanosDurationU32::from_ticks(500))
//!     .with_test_pattern_frames(0);
//!
//! assert_eq!(CONFIG.regenerate_every, NonZeroU32::new(5).unwrap());
//! ```

use core::num::NonZeroU32;

use fugit::NanosDurationU32;

use crate::gamma::DEFAULT_GAMMA;
use crate::pattern::DEFAULT_SEED;
use crate::timing::{BitPlaneWeights, DEFAULT_BASE_HOLD};

const fn non_zero(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(n) => n,
        None => panic!("interval must be non-zero"),
    }
}

/// Tunables for the [`Controller`](crate::Controller).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Hold time of bit-plane 0
    pub base_hold: NanosDurationU32,
    /// Gamma exponent
    pub gamma: f32,
    /// Frames the test pattern is shown for at startup
    pub test_pattern_frames: u32,
    /// Regenerate the noise every this many frames
    pub regenerate_every: NonZeroU32,
    /// Send a heartbeat every this many frames
    pub heartbeat_every: NonZeroU32,
    /// Noise PRNG seed
    pub seed: u64,
}

impl Config {
    /// The defaults: 250 ns base hold, gamma 1.6, 500 test-pattern frames,
    /// new noise every 5 frames and a heartbeat every 200.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base_hold: DEFAULT_BASE_HOLD,
            gamma: DEFAULT_GAMMA,
            test_pattern_frames: 500,
            regenerate_every: non_zero(5),
            heartbeat_every: non_zero(200),
            seed: DEFAULT_SEED,
        }
    }

    /// Sets the hold time of bit-plane 0.
    #[must_use]
    pub const fn with_base_hold(mut self, base_hold: NanosDurationU32) -> Self {
        self.base_hold = base_hold;
        self
    }

    /// Sets the gamma exponent.
    #[must_use]
    pub const fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets how many frames the startup test pattern is shown for.
    #[must_use]
    pub const fn with_test_pattern_frames(mut self, frames: u32) -> Self {
        self.test_pattern_frames = frames;
        self
    }

    /// Sets the noise regeneration interval in frames.
    #[must_use]
    pub const fn with_regenerate_every(mut self, frames: NonZeroU32) -> Self {
        self.regenerate_every = frames;
        self
    }

    /// Sets the heartbeat interval in frames.
    #[must_use]
    pub const fn with_heartbeat_every(mut self, frames: NonZeroU32) -> Self {
        self.heartbeat_every = frames;
        self
    }

    /// Sets the noise PRNG seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The hold table for [`base_hold`](Self::base_hold).
    #[must_use]
    pub const fn weights(&self) -> BitPlaneWeights {
        BitPlaneWeights::new(self.base_hold)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Config {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Config base_hold: {=u32} ns, gamma: {=f32}, test_pattern_frames: {=u32}, regenerate_every: {=u32}, heartbeat_every: {=u32}",
            self.base_hold.ticks(),
            self.gamma,
            self.test_pattern_frames,
            self.regenerate_every.get(),
            self.heartbeat_every.get()
        );
    }
}
