//! Startup sequence, frame cadence and heartbeat.
//!
//! The [`Controller`] owns everything the panel needs between frames: the
//! framebuffer, the gamma table, the noise generator and the status link. It
//! runs the pattern generator and the heartbeat synchronously between frames,
//! never while a frame is being scanned.
//!
//! # Example
//! ```rust,ignore
//! static LINK_DONE: CompletionSignal = CompletionSignal::new();
//!
//! let engine = ScanEngine::new(pins, delay, BitPlaneWeights::default());
//! let mut controller: Controller<_, _, _> = Controller::new(engine, uart, &LINK_DONE, config);
//! controller.start()?;
//! controller.run()?;
//! ```

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;

use crate::config::Config;
use crate::engine::ScanEngine;
use crate::framebuffer::FrameBuffer;
use crate::gamma::GammaTable;
use crate::link::{CompletionSignal, StatusLink, HEARTBEAT_MESSAGE, STARTUP_MESSAGE};
use crate::outputs::Hub75Outputs;
use crate::pattern::NoiseGenerator;
use crate::{HEIGHT, WIDTH};

/// Counters kept by the [`Controller`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    /// Frames rendered since the animation loop started
    pub frames: u64,
    /// Noise regenerations
    pub regenerations: u32,
    /// Heartbeat transmissions started
    pub heartbeats: u32,
}

/// Drives the panel forever: test pattern first, then gamma-ramped noise.
pub struct Controller<
    's,
    O,
    D,
    L,
    const ROWS: usize = HEIGHT,
    const COLS: usize = WIDTH,
> {
    engine: ScanEngine<O, D>,
    link: L,
    signal: &'s CompletionSignal,
    framebuffer: FrameBuffer<ROWS, COLS>,
    gamma: GammaTable,
    noise: NoiseGenerator,
    config: Config,
    stats: Stats,
}

impl<'s, O, D, L, const ROWS: usize, const COLS: usize> Controller<'s, O, D, L, ROWS, COLS>
where
    O: Hub75Outputs,
    D: DelayNs,
    L: StatusLink,
{
    /// Builds the gamma table and an empty framebuffer, and sets the engine's
    /// hold table from `config.base_hold`.
    ///
    /// `signal` must be raised by `link` whenever a transmit or receive
    /// completes.
    pub fn new(
        mut engine: ScanEngine<O, D>,
        link: L,
        signal: &'s CompletionSignal,
        config: Config,
    ) -> Self {
        engine.set_weights(config.weights());
        Self {
            engine,
            link,
            signal,
            framebuffer: FrameBuffer::new(),
            gamma: GammaTable::with_exponent(config.gamma),
            noise: NoiseGenerator::new(config.seed),
            config,
            stats: Stats::default(),
        }
    }

    /// Blanks the panel, announces startup, arms the receive and shows the
    /// test pattern for the configured number of frames.
    ///
    /// # Errors
    ///
    /// Returns the first output error. Link errors are logged and ignored.
    pub fn start(&mut self) -> Result<(), O::Error> {
        self.engine.blank()?;
        self.send(STARTUP_MESSAGE);
        if self.link.start_receive().is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("status link receive not started");
        }

        self.framebuffer.clear();
        self.framebuffer.fill_test_pattern();
        #[cfg(feature = "defmt")]
        defmt::info!(
            "showing test pattern for {=u32} frames",
            self.config.test_pattern_frames
        );
        for _ in 0..self.config.test_pattern_frames {
            self.engine.render(&self.framebuffer)?;
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("test pattern done");
        Ok(())
    }

    /// Renders one frame, then regenerates the noise and sends the heartbeat
    /// when their intervals come up.
    ///
    /// At a heartbeat this blocks until the previous link transfer has
    /// completed.
    ///
    /// # Errors
    ///
    /// Returns the first output error.
    pub fn step(&mut self) -> Result<(), O::Error> {
        self.engine.render(&self.framebuffer)?;
        self.stats.frames = self.stats.frames.wrapping_add(1);
        let frame = self.stats.frames;

        if frame % u64::from(self.config.regenerate_every.get()) == 0 {
            self.noise.randomize(&mut self.framebuffer, &self.gamma);
            self.stats.regenerations = self.stats.regenerations.wrapping_add(1);
        }

        if frame % u64::from(self.config.heartbeat_every.get()) == 0 {
            self.signal.wait();
            self.send(HEARTBEAT_MESSAGE);
            self.stats.heartbeats = self.stats.heartbeats.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::info!("heartbeat at frame {=u64}", frame);
        }
        Ok(())
    }

    /// Runs [`step`](Self::step) forever.
    ///
    /// # Errors
    ///
    /// Only returns if an output error occurs.
    pub fn run(&mut self) -> Result<Infallible, O::Error> {
        loop {
            self.step()?;
        }
    }

    fn send(&mut self, message: &'static [u8]) {
        if self.link.start_transmit(message).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("status link transmit not started");
        }
    }

    /// Frame, regeneration and heartbeat counters.
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// The framebuffer being displayed.
    #[must_use]
    pub fn framebuffer(&self) -> &FrameBuffer<ROWS, COLS> {
        &self.framebuffer
    }

    /// The framebuffer, for drawing custom content between frames. The next
    /// regeneration overwrites it.
    pub fn framebuffer_mut(&mut self) -> &mut FrameBuffer<ROWS, COLS> {
        &mut self.framebuffer
    }

    /// The gamma table built from the configuration.
    #[must_use]
    pub fn gamma(&self) -> &GammaTable {
        &self.gamma
    }

    /// The noise generator.
    #[must_use]
    pub fn noise(&self) -> &NoiseGenerator {
        &self.noise
    }

    /// The scan engine.
    #[must_use]
    pub fn engine(&self) -> &ScanEngine<O, D> {
        &self.engine
    }

    /// The status link.
    #[must_use]
    pub fn link(&self) -> &L {
        &self.link
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
