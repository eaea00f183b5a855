//! Serial status link.
//!
//! The panel reports that it is alive over a serial port. Transmit and receive
//! run asynchronously in the HAL's interrupt handlers; whichever finishes
//! raises a single [`CompletionSignal`], and the frame loop consumes that
//! signal before it starts the next transmission.
//!
//! Received bytes land in a scratch buffer owned by the link and are never
//! interpreted: there is no inbound protocol.
//!
//! # Example
//! ```rust
//! use hub75_bitbang::link::CompletionSignal;
//!
//! static TX_DONE: CompletionSignal = CompletionSignal::new();
//!
//! // in the UART interrupt handler
//! TX_DONE.signal();
//!
//! // in the frame loop
//! assert!(TX_DONE.take());
//! assert!(!TX_DONE.take());
//! ```

use portable_atomic::{AtomicBool, Ordering};

/// Size of the receive scratch buffer
pub const RX_BUFFER_SIZE: usize = 256;

/// Receive scratch buffer. Its contents are never read.
pub type ScratchBuffer = [u8; RX_BUFFER_SIZE];

/// Sent once when the controller starts
pub const STARTUP_MESSAGE: &[u8] = b"RGB-matrix started";

/// Sent at every heartbeat
pub const HEARTBEAT_MESSAGE: &[u8] = b"200 frames passed";

/// Single-slot completion flag shared between an interrupt handler and the
/// frame loop.
///
/// Signals do not queue: raising it twice before it is taken is the same as
/// raising it once.
#[derive(Debug, Default)]
pub struct CompletionSignal {
    ready: AtomicBool,
}

impl CompletionSignal {
    /// Creates a signal in the lowered state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
        }
    }

    /// Raises the signal. Safe to call from an interrupt handler.
    pub fn signal(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Consumes the signal, returning whether it was raised.
    pub fn take(&self) -> bool {
        self.ready.swap(false, Ordering::Acquire)
    }

    /// Whether the signal is raised, without consuming it.
    #[must_use]
    pub fn is_signaled(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Spins until the signal is raised, then consumes it.
    pub fn wait(&self) {
        while !self.take() {
            core::hint::spin_loop();
        }
    }
}

/// Asynchronous serial port used for status messages.
///
/// Both operations only start a transfer and return immediately. The
/// implementation raises its [`CompletionSignal`] when a transfer finishes.
pub trait StatusLink {
    /// Error raised when a transfer cannot be started
    type Error;

    /// Starts sending `message`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer could not be started.
    fn start_transmit(&mut self, message: &'static [u8]) -> Result<(), Self::Error>;

    /// Starts filling the link's [`ScratchBuffer`].
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer could not be started.
    fn start_receive(&mut self) -> Result<(), Self::Error>;
}

impl<T: StatusLink + ?Sized> StatusLink for &mut T {
    type Error = T::Error;

    fn start_transmit(&mut self, message: &'static [u8]) -> Result<(), Self::Error> {
        T::start_transmit(self, message)
    }

    fn start_receive(&mut self) -> Result<(), Self::Error> {
        T::start_receive(self)
    }
}
