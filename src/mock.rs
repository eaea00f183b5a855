//! Test doubles for the hardware seams.

extern crate std;

use std::cell::RefCell;
use std::rc::Rc;
use std::vec;
use std::vec::Vec;

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;

use crate::driver::{ColumnBits, RowAddress};
use crate::link::{CompletionSignal, StatusLink};
use crate::outputs::Hub75Outputs;
use crate::ADDRESS_LINES;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Address(RowAddress),
    Colors(ColumnBits),
    Clock,
    Latch,
    Enable(bool),
}

/// Counts every line operation and, optionally, logs it.
///
/// Address changes and latch pulses while the display is lit are counted as
/// violations.
#[derive(Debug, Default)]
pub struct RecordingOutputs {
    log: Option<Vec<Event>>,
    address: RowAddress,
    enabled: bool,
    pub address_writes: usize,
    pub color_writes: usize,
    pub clocks: usize,
    pub latches: usize,
    pub enables: usize,
    pub violations: usize,
}

impl RecordingOutputs {
    /// Counters only, for long runs.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log() -> Self {
        Self {
            log: Some(Vec::new()),
            ..Self::default()
        }
    }

    pub fn events(&self) -> &[Event] {
        self.log.as_deref().unwrap_or(&[])
    }

    pub fn address_lines(&self) -> [bool; ADDRESS_LINES] {
        self.address.lines()
    }

    fn record(&mut self, event: Event) {
        if let Some(log) = self.log.as_mut() {
            log.push(event);
        }
    }
}

impl Hub75Outputs for RecordingOutputs {
    type Error = Infallible;

    fn set_address(&mut self, address: RowAddress) -> Result<(), Self::Error> {
        if self.enabled {
            self.violations += 1;
        }
        self.address = address;
        self.address_writes += 1;
        self.record(Event::Address(address));
        Ok(())
    }

    fn set_colors(&mut self, bits: ColumnBits) -> Result<(), Self::Error> {
        self.color_writes += 1;
        self.record(Event::Colors(bits));
        Ok(())
    }

    fn pulse_clock(&mut self) -> Result<(), Self::Error> {
        self.clocks += 1;
        self.record(Event::Clock);
        Ok(())
    }

    fn pulse_latch(&mut self) -> Result<(), Self::Error> {
        if self.enabled {
            self.violations += 1;
        }
        self.latches += 1;
        self.record(Event::Latch);
        Ok(())
    }

    fn set_display_enabled(&mut self, enabled: bool) -> Result<(), Self::Error> {
        if enabled {
            self.enables += 1;
        }
        self.enabled = enabled;
        self.record(Event::Enable(enabled));
        Ok(())
    }
}

/// A busy-wait that only advances a simulated clock.
#[derive(Debug, Default)]
pub struct SimulatedDelay {
    waits: Vec<u32>,
    elapsed_ns: u64,
    record: bool,
}

impl SimulatedDelay {
    pub fn new() -> Self {
        Self {
            record: true,
            ..Self::default()
        }
    }

    /// Only accumulates elapsed time.
    pub fn unrecorded() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> &[u32] {
        &self.waits
    }

    pub fn elapsed_ns(&self) -> u64 {
        self.elapsed_ns
    }
}

impl DelayNs for SimulatedDelay {
    fn delay_ns(&mut self, ns: u32) {
        if self.record {
            self.waits.push(ns);
        }
        self.elapsed_ns += u64::from(ns);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    A,
    B,
    C,
}

#[derive(Debug)]
struct PanelState {
    rows: usize,
    cols: usize,
    address: RowAddress,
    enabled: bool,
    shift: Vec<ColumnBits>,
    latched: Vec<ColumnBits>,
    pending: ColumnBits,
    on_time: Vec<[u64; 3]>,
    violations: usize,
}

/// Behavioural model of a HUB75 panel: a column shift register, an output
/// latch, and per-LED accumulated on-time.
///
/// Column `x` is the `x`-th value clocked in since the last latch.
#[derive(Clone, Debug)]
pub struct PanelSim {
    state: Rc<RefCell<PanelState>>,
}

impl PanelSim {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(PanelState {
                rows,
                cols,
                address: RowAddress::default(),
                enabled: false,
                shift: Vec::new(),
                latched: vec![ColumnBits::default(); cols],
                pending: ColumnBits::default(),
                on_time: vec![[0; 3]; rows * cols],
                violations: 0,
            })),
        }
    }

    pub fn outputs(&self) -> SimOutputs {
        SimOutputs(self.clone())
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.clone())
    }

    /// Accumulated lit time of one LED, in nanoseconds.
    pub fn on_time(&self, x: usize, y: usize, channel: Channel) -> u64 {
        let state = self.state.borrow();
        state.on_time[y * state.cols + x][channel as usize]
    }

    pub fn violations(&self) -> usize {
        self.state.borrow().violations
    }
}

pub struct SimOutputs(PanelSim);

impl Hub75Outputs for SimOutputs {
    type Error = Infallible;

    fn set_address(&mut self, address: RowAddress) -> Result<(), Self::Error> {
        let mut state = self.0.state.borrow_mut();
        if state.enabled && state.address != address {
            state.violations += 1;
        }
        state.address = address;
        Ok(())
    }

    fn set_colors(&mut self, bits: ColumnBits) -> Result<(), Self::Error> {
        self.0.state.borrow_mut().pending = bits;
        Ok(())
    }

    fn pulse_clock(&mut self) -> Result<(), Self::Error> {
        let mut state = self.0.state.borrow_mut();
        let bits = state.pending;
        state.shift.push(bits);
        Ok(())
    }

    fn pulse_latch(&mut self) -> Result<(), Self::Error> {
        let mut state = self.0.state.borrow_mut();
        if state.enabled {
            state.violations += 1;
        }
        if state.shift.len() != state.cols {
            state.violations += 1;
        }
        let cols = state.cols;
        let shifted = core::mem::take(&mut state.shift);
        state.latched = shifted;
        state.latched.resize(cols, ColumnBits::default());
        Ok(())
    }

    fn set_display_enabled(&mut self, enabled: bool) -> Result<(), Self::Error> {
        self.0.state.borrow_mut().enabled = enabled;
        Ok(())
    }
}

pub struct SimDelay(PanelSim);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let mut guard = self.0.state.borrow_mut();
        let state = &mut *guard;
        if !state.enabled {
            return;
        }
        let ns = u64::from(ns);
        let top = usize::from(state.address.addr());
        let bottom = top + state.rows / 2;
        let cols = state.cols;
        for x in 0..cols {
            let bits = state.latched[x];
            for (channel, lit) in bits.top().into_iter().enumerate() {
                if lit {
                    state.on_time[top * cols + x][channel] += ns;
                }
            }
            for (channel, lit) in bits.bottom().into_iter().enumerate() {
                if lit {
                    state.on_time[bottom * cols + x][channel] += ns;
                }
            }
        }
    }
}

/// A status link whose transfers complete immediately.
pub struct LoopbackLink<'a> {
    signal: &'a CompletionSignal,
    pub sent: Vec<&'static [u8]>,
    pub receives: usize,
    pub fail_transmit: bool,
}

impl<'a> LoopbackLink<'a> {
    pub fn new(signal: &'a CompletionSignal) -> Self {
        Self {
            signal,
            sent: Vec::new(),
            receives: 0,
            fail_transmit: false,
        }
    }
}

impl StatusLink for LoopbackLink<'_> {
    type Error = ();

    fn start_transmit(&mut self, message: &'static [u8]) -> Result<(), Self::Error> {
        if self.fail_transmit {
            return Err(());
        }
        self.sent.push(message);
        self.signal.signal();
        Ok(())
    }

    fn start_receive(&mut self) -> Result<(), Self::Error> {
        self.receives += 1;
        Ok(())
    }
}
