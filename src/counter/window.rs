use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use serde::Serialize;

use super::event_counter::EventCounter;
use super::timebase::{TickOutcome, TimebaseTimer};
use crate::config::{TimebaseConfig, WindowLength};
use crate::error::Result;
use crate::hardware::SignalInput;

/// 32-bit edge count captured at the end of a window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Snapshot {
    low: u16,
    high: u16,
}

impl Snapshot {
    pub fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    /// Counter register value at capture
    pub fn low(&self) -> u16 {
        self.low
    }

    /// Number of counter overflows at capture
    pub fn high(&self) -> u16 {
        self.high
    }

    /// Combined edge count
    pub fn count(&self) -> u32 {
        (u32::from(self.high) << 16) | u32::from(self.low)
    }
}

/// State shared between the main context and the interrupt handlers
///
/// Access rules:
/// - interrupt context writes the counter, the countdown, the capture
///   registers and clears `measuring`;
/// - main context arms the registers while no window is open and reads the
///   captures only after observing `measuring == false`.
///
/// The `measuring` store (Release) and load (Acquire) form the only
/// synchronisation edge; no lock is taken.
#[derive(Debug)]
pub struct WindowRegisters {
    counter: EventCounter,
    timebase: TimebaseTimer,
    capture_low: AtomicU16,
    capture_high: AtomicU16,
    measuring: AtomicBool,
    done_tx: Sender<()>,
    done_rx: Receiver<()>,
}

impl WindowRegisters {
    pub fn new() -> Self {
        let (done_tx, done_rx) = bounded(1);
        Self {
            counter: EventCounter::new(),
            timebase: TimebaseTimer::new(),
            capture_low: AtomicU16::new(0),
            capture_high: AtomicU16::new(0),
            measuring: AtomicBool::new(false),
            done_tx,
            done_rx,
        }
    }

    pub fn counter(&self) -> &EventCounter {
        &self.counter
    }

    pub fn timebase(&self) -> &TimebaseTimer {
        &self.timebase
    }

    pub fn is_measuring(&self) -> bool {
        self.measuring.load(Ordering::Acquire)
    }

    /// Timebase compare-match handler
    ///
    /// Captures the live counter on every tick so the final capture is the
    /// state at the instant the window ended, not whenever the main context
    /// gets around to reading it.
    ///
    /// An interrupt source must stop touching the registers once this
    /// returns anything other than [`TickOutcome::Counting`].
    pub fn on_timebase_tick(&self) -> TickOutcome {
        let (low, high) = self.counter.read();
        self.capture_low.store(low, Ordering::Relaxed);
        self.capture_high.store(high, Ordering::Relaxed);

        let outcome = self.timebase.tick();
        if outcome == TickOutcome::Expired {
            self.counter.stop();
            self.measuring.store(false, Ordering::Release);
            // A full slot already holds a wake-up for this window.
            let _ = self.done_tx.try_send(());
        }
        outcome
    }

    fn arm(&self, ticks: u16) {
        while self.done_rx.try_recv().is_ok() {}

        self.counter.stop();
        self.counter.reset();
        self.capture_low.store(0, Ordering::Relaxed);
        self.capture_high.store(0, Ordering::Relaxed);
        self.measuring.store(true, Ordering::Release);
        self.timebase.arm(ticks);
        self.counter.start();
    }

    fn disarm(&self) {
        self.counter.stop();
        self.timebase.stop();
        self.measuring.store(false, Ordering::Release);
    }

    fn wait_for_completion(&self) {
        while self.is_measuring() {
            // Both channel ends live in `self`, so recv cannot disconnect.
            if self.done_rx.recv().is_err() {
                break;
            }
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.capture_low.load(Ordering::Relaxed),
            self.capture_high.load(Ordering::Relaxed),
        )
    }
}

impl Default for WindowRegisters {
    fn default() -> Self {
        Self::new()
    }
}

/// One timed capture of the event counter
///
/// `run` takes `&mut self`, so at most one window is open at a time.
pub struct MeasurementWindow<S> {
    registers: Arc<WindowRegisters>,
    input: S,
    timebase: TimebaseConfig,
}

impl<S: SignalInput> MeasurementWindow<S> {
    pub fn new(input: S, timebase: &TimebaseConfig) -> Self {
        Self {
            registers: Arc::new(WindowRegisters::new()),
            input,
            timebase: timebase.clone(),
        }
    }

    /// Count edges for one window and return the capture taken at its end
    ///
    /// Blocks until the timebase handler closes the window. There is no
    /// timeout; a window always runs to completion.
    pub fn run(&mut self, length: WindowLength) -> Result<Snapshot> {
        let ticks = self.timebase.ticks_for(length);
        self.registers.arm(ticks);

        if let Err(e) = self.input.start_window(&self.registers) {
            self.registers.disarm();
            return Err(e);
        }

        self.registers.wait_for_completion();

        let snapshot = self.registers.snapshot();
        log::debug!(
            "Window {} ({} ticks): high={} low={}",
            length,
            ticks,
            snapshot.high(),
            snapshot.low()
        );
        Ok(snapshot)
    }

    pub fn registers(&self) -> &Arc<WindowRegisters> {
        &self.registers
    }

    pub fn input(&self) -> &S {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut S {
        &mut self.input
    }
}
