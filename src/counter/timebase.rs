use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};

/// Result of one timebase interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown still running
    Counting,
    /// This tick ended the window
    Expired,
    /// No window armed
    Idle,
}

/// Periodic timebase with a software countdown of ticks per window
#[derive(Debug, Default)]
pub struct TimebaseTimer {
    countdown: AtomicU16,
    running: AtomicBool,
}

impl TimebaseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn arm(&self, ticks: u16) {
        self.countdown.store(ticks, Ordering::Relaxed);
        self.running.store(ticks > 0, Ordering::Relaxed);
    }

    pub(crate) fn stop(&self) {
        self.countdown.store(0, Ordering::Relaxed);
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Ticks left before the window ends
    pub fn remaining(&self) -> u16 {
        self.countdown.load(Ordering::Relaxed)
    }

    /// Advance the countdown by one tick
    pub fn tick(&self) -> TickOutcome {
        let remaining = self.countdown.load(Ordering::Relaxed);
        if remaining == 0 {
            return TickOutcome::Idle;
        }

        let remaining = remaining - 1;
        self.countdown.store(remaining, Ordering::Relaxed);
        if remaining == 0 {
            self.running.store(false, Ordering::Relaxed);
            TickOutcome::Expired
        } else {
            TickOutcome::Counting
        }
    }
}
