use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};

/// 16-bit hardware edge counter with a software overflow extension
///
/// The low word models the counter register, the high word is incremented
/// by the overflow interrupt. Together they form a 32-bit edge count.
///
/// Written only from interrupt context while a window is open; the main
/// context resets it before arming and reads it after completion.
#[derive(Debug, Default)]
pub struct EventCounter {
    low: AtomicU16,
    high: AtomicU16,
    running: AtomicBool,
}

impl EventCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&self) {
        self.low.store(0, Ordering::Relaxed);
        self.high.store(0, Ordering::Relaxed);
    }

    pub(crate) fn start(&self) {
        self.running.store(true, Ordering::Relaxed);
    }

    pub(crate) fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Count `edges` rising edges arriving at the counter input
    ///
    /// Edges arriving while the counter is stopped are lost. Every wrap of
    /// the low word raises the overflow handler once.
    pub fn clock(&self, edges: u32) {
        if !self.is_running() {
            return;
        }

        let mut remaining = edges;
        loop {
            let low = u32::from(self.low.load(Ordering::Relaxed));
            let room = 0x1_0000 - low;
            if remaining < room {
                self.low.store((low + remaining) as u16, Ordering::Relaxed);
                return;
            }
            remaining -= room;
            self.low.store(0, Ordering::Relaxed);
            self.on_overflow();
        }
    }

    /// Overflow interrupt handler
    pub fn on_overflow(&self) {
        // fetch_add wraps on overflow
        self.high.fetch_add(1, Ordering::Relaxed);
    }

    /// Current `(low, high)` words
    pub fn read(&self) -> (u16, u16) {
        (
            self.low.load(Ordering::Relaxed),
            self.high.load(Ordering::Relaxed),
        )
    }
}
