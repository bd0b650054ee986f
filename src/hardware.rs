//! Interfaces to the peripherals around the measurement engine.
//!
//! The engine never touches registers directly. A board support layer (or
//! the simulation front end) implements these traits.

use std::sync::Arc;

use serde::Serialize;

use crate::counter::WindowRegisters;
use crate::error::Result;

/// External divider in front of the event counter input
pub trait PrescalerHardware {
    /// Drive the 3-bit divider select lines. The hardware does not acknowledge.
    fn apply_mask(&mut self, mask: u8);
}

/// Snapshot of the two mode buttons (pressed = `true`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ButtonState {
    pub a: bool,
    pub b: bool,
}

impl ButtonState {
    pub fn new(a: bool, b: bool) -> Self {
        Self { a, b }
    }
}

/// Two-button mode input, sampled once per display cycle without debouncing
pub trait ButtonInput {
    fn read(&mut self) -> ButtonState;
}

/// Character display accepting pre-formatted text
pub trait DisplayIo {
    fn clear(&mut self);
    fn select_line(&mut self, line: u8);
    fn write_line(&mut self, text: &str);
}

/// Source of counter edges and timebase interrupts
///
/// `start_window` is called after the window registers are armed. From then
/// on the implementation delivers edges through
/// [`EventCounter::clock`](crate::counter::EventCounter::clock) and timebase
/// ticks through [`WindowRegisters::on_timebase_tick`] until the countdown
/// expires. Both handlers must be invoked from a single interrupt context so
/// that they never overlap each other.
pub trait SignalInput {
    fn start_window(&mut self, registers: &Arc<WindowRegisters>) -> Result<()>;
}
