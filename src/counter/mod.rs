pub mod auto_range;
pub mod event_counter;
pub mod prescaler;
pub mod timebase;
pub mod window;

pub use auto_range::AutoRanger;
pub use event_counter::EventCounter;
pub use prescaler::{PrescalerController, PrescalerRatio};
pub use timebase::{TickOutcome, TimebaseTimer};
pub use window::{MeasurementWindow, Snapshot, WindowRegisters};
