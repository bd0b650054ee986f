pub mod config;
pub mod constants;
pub mod counter;
pub mod error;
pub mod estimation;
pub mod hardware;
pub mod instrument;
pub mod output;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::MeterConfig;
pub use error::{MeterError, Result};
pub use instrument::{Instrument, Reading};
