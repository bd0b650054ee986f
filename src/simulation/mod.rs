//! Host-side stand-in for the meter hardware.
//!
//! Replaces the input stage, the external divider and the two interrupt
//! sources with a worker thread that replays a configurable signal, so the
//! engine runs unmodified on a development machine.

mod front_end;
mod measure;
mod signal;

pub use front_end::{FixedButtons, SimulatedFrontEnd, SimulatedPrescaler, SimulationConfig};
pub use measure::{
    MeasurementError, SimulatedInstrument, relative_error, settle_and_measure,
    simulated_instrument,
};
pub use signal::{LcTank, SignalSource, resonant_frequency};
