#![allow(dead_code)]

use lcmeter::MeterConfig;
use lcmeter::hardware::ButtonState;
use lcmeter::simulation::{
    LcTank, SignalSource, SimulatedInstrument, SimulationConfig, simulated_instrument,
};

pub const NONE: ButtonState = ButtonState { a: false, b: false };
pub const BUTTON_A: ButtonState = ButtonState { a: true, b: false };
pub const BUTTON_B: ButtonState = ButtonState { a: false, b: true };
pub const BOTH: ButtonState = ButtonState { a: true, b: true };

/// Instrument with a reproducible, jitter-free front end
pub fn seeded_instrument(signal: SignalSource, seed: u64) -> SimulatedInstrument {
    simulated_instrument(
        &MeterConfig::default(),
        SimulationConfig::default().with_seed(seed),
        signal,
    )
    .expect("Failed to build simulated instrument")
}

pub fn fixed(hz: f64) -> SignalSource {
    SignalSource::Fixed { hz }
}

/// Empty fixture whose real inductance may differ from the nominal value
pub fn fixture(inductance: f64) -> LcTank {
    LcTank::empty(inductance, MeterConfig::default().lc.reference_capacitance)
}

/// Worst-case error of a settled frequency reading: one count of phase
/// uncertainty at the active divider, plus rounding
pub fn frequency_tolerance(division_factor: u32) -> f64 {
    2.0 * f64::from(division_factor) + 1.0
}

/// Parse the value line of the display back into a number
pub fn display_value(line: &str) -> f64 {
    line.parse()
        .unwrap_or_else(|_| panic!("display line {:?} is not a number", line))
}
