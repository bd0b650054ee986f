use serde::Serialize;

use super::front_end::{SimulatedFrontEnd, SimulatedPrescaler, SimulationConfig};
use super::signal::SignalSource;
use crate::config::MeterConfig;
use crate::constants::AVERAGING_SLOTS;
use crate::error::Result;
use crate::hardware::ButtonState;
use crate::instrument::{Instrument, Reading};

pub type SimulatedInstrument = Instrument<SimulatedFrontEnd, SimulatedPrescaler>;

/// Build an instrument wired to a simulated front end
pub fn simulated_instrument(
    config: &MeterConfig,
    sim: SimulationConfig,
    signal: SignalSource,
) -> Result<SimulatedInstrument> {
    let (front_end, prescaler) = SimulatedFrontEnd::new(&config.timebase, sim, signal)?;
    Instrument::new(config, front_end, prescaler)
}

/// Run enough cycles to flush the averaging ring and return the last reading
pub fn settle_and_measure(
    instrument: &mut SimulatedInstrument,
    buttons: ButtonState,
) -> Result<Reading> {
    let mut reading = instrument.run_cycle(buttons)?;
    for _ in 1..AVERAGING_SLOTS {
        reading = instrument.run_cycle(buttons)?;
    }
    Ok(reading)
}

pub fn relative_error(measured: f64, expected: f64) -> f64 {
    if expected == 0.0 {
        measured.abs()
    } else {
        (measured - expected) / expected
    }
}

/// Settled frequency reading for a known input
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MeasurementError {
    pub expected_hz: f64,
    pub measured_hz: f64,
    pub division_factor: u32,
    pub relative_error: f64,
}

impl MeasurementError {
    /// Measure a fixed input on a fresh instrument
    pub fn for_frequency(config: &MeterConfig, sim: SimulationConfig, hz: f64) -> Result<Self> {
        let mut instrument = simulated_instrument(config, sim, SignalSource::Fixed { hz })?;
        let reading = settle_and_measure(&mut instrument, ButtonState::default())?;
        Ok(Self {
            expected_hz: hz,
            measured_hz: reading.derived.value,
            division_factor: reading.division_factor(),
            relative_error: relative_error(reading.derived.value, hz),
        })
    }
}
