use std::f64::consts::PI;

use serde::Deserialize;

use crate::config::LcConfig;

/// Resonant frequency of an ideal LC tank
pub fn resonant_frequency(inductance: f64, capacitance: f64) -> f64 {
    1.0 / (2.0 * PI * (inductance * capacitance).sqrt())
}

/// Oscillator built around the measurement fixture
///
/// An unknown inductor sits in series with the fixture inductance and an
/// unknown capacitor in parallel with the reference capacitor.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LcTank {
    pub fixture_inductance: f64,
    pub reference_capacitance: f64,
    #[serde(default)]
    pub series_inductance: f64,
    #[serde(default)]
    pub parallel_capacitance: f64,
}

impl LcTank {
    /// Empty fixture with the given constants
    pub fn empty(fixture_inductance: f64, reference_capacitance: f64) -> Self {
        Self {
            fixture_inductance,
            reference_capacitance,
            series_inductance: 0.0,
            parallel_capacitance: 0.0,
        }
    }

    /// Empty fixture matching the meter's nominal configuration
    pub fn nominal(config: &LcConfig) -> Self {
        Self::empty(
            config.nominal_parasitic_inductance,
            config.reference_capacitance,
        )
    }

    pub fn with_inductor(mut self, inductance: f64) -> Self {
        self.series_inductance = inductance;
        self
    }

    pub fn with_capacitor(mut self, capacitance: f64) -> Self {
        self.parallel_capacitance = capacitance;
        self
    }

    pub fn frequency_hz(&self) -> f64 {
        resonant_frequency(
            self.fixture_inductance + self.series_inductance,
            self.reference_capacitance + self.parallel_capacitance,
        )
    }
}

/// Signal applied to the counter input
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalSource {
    /// External generator at a fixed frequency
    Fixed { hz: f64 },
    /// The meter's own LC oscillator
    Tank(LcTank),
}

impl SignalSource {
    pub fn frequency_hz(&self) -> f64 {
        match self {
            Self::Fixed { hz } => *hz,
            Self::Tank(tank) => tank.frequency_hz(),
        }
    }
}
