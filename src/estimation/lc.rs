//! Inductance and capacitance from the resonant frequency of the LC fixture.
//!
//! The fixture is a parallel tank made of a reference capacitor and the
//! meter's own (parasitic) inductance. An unknown inductor is placed in
//! series with the parasitic inductance, an unknown capacitor in parallel
//! with the reference capacitor. Solving `f = 1 / (2π√(LC))` for the free
//! element and removing the fixture's own contribution gives the unknown.

use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

use crate::config::LcConfig;
use crate::hardware::ButtonState;

/// What the meter displays, selected by the two buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementMode {
    /// Neither button pressed
    Frequency,
    /// Button A pressed
    Inductance,
    /// Button B pressed
    Capacitance,
    /// Both pressed: re-measure the parasitic inductance with an empty fixture
    SelfCalibrate,
}

impl MeasurementMode {
    pub fn from_buttons(buttons: ButtonState) -> Self {
        match (buttons.a, buttons.b) {
            (false, false) => Self::Frequency,
            (true, false) => Self::Inductance,
            (false, true) => Self::Capacitance,
            (true, true) => Self::SelfCalibrate,
        }
    }

    /// Physical unit of the displayed value
    pub fn unit(&self) -> Unit {
        match self {
            Self::Frequency => Unit::Hertz,
            Self::Inductance | Self::SelfCalibrate => Unit::Henry,
            Self::Capacitance => Unit::Farad,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Hertz,
    Henry,
    Farad,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Hertz => "Hz",
            Self::Henry => "H",
            Self::Farad => "F",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Displayed quantity for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedValue {
    pub mode: MeasurementMode,
    pub value: f64,
    pub unit: Unit,
    /// Set when the result was negative or not finite and was replaced by zero
    pub unreliable: bool,
}

/// `1 / ((2π·f)² · reference)`: the element that resonates with `reference` at `f`
pub fn resonant_value(frequency_hz: f64, reference: f64) -> f64 {
    let omega = 2.0 * PI * frequency_hz;
    1.0 / (omega * omega * reference)
}

/// LC derivation state: the fixed reference capacitor and the calibratable
/// parasitic inductance
///
/// The parasitic inductance lives only in memory and is reseeded with the
/// nominal value on every start.
#[derive(Debug, Clone)]
pub struct LcDerivation {
    reference_capacitance: f64,
    parasitic_inductance: f64,
}

impl LcDerivation {
    pub fn new(config: &LcConfig) -> Self {
        Self {
            reference_capacitance: config.reference_capacitance,
            parasitic_inductance: config.nominal_parasitic_inductance,
        }
    }

    pub fn reference_capacitance(&self) -> f64 {
        self.reference_capacitance
    }

    pub fn parasitic_inductance(&self) -> f64 {
        self.parasitic_inductance
    }

    /// Compute the displayed quantity for the averaged frequency and buttons
    pub fn derive(&mut self, frequency_hz: f64, buttons: ButtonState) -> DerivedValue {
        let mode = MeasurementMode::from_buttons(buttons);

        let value = match mode {
            MeasurementMode::Frequency => frequency_hz,
            MeasurementMode::Inductance => {
                resonant_value(frequency_hz, self.reference_capacitance)
                    - self.parasitic_inductance
            }
            MeasurementMode::Capacitance => {
                resonant_value(frequency_hz, self.parasitic_inductance)
                    - self.reference_capacitance
            }
            MeasurementMode::SelfCalibrate => {
                let inductance = resonant_value(frequency_hz, self.reference_capacitance);
                if inductance.is_finite() {
                    log::info!(
                        "Parasitic inductance recalibrated: {:.4e} H -> {:.4e} H",
                        self.parasitic_inductance,
                        inductance
                    );
                    self.parasitic_inductance = inductance;
                } else {
                    log::warn!(
                        "No usable signal at {} Hz, keeping parasitic inductance {:.4e} H",
                        frequency_hz,
                        self.parasitic_inductance
                    );
                }
                inductance - self.parasitic_inductance
            }
        };

        let (value, unreliable) = if !value.is_finite() {
            log::warn!("{:?} result is not finite at {} Hz", mode, frequency_hz);
            (0.0, true)
        } else if value < 0.0 {
            log::debug!("{:?} result {:.4e} clamped to zero", mode, value);
            (0.0, true)
        } else {
            (value, false)
        };

        DerivedValue {
            mode,
            value,
            unit: mode.unit(),
            unreliable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const A: ButtonState = ButtonState { a: true, b: false };
    const B: ButtonState = ButtonState { a: false, b: true };
    const BOTH: ButtonState = ButtonState { a: true, b: true };
    const NONE: ButtonState = ButtonState { a: false, b: false };

    fn resonance(inductance: f64, capacitance: f64) -> f64 {
        1.0 / (2.0 * PI * (inductance * capacitance).sqrt())
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(MeasurementMode::from_buttons(NONE), MeasurementMode::Frequency);
        assert_eq!(MeasurementMode::from_buttons(A), MeasurementMode::Inductance);
        assert_eq!(MeasurementMode::from_buttons(B), MeasurementMode::Capacitance);
        assert_eq!(MeasurementMode::from_buttons(BOTH), MeasurementMode::SelfCalibrate);
    }

    #[test]
    fn test_frequency_mode_passes_through() {
        let mut lc = LcDerivation::new(&LcConfig::default());
        let derived = lc.derive(123_456.0, NONE);
        assert_eq!(derived.value, 123_456.0);
        assert_eq!(derived.unit, Unit::Hertz);
        assert!(!derived.unreliable);
    }

    #[test]
    fn test_resonant_value_round_trip() {
        let reference_inductor = 47e-6;
        let capacitance = 1e-9;
        let f = resonance(reference_inductor, capacitance);
        assert_relative_eq!(
            resonant_value(f, capacitance),
            reference_inductor,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_inductance_subtracts_parasitic() {
        let config = LcConfig::default();
        let mut lc = LcDerivation::new(&config);
        let unknown = 33e-6;
        let f = resonance(
            config.nominal_parasitic_inductance + unknown,
            config.reference_capacitance,
        );

        let derived = lc.derive(f, A);
        assert_eq!(derived.unit, Unit::Henry);
        assert!(!derived.unreliable);
        assert_relative_eq!(derived.value, unknown, max_relative = 1e-9);
    }

    #[test]
    fn test_capacitance_subtracts_reference() {
        let config = LcConfig::default();
        let mut lc = LcDerivation::new(&config);
        let unknown = 470e-12;
        let f = resonance(
            config.nominal_parasitic_inductance,
            config.reference_capacitance + unknown,
        );

        let derived = lc.derive(f, B);
        assert_eq!(lc.reference_capacitance(), config.reference_capacitance);
        assert_eq!(derived.unit, Unit::Farad);
        assert_relative_eq!(derived.value, unknown, max_relative = 1e-9);
    }

    #[test]
    fn test_self_calibration_stores_unsubtracted_value() {
        let config = LcConfig::default();
        let mut lc = LcDerivation::new(&config);
        let f = 480_000.0;

        let derived = lc.derive(f, BOTH);
        let omega = 2.0 * PI * f;
        let expected = 1.0 / (omega * omega * config.reference_capacitance);
        assert_eq!(lc.parasitic_inductance(), expected);
        assert_eq!(derived.mode, MeasurementMode::SelfCalibrate);
        assert_eq!(derived.unit, Unit::Henry);
        assert_eq!(derived.value, 0.0);
        assert!(!derived.unreliable);
    }

    #[test]
    fn test_calibration_becomes_new_baseline() {
        let config = LcConfig::default();
        let mut lc = LcDerivation::new(&config);
        let fixture = 98e-6;
        lc.derive(resonance(fixture, config.reference_capacitance), BOTH);
        assert_relative_eq!(lc.parasitic_inductance(), fixture, max_relative = 1e-9);

        let unknown = 10e-6;
        let derived = lc.derive(
            resonance(fixture + unknown, config.reference_capacitance),
            A,
        );
        assert_relative_eq!(derived.value, unknown, max_relative = 1e-6);
    }

    #[test]
    fn test_negative_result_clamped() {
        let config = LcConfig::default();
        let mut lc = LcDerivation::new(&config);
        // Above the empty fixture's resonance the derived inductance is
        // smaller than the parasitic inductance.
        let empty = resonance(
            config.nominal_parasitic_inductance,
            config.reference_capacitance,
        );

        let derived = lc.derive(empty * 1.01, A);
        assert_eq!(derived.value, 0.0);
        assert!(derived.unreliable);

        let derived = lc.derive(empty * 1.01, B);
        assert_eq!(derived.value, 0.0);
        assert!(derived.unreliable);
    }

    #[test]
    fn test_no_signal_does_not_poison_calibration() {
        let config = LcConfig::default();
        let mut lc = LcDerivation::new(&config);

        let derived = lc.derive(0.0, BOTH);
        assert_eq!(derived.value, 0.0);
        assert!(derived.unreliable);
        assert_eq!(
            lc.parasitic_inductance(),
            config.nominal_parasitic_inductance
        );

        let derived = lc.derive(0.0, A);
        assert_eq!(derived.value, 0.0);
        assert!(derived.unreliable);
    }
}
