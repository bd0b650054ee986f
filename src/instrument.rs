use serde::Serialize;

use crate::config::MeterConfig;
use crate::counter::{AutoRanger, MeasurementWindow, PrescalerController, PrescalerRatio};
use crate::error::Result;
use crate::estimation::{DerivedValue, FrequencyEstimate, FrequencyEstimator, LcDerivation};
use crate::hardware::{ButtonInput, ButtonState, DisplayIo, PrescalerHardware, SignalInput};
use crate::output::LcdReadout;

/// Everything produced by one measurement cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub buttons: ButtonState,
    pub estimate: FrequencyEstimate,
    pub derived: DerivedValue,
}

impl Reading {
    /// Division factor the full window was counted at
    pub fn division_factor(&self) -> u32 {
        self.estimate.ratio.division_factor()
    }
}

/// The measurement engine: auto-range, full window, average, LC derivation
///
/// Each cycle depends on earlier cycles only through the averaging ring and
/// the parasitic inductance calibration.
pub struct Instrument<S, H> {
    window: MeasurementWindow<S>,
    prescaler: PrescalerController<H>,
    ranger: AutoRanger,
    estimator: FrequencyEstimator,
    lc: LcDerivation,
}

impl<S: SignalInput, H: PrescalerHardware> Instrument<S, H> {
    pub fn new(config: &MeterConfig, input: S, prescaler: H) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            window: MeasurementWindow::new(input, &config.timebase),
            prescaler: PrescalerController::new(prescaler),
            ranger: AutoRanger::new(),
            estimator: FrequencyEstimator::new(&config.timebase),
            lc: LcDerivation::new(&config.lc),
        })
    }

    /// Measure once and derive the displayed value for the given buttons
    pub fn run_cycle(&mut self, buttons: ButtonState) -> Result<Reading> {
        let estimate = self.measure()?;
        let derived = self.lc.derive(estimate.averaged_hz, buttons);

        Ok(Reading {
            buttons,
            estimate,
            derived,
        })
    }

    /// Full display cycle: measure, sample the buttons, redraw the display
    ///
    /// Buttons are sampled after the windows close, once per cycle.
    pub fn step<B, D>(&mut self, buttons: &mut B, display: &mut D) -> Result<Reading>
    where
        B: ButtonInput,
        D: DisplayIo,
    {
        let estimate = self.measure()?;
        let state = buttons.read();
        let derived = self.lc.derive(estimate.averaged_hz, state);

        let reading = Reading {
            buttons: state,
            estimate,
            derived,
        };
        LcdReadout::new(&reading).show(display);
        Ok(reading)
    }

    fn measure(&mut self) -> Result<FrequencyEstimate> {
        let ratio = self
            .ranger
            .select_ratio(&mut self.window, &mut self.prescaler)?;
        self.estimator.measure(&mut self.window, ratio)
    }

    pub fn active_ratio(&self) -> PrescalerRatio {
        self.prescaler.active()
    }

    pub fn lc(&self) -> &LcDerivation {
        &self.lc
    }

    pub fn signal_input_mut(&mut self) -> &mut S {
        self.window.input_mut()
    }
}
