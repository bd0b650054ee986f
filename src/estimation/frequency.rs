use serde::Serialize;

use super::moving_average::MovingAverage;
use crate::config::{TimebaseConfig, WindowLength};
use crate::constants::AVERAGING_SLOTS;
use crate::counter::{MeasurementWindow, PrescalerRatio, Snapshot};
use crate::error::Result;
use crate::hardware::SignalInput;

/// Frequency in Hz for an edge count taken over one full window
///
/// `division_factor(ratio) * count * calibration`. Non-negative for every
/// snapshot and linear in the division factor.
pub fn raw_frequency(snapshot: Snapshot, ratio: PrescalerRatio, calibration: f64) -> f64 {
    f64::from(ratio.division_factor()) * f64::from(snapshot.count()) * calibration
}

/// Result of one full-window measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrequencyEstimate {
    pub snapshot: Snapshot,
    pub ratio: PrescalerRatio,
    /// Frequency derived from this window alone
    pub raw_hz: f64,
    /// Mean of the averaging ring, rounded to whole Hz
    pub averaged_hz: f64,
}

/// Converts full-window snapshots to Hz and smooths them
pub struct FrequencyEstimator {
    calibration: f64,
    history: MovingAverage,
}

impl FrequencyEstimator {
    pub fn new(timebase: &TimebaseConfig) -> Self {
        Self::with_calibration(timebase.calibration_constant())
    }

    pub fn with_calibration(calibration: f64) -> Self {
        Self {
            calibration,
            history: MovingAverage::new(AVERAGING_SLOTS),
        }
    }

    pub fn calibration(&self) -> f64 {
        self.calibration
    }

    /// Run a full window at `ratio` and fold the result into the average
    ///
    /// `ratio` must already be active on the divider hardware.
    pub fn measure<S: SignalInput>(
        &mut self,
        window: &mut MeasurementWindow<S>,
        ratio: PrescalerRatio,
    ) -> Result<FrequencyEstimate> {
        let snapshot = window.run(WindowLength::Full)?;
        Ok(self.update(snapshot, ratio))
    }

    /// Fold an already captured full-window snapshot into the average
    pub fn update(&mut self, snapshot: Snapshot, ratio: PrescalerRatio) -> FrequencyEstimate {
        let raw_hz = raw_frequency(snapshot, ratio, self.calibration);
        let averaged_hz = self.history.add(raw_hz).round();

        log::debug!(
            "Raw {:.1} Hz (/{} x {}), averaged {:.0} Hz",
            raw_hz,
            ratio.division_factor(),
            snapshot.count(),
            averaged_hz
        );

        FrequencyEstimate {
            snapshot,
            ratio,
            raw_hz,
            averaged_hz,
        }
    }

    /// Current rounded average without adding a measurement
    pub fn averaged_hz(&self) -> f64 {
        self.history.average().round()
    }
}
