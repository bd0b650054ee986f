use super::prescaler::{PrescalerController, PrescalerRatio};
use super::window::{MeasurementWindow, Snapshot};
use crate::config::WindowLength;
use crate::constants::AUTO_RANGE_BOUNDS;
use crate::error::Result;
use crate::hardware::{PrescalerHardware, SignalInput};

/// Picks the finest divider that keeps a full window inside the counter range
///
/// One rough 1/8 window at the probe divider, then an ordered table lookup.
/// The table is the empirically tuned one from the reference board; it is
/// not derived from the timebase at run time.
#[derive(Debug, Clone, Copy)]
pub struct AutoRanger {
    probe: PrescalerRatio,
}

impl AutoRanger {
    pub fn new() -> Self {
        Self {
            probe: PrescalerRatio::PROBE,
        }
    }

    /// Divider used for the rough window
    pub fn probe(&self) -> PrescalerRatio {
        self.probe
    }

    /// Map a probe snapshot to a finer ratio, or `None` to keep the probe ratio
    pub fn classify(snapshot: Snapshot) -> Option<PrescalerRatio> {
        AUTO_RANGE_BOUNDS
            .iter()
            .find(|&&(max_high, low_limit, _)| {
                snapshot.high() <= max_high && snapshot.low() < low_limit
            })
            .and_then(|&(_, _, selector)| PrescalerRatio::from_selector(selector).ok())
    }

    /// Run the rough window and leave the chosen ratio active
    pub fn select_ratio<S, H>(
        &self,
        window: &mut MeasurementWindow<S>,
        prescaler: &mut PrescalerController<H>,
    ) -> Result<PrescalerRatio>
    where
        S: SignalInput,
        H: PrescalerHardware,
    {
        prescaler.select(self.probe);
        let probe = window.run(WindowLength::Eighth)?;

        if let Some(ratio) = Self::classify(probe) {
            prescaler.select(ratio);
        }

        let ratio = prescaler.active();
        log::debug!(
            "Probe count {} -> divider /{} (selector {})",
            probe.count(),
            ratio.division_factor(),
            ratio.selector()
        );
        Ok(ratio)
    }
}

impl Default for AutoRanger {
    fn default() -> Self {
        Self::new()
    }
}
