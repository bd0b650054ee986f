pub mod frequency;
pub mod lc;
pub mod moving_average;

pub use frequency::{FrequencyEstimate, FrequencyEstimator, raw_frequency};
pub use lc::{DerivedValue, LcDerivation, MeasurementMode, Unit, resonant_value};
pub use moving_average::MovingAverage;
