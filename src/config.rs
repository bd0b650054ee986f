//! Configuration for the LC meter measurement engine.
//!
//! Defaults reproduce the reference board: a 20 MHz CPU clock divided by 256
//! and a compare top of 250 gives 312.5 timebase ticks per second, and a
//! full window is 312 ticks (19 968 000 CPU cycles, about 0.9984 s).
//!
//! ## Loading from TOML
//!
//! Every field is optional; missing fields keep their default.
//!
//! ```
//! use lcmeter::config::MeterConfig;
//!
//! let config = MeterConfig::from_toml_str(
//!     r#"
//!     [lc]
//!     reference_capacitance = 2.2e-9
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.lc.reference_capacitance, 2.2e-9);
//! assert_eq!(config.timebase.ticks_per_window, 312);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{MeterError, Result};

/// Length of a measurement window as a binary fraction of a full window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowLength {
    /// Full window (about one second)
    Full,
    /// Half window
    Half,
    /// Quarter window
    Quarter,
    /// One eighth of a window, used for range finding
    Eighth,
}

impl WindowLength {
    /// Right shift applied to the full-window tick count
    pub fn shift(&self) -> u8 {
        match self {
            Self::Full => 0,
            Self::Half => 1,
            Self::Quarter => 2,
            Self::Eighth => 3,
        }
    }
}

impl fmt::Display for WindowLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "1"),
            other => write!(f, "1/{}", 1u8 << other.shift()),
        }
    }
}

impl FromStr for WindowLength {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1" | "full" => Ok(Self::Full),
            "1/2" | "half" => Ok(Self::Half),
            "1/4" | "quarter" => Ok(Self::Quarter),
            "1/8" | "eighth" => Ok(Self::Eighth),
            other => Err(format!("invalid window length: {}", other)),
        }
    }
}

/// System-wide meter configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Timebase and calibration
    pub timebase: TimebaseConfig,
    /// LC fixture constants
    pub lc: LcConfig,
}

/// Timebase configuration
///
/// The timebase counts CPU cycles through a fixed prescaler and raises a
/// compare-match interrupt every `timer_prescale * compare_top` cycles.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimebaseConfig {
    /// Nominal CPU clock in Hz
    pub cpu_clock_hz: f64,
    /// Empirical correction applied to the nominal clock (real / nominal)
    pub clock_correction: f64,
    /// Timebase timer prescaler
    pub timer_prescale: u16,
    /// Compare-match top value of the timebase timer
    pub compare_top: u16,
    /// Timebase ticks in a full measurement window
    pub ticks_per_window: u16,
}

/// LC measurement fixture configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LcConfig {
    /// High precision reference capacitor in farads
    pub reference_capacitance: f64,
    /// Parasitic inductance assumed until the first self-calibration, in henries
    pub nominal_parasitic_inductance: f64,
}

impl Default for TimebaseConfig {
    fn default() -> Self {
        Self {
            cpu_clock_hz: 20_000_000.0,
            clock_correction: 0.998,
            timer_prescale: 256,
            compare_top: 250,
            ticks_per_window: 312,
        }
    }
}

impl Default for LcConfig {
    fn default() -> Self {
        Self {
            reference_capacitance: 1e-9,
            nominal_parasitic_inductance: 102.3e-6,
        }
    }
}

impl TimebaseConfig {
    /// CPU cycles covered by one full window
    pub fn cycles_per_window(&self) -> f64 {
        f64::from(self.timer_prescale)
            * f64::from(self.compare_top)
            * f64::from(self.ticks_per_window)
    }

    /// Hz per counted edge over a full window, before the prescaler
    pub fn calibration_constant(&self) -> f64 {
        self.cpu_clock_hz * self.clock_correction / self.cycles_per_window()
    }

    /// Nominal time between timebase interrupts in seconds
    pub fn tick_period_secs(&self) -> f64 {
        f64::from(self.timer_prescale) * f64::from(self.compare_top) / self.cpu_clock_hz
    }

    /// Timebase ticks in a window of the given length
    pub fn ticks_for(&self, length: WindowLength) -> u16 {
        self.ticks_per_window >> length.shift()
    }

    fn is_reference_timebase(&self) -> bool {
        let reference = Self::default();
        self.cpu_clock_hz == reference.cpu_clock_hz
            && self.clock_correction == reference.clock_correction
            && self.timer_prescale == reference.timer_prescale
            && self.compare_top == reference.compare_top
            && self.ticks_per_window == reference.ticks_per_window
    }
}

impl MeterConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Check that every parameter is physically meaningful
    pub fn validate(&self) -> Result<()> {
        let tb = &self.timebase;
        if !(tb.cpu_clock_hz > 0.0) {
            return Err(MeterError::Config("cpu_clock_hz must be positive".into()));
        }
        if !(tb.clock_correction > 0.0) {
            return Err(MeterError::Config(
                "clock_correction must be positive".into(),
            ));
        }
        if tb.timer_prescale == 0 || tb.compare_top == 0 {
            return Err(MeterError::Config(
                "timer_prescale and compare_top must be non-zero".into(),
            ));
        }
        if tb.ticks_for(WindowLength::Eighth) == 0 {
            return Err(MeterError::Config(format!(
                "ticks_per_window must be at least 8, got {}",
                tb.ticks_per_window
            )));
        }
        if !(self.lc.reference_capacitance > 0.0) {
            return Err(MeterError::Config(
                "reference_capacitance must be positive".into(),
            ));
        }
        if !(self.lc.nominal_parasitic_inductance > 0.0) {
            return Err(MeterError::Config(
                "nominal_parasitic_inductance must be positive".into(),
            ));
        }

        if !tb.is_reference_timebase() {
            log::warn!(
                "Timebase differs from the reference board; auto-range bounds are not rescaled"
            );
        }

        Ok(())
    }
}
