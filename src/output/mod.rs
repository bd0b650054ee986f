mod csv;
mod json;
mod lcd;
mod scientific;
mod text;

use chrono::Utc;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::lcd::{LcdReadout, LineBuffer};
pub use self::scientific::ScientificText;
pub use self::text::TextFormatter;

use crate::instrument::Reading;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Lcd,
    Json,
    Csv,
}

pub trait Formatter: Send {
    fn format(&self, reading: &Reading) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

/// Renders the two display lines, joined by a separator
pub struct LcdFormatter;

impl Formatter for LcdFormatter {
    fn format(&self, reading: &Reading) -> String {
        let readout = LcdReadout::new(reading);
        format!("{} | {}", readout.lines()[0], readout.lines()[1])
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Lcd => Box::new(LcdFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::{PrescalerRatio, Snapshot};
    use crate::estimation::{DerivedValue, FrequencyEstimate, MeasurementMode};
    use crate::hardware::ButtonState;

    fn inductance_reading() -> Reading {
        Reading {
            buttons: ButtonState::new(true, false),
            estimate: FrequencyEstimate {
                snapshot: Snapshot::new(1_000, 3),
                ratio: PrescalerRatio::FINEST,
                raw_hz: 412_000.4,
                averaged_hz: 412_000.0,
            },
            derived: DerivedValue {
                mode: MeasurementMode::Inductance,
                value: 4.7e-5,
                unit: MeasurementMode::Inductance.unit(),
                unreliable: false,
            },
        }
    }

    #[test]
    fn test_text_output() {
        let reading = inductance_reading();
        assert_eq!(
            TextFormatter::new(false).format(&reading),
            "Inductance: 4.70000000e-05 H"
        );
        let verbose = TextFormatter::new(true).format(&reading);
        assert!(verbose.contains("/2"));
        assert!(verbose.contains("high 3, low 1000"));
    }

    #[test]
    fn test_csv_row_matches_header() {
        let formatter = CsvFormatter;
        let header = formatter.header().unwrap();
        let row = formatter.format(&inductance_reading());
        assert_eq!(header.split(',').count(), row.split(',').count());
        assert!(row.ends_with(",2,3,1000"));
    }

    #[test]
    fn test_json_fields() {
        let json = JsonFormatter.format(&inductance_reading());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["derived"]["mode"], "inductance");
        assert_eq!(value["derived"]["unit"], "henry");
        assert_eq!(value["buttons"]["a"], true);
        assert!(value["ts"].is_string());
    }

    #[test]
    fn test_json_non_finite_becomes_null() {
        let mut reading = inductance_reading();
        reading.estimate.raw_hz = f64::NAN;
        let json = JsonFormatter.format(&reading);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["estimate"]["raw_hz"].is_null());
        assert_eq!(value["estimate"]["averaged_hz"], 412_000.0);
    }

    #[test]
    fn test_lcd_formatter_joins_lines() {
        let line = LcdFormatter.format(&inductance_reading());
        assert_eq!(line, "4.70000000e-05 | L= e-05H");
    }
}
