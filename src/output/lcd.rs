use super::scientific::ScientificText;
use crate::estimation::MeasurementMode;
use crate::hardware::DisplayIo;
use crate::instrument::Reading;

/// The two display lines for a reading
///
/// Line 0 always carries the full value. In frequency mode line 1 shows the
/// active divider (`>` and the factor, padded to five characters) followed
/// by the exponent; in LC modes it shows the quantity symbol, the exponent
/// and the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcdReadout {
    lines: [String; 2],
}

impl LcdReadout {
    pub fn new(reading: &Reading) -> Self {
        let text = ScientificText::new(reading.derived.value);

        let second = match reading.derived.mode {
            MeasurementMode::Frequency => {
                let divider = format!(">{}", reading.division_factor());
                format!("{:<5}{}", divider, text.exponent())
            }
            MeasurementMode::Inductance | MeasurementMode::SelfCalibrate => {
                format!("L= {}{}", text.exponent(), reading.derived.unit.symbol())
            }
            MeasurementMode::Capacitance => {
                format!("C= {}{}", text.exponent(), reading.derived.unit.symbol())
            }
        };

        Self {
            lines: [text.to_string(), second],
        }
    }

    pub fn lines(&self) -> &[String; 2] {
        &self.lines
    }

    /// Redraw the display with this readout
    pub fn show<D: DisplayIo>(&self, display: &mut D) {
        display.clear();
        display.write_line(&self.lines[0]);
        display.select_line(1);
        display.write_line(&self.lines[1]);
    }
}

/// Two-line character display kept in memory
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    lines: [String; 2],
    cursor: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, n: usize) -> &str {
        self.lines.get(n).map(String::as_str).unwrap_or("")
    }
}

impl DisplayIo for LineBuffer {
    fn clear(&mut self) {
        self.lines.iter_mut().for_each(String::clear);
        self.cursor = 0;
    }

    fn select_line(&mut self, line: u8) {
        self.cursor = usize::from(line).min(self.lines.len() - 1);
    }

    fn write_line(&mut self, text: &str) {
        self.lines[self.cursor].push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::{PrescalerRatio, Snapshot};
    use crate::estimation::{DerivedValue, FrequencyEstimate, Unit};
    use crate::hardware::ButtonState;

    fn reading(mode: MeasurementMode, value: f64, selector: u8) -> Reading {
        Reading {
            buttons: ButtonState::default(),
            estimate: FrequencyEstimate {
                snapshot: Snapshot::default(),
                ratio: PrescalerRatio::from_selector(selector).unwrap(),
                raw_hz: value,
                averaged_hz: value,
            },
            derived: DerivedValue {
                mode,
                value,
                unit: mode.unit(),
                unreliable: false,
            },
        }
    }

    #[test]
    fn test_frequency_lines() {
        let readout = LcdReadout::new(&reading(MeasurementMode::Frequency, 20_000.0, 0));
        assert_eq!(readout.lines()[0], "2.00000000e+04");
        assert_eq!(readout.lines()[1], ">2   e+04");

        let readout = LcdReadout::new(&reading(MeasurementMode::Frequency, 1.5e9, 7));
        assert_eq!(readout.lines()[1], ">1024e+09");
    }

    #[test]
    fn test_lc_lines() {
        let readout = LcdReadout::new(&reading(MeasurementMode::Inductance, 3.3e-5, 0));
        assert_eq!(readout.lines()[0], "3.30000000e-05");
        assert_eq!(readout.lines()[1], "L= e-05H");

        let readout = LcdReadout::new(&reading(MeasurementMode::Capacitance, 4.7e-10, 0));
        assert_eq!(readout.lines()[1], "C= e-10F");

        let readout = LcdReadout::new(&reading(MeasurementMode::SelfCalibrate, 0.0, 0));
        assert_eq!(readout.lines()[1], "L= e+00H");
        assert_eq!(Unit::Henry, MeasurementMode::SelfCalibrate.unit());
    }

    #[test]
    fn test_show_redraws_display() {
        let mut display = LineBuffer::new();
        display.write_line("stale");

        LcdReadout::new(&reading(MeasurementMode::Frequency, 20_000.0, 0)).show(&mut display);
        assert_eq!(display.line(0), "2.00000000e+04");
        assert_eq!(display.line(1), ">2   e+04");
    }
}
