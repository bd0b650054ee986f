use super::scientific::ScientificText;
use super::{Formatter, Reading};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, reading: &Reading) -> String {
        let derived = &reading.derived;
        let flag = if derived.unreliable { " (unreliable)" } else { "" };
        let value = format!(
            "{:?}: {} {}{}",
            derived.mode,
            ScientificText::new(derived.value),
            derived.unit,
            flag
        );

        if self.verbose {
            let estimate = &reading.estimate;
            format!(
                "{} [raw: {:.1} Hz, avg: {:.0} Hz, /{}, count: {} (high {}, low {})]",
                value,
                estimate.raw_hz,
                estimate.averaged_hz,
                reading.division_factor(),
                estimate.snapshot.count(),
                estimate.snapshot.high(),
                estimate.snapshot.low()
            )
        } else {
            value
        }
    }
}
