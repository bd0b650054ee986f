use super::{Formatter, Reading, iso8601_timestamp};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, reading: &Reading) -> String {
        let estimate = &reading.estimate;
        let derived = &reading.derived;
        format!(
            "{},{:?},{:e},{},{},{:.3},{:.0},{},{},{}",
            iso8601_timestamp(),
            derived.mode,
            derived.value,
            derived.unit,
            derived.unreliable,
            estimate.raw_hz,
            estimate.averaged_hz,
            reading.division_factor(),
            estimate.snapshot.high(),
            estimate.snapshot.low()
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,mode,value,unit,unreliable,raw_hz,averaged_hz,division,high,low")
    }
}
