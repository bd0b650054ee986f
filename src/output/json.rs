use serde::Serialize;

use super::{Formatter, Reading, iso8601_timestamp};

#[derive(Serialize)]
struct JsonRecord<'a> {
    ts: String,
    #[serde(flatten)]
    reading: &'a Reading,
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, reading: &Reading) -> String {
        let record = JsonRecord {
            ts: iso8601_timestamp(),
            reading,
        };
        // Readings hold only numbers, flags and unit enums, which always
        // serialise; non-finite floats become `null`.
        serde_json::to_string(&record).unwrap_or_default()
    }
}
