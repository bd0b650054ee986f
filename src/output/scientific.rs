use std::fmt;

/// Digits after the decimal point in the mantissa
const MANTISSA_DIGITS: usize = 8;

/// A value in scientific notation, split the way the display consumes it
///
/// `1234.5` becomes mantissa `1.23450000` and exponent `e+03`. Non-finite
/// values have an empty exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScientificText {
    mantissa: String,
    exponent: String,
}

impl ScientificText {
    pub fn new(value: f64) -> Self {
        let text = format!("{:.*e}", MANTISSA_DIGITS, value);
        match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent: i32 = exponent.parse().unwrap_or(0);
                Self {
                    mantissa: mantissa.to_string(),
                    exponent: format!("e{:+03}", exponent),
                }
            }
            None => Self {
                mantissa: text,
                exponent: String::new(),
            },
        }
    }

    pub fn mantissa(&self) -> &str {
        &self.mantissa
    }

    pub fn exponent(&self) -> &str {
        &self.exponent
    }
}

impl fmt::Display for ScientificText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mantissa, self.exponent)
    }
}
