//! Result-versus-reference-range classification.
//!
//! Results and ranges are free text typed by lab staff ("12.5", "7,500",
//! "4,000-11,000", "12.0-16.0 g/dL"). The flag is always recomputed from the
//! two strings; nothing derived is stored on the test row.
//!
//! Both strings are read as written. A comma ends a number, so "7,800" is 7
//! and "4,000-11,000" is the range 0..11.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Flag;

/// Two unsigned decimals separated by a hyphen. First match wins.
static RANGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)-(\d+\.?\d*)").unwrap());

/// Leading decimal literal, as a float parser reading a prefix would accept it.
static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRange {
    pub min: f64,
    pub max: f64,
}

impl ReferenceRange {
    /// Parse the first `min-max` pair found in `text`.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = RANGE_PATTERN.captures(text)?;
        let min = caps[1].parse::<f64>().ok()?;
        let max = caps[2].parse::<f64>().ok()?;
        Some(Self { min, max })
    }

    /// Bounds are inclusive.
    pub fn classify(&self, value: f64) -> Flag {
        if value < self.min {
            Flag::Low
        } else if value > self.max {
            Flag::High
        } else {
            Flag::Normal
        }
    }
}

/// Parse the numeric prefix of a result ("12.5 g/dL" -> 12.5).
/// Returns `None` when the text does not start with a number.
pub fn parse_result_value(text: &str) -> Option<f64> {
    let literal = LEADING_FLOAT.find(text.trim_start())?;
    literal.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Flag a result against its reference range. Anything unparsable is Normal.
pub fn classify(result: &str, reference_range: &str) -> Flag {
    match (parse_result_value(result), ReferenceRange::parse(reference_range)) {
        (Some(value), Some(range)) => range.classify(value),
        _ => Flag::Normal,
    }
}
