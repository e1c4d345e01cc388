//! Best-effort conversions from raw cell text to typed values.
//!
//! Every function here is total: malformed input yields `None`, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{MAX_YEAR, MIN_YEAR};

static LEADING_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})").expect("leading year pattern is valid")
});

/// Release year from a date-like string (`2019-05-01`, `2019-05`, `2019`).
/// Only years in [1900, 2100] count.
pub fn extract_year(raw: &str) -> Option<i32> {
    let caps = LEADING_YEAR.captures(raw.trim())?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}

pub fn to_float(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Parse via float and truncate toward zero, so `"73.0"` reads as 73
pub fn to_int(raw: &str) -> Option<i64> {
    to_float(raw).and_then(float_to_int)
}

pub fn float_to_int(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}
