//! Shared utilities for parsing and rounding cell values.
//!
//! These helpers are used by the parser, the column classifier and the
//! statistical engine so that every component agrees on what "numeric" and
//! "missing" mean.

// =============================================================================
// Numeric Parsing
// =============================================================================

/// Number of decimal places engine outputs are rounded to.
pub const ROUND_DECIMALS: i32 = 3;

/// Try to parse a field as a finite number.
///
/// The field is trimmed first. Values that parse to `inf`, `-inf` or `NaN`
/// are rejected, as is the empty string.
///
/// # Example
///
/// ```rust
/// use datalens_processing::utils::parse_finite_number;
///
/// assert_eq!(parse_finite_number(" 4.5 "), Some(4.5));
/// assert_eq!(parse_finite_number("1e3"), Some(1000.0));
/// assert_eq!(parse_finite_number("inf"), None);
/// assert_eq!(parse_finite_number("abc"), None);
/// ```
pub fn parse_finite_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Check if a string can be parsed as a finite number.
#[inline]
pub fn is_numeric_string(s: &str) -> bool {
    parse_finite_number(s).is_some()
}

// =============================================================================
// Rounding
// =============================================================================

/// Round to [`ROUND_DECIMALS`] decimal places.
///
/// Negative zero is normalized to positive zero so that rounded results
/// compare and print cleanly.
#[inline]
pub fn round3(value: f64) -> f64 {
    round_to(value, ROUND_DECIMALS)
}

/// Magnitude above which an `f64` has no fractional digits left.
const INTEGRAL_MAGNITUDE: f64 = 1e15;

/// Round to an arbitrary number of decimal places.
///
/// Values too large to carry a fraction are returned as they are, so scaling
/// by `10^decimals` can never overflow.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() || value.abs() >= INTEGRAL_MAGNITUDE {
        return value + 0.0;
    }
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() { rounded + 0.0 } else { value + 0.0 }
}

// =============================================================================
// Missing Values
// =============================================================================

/// Check if a text cell is an explicit missing marker.
///
/// Markers are compared after trimming, ignoring ASCII case.
pub fn is_missing_marker(s: &str, markers: &[String]) -> bool {
    let trimmed = s.trim();
    markers
        .iter()
        .any(|marker| marker.trim().eq_ignore_ascii_case(trimmed))
}
