//! Descriptive statistics over a numeric column.

use std::collections::HashMap;

use crate::error::{ProcessingError, Result};
use crate::utils::round3;

/// Arithmetic mean, rounded to three decimals.
pub fn mean(xs: &[f64]) -> Result<f64> {
    raw_mean(xs).map(round3)
}

/// Population variance around `mean` (divisor `n`), rounded to three decimals.
///
/// `mean` is taken as given, so a rounded mean yields the variance a view
/// would compute from the mean it displays.
pub fn variance(xs: &[f64], mean: f64) -> Result<f64> {
    raw_variance(xs, mean).map(round3)
}

/// Median with linear interpolation between the two middle values.
pub fn median(xs: &[f64]) -> Result<f64> {
    quantile(xs, 0.5)
}

/// Quantile `p` in `[0, 1]`, interpolating linearly between closest ranks.
pub fn quantile(xs: &[f64], p: f64) -> Result<f64> {
    let sorted = sorted(xs)?;
    Ok(quantile_sorted(&sorted, p))
}

/// Most frequent value. Ties go to the smallest value.
pub fn mode(xs: &[f64]) -> Result<f64> {
    if xs.is_empty() {
        return Err(ProcessingError::EmptyInput);
    }

    let mut counts: HashMap<u64, (f64, usize)> = HashMap::new();
    for &x in xs {
        let entry = counts.entry(value_bits(x)).or_insert((x, 0));
        entry.1 += 1;
    }

    counts
        .into_values()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.total_cmp(a)))
        .map(|(value, _)| value)
        .ok_or(ProcessingError::EmptyInput)
}

pub(crate) fn raw_mean(xs: &[f64]) -> Result<f64> {
    if xs.is_empty() {
        return Err(ProcessingError::EmptyInput);
    }
    let n = xs.len() as f64;
    let sum: f64 = xs.iter().sum();
    if sum.is_finite() {
        return Ok(sum / n);
    }
    // the running sum overflowed; the mean itself may still be representable
    finite(xs.iter().map(|x| x / n).sum(), "mean")
}

pub(crate) fn raw_variance(xs: &[f64], mean: f64) -> Result<f64> {
    if xs.is_empty() {
        return Err(ProcessingError::EmptyInput);
    }
    let sum_sq: f64 = xs.iter().map(|x| (x - mean).powi(2)).sum();
    finite(sum_sq / xs.len() as f64, "variance")
}

/// `value`, or [`ProcessingError::NumericOverflow`] naming `what` when it is
/// not finite.
pub(crate) fn finite(value: f64, what: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProcessingError::NumericOverflow(what))
    }
}

/// Factor that keeps `max - min` finite: `1.0`, or `0.5` when the span of
/// the column exceeds `f64::MAX`. Halving is exact, so offsets and widths
/// computed on scaled values keep their ratios.
pub(crate) fn span_scale(min: f64, max: f64) -> f64 {
    if (max - min).is_finite() { 1.0 } else { 0.5 }
}

/// Minimum and maximum of a non-empty column.
pub(crate) fn min_max(xs: &[f64]) -> Result<(f64, f64)> {
    if xs.is_empty() {
        return Err(ProcessingError::EmptyInput);
    }
    Ok(xs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        }))
}

pub(crate) fn sorted(xs: &[f64]) -> Result<Vec<f64>> {
    if xs.is_empty() {
        return Err(ProcessingError::EmptyInput);
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

pub(crate) fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let fraction = pos - lo as f64;
    if fraction == 0.0 {
        return sorted[lo];
    }
    // weighted form stays finite even when the neighbours span all of f64
    sorted[lo] * (1.0 - fraction) + sorted[hi] * fraction
}

/// Hash key for a float; `-0.0` and `0.0` share a key.
pub(crate) fn value_bits(x: f64) -> u64 {
    (x + 0.0).to_bits()
}
