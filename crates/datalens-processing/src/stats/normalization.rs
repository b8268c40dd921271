//! Column normalization: min-max, z-score and decimal scaling.
//!
//! Outputs keep the input order and are rounded to three decimals.

use crate::error::{ProcessingError, Result};
use crate::stats::descriptive::{finite, min_max, raw_mean, raw_variance, span_scale};
use crate::types::{NormalizationMethod, NormalizedVector};
use crate::utils::round3;

/// Apply `method` to `xs`.
pub fn normalize(xs: &[f64], method: NormalizationMethod) -> Result<NormalizedVector> {
    match method {
        NormalizationMethod::MinMax => min_max_normalize(xs),
        NormalizationMethod::ZScore => z_score_normalize(xs),
        NormalizationMethod::DecimalScaling => decimal_scale(xs),
    }
}

/// `(x - min) / (max - min)` for every element.
///
/// Fails with [`ProcessingError::DegenerateRange`] when every value is equal.
pub fn min_max_normalize(xs: &[f64]) -> Result<NormalizedVector> {
    let (min, max) = min_max(xs)?;
    if max == min {
        return Err(ProcessingError::DegenerateRange { value: min });
    }

    let scale = span_scale(min, max);
    let (min, range) = (min * scale, max * scale - min * scale);
    Ok(xs.iter().map(|x| round3((x * scale - min) / range)).collect())
}

/// `(x - mean) / std_dev` for every element, using the population variance.
///
/// Fails with [`ProcessingError::DegenerateDistribution`] when the standard
/// deviation is zero, and with [`ProcessingError::NumericOverflow`] when the
/// variance exceeds the range of `f64`.
pub fn z_score_normalize(xs: &[f64]) -> Result<NormalizedVector> {
    let (min, max) = min_max(xs)?;
    let mean = raw_mean(xs)?;
    let std_dev = raw_variance(xs, mean)?.sqrt();

    // equal values can still leave rounding noise in the variance
    if min == max || std_dev == 0.0 {
        return Err(ProcessingError::DegenerateDistribution);
    }

    xs.iter()
        .map(|x| finite((x - mean) / std_dev, "z-score").map(round3))
        .collect()
}

/// `x / 10^j` for every element, with `j = ceil(log10(max |x|))`.
///
/// Fails with [`ProcessingError::AllZeroInput`] when every value is zero.
pub fn decimal_scale(xs: &[f64]) -> Result<NormalizedVector> {
    if xs.is_empty() {
        return Err(ProcessingError::EmptyInput);
    }

    let max_abs = xs.iter().fold(0.0f64, |acc, x| acc.max(x.abs()));
    if max_abs == 0.0 {
        return Err(ProcessingError::AllZeroInput);
    }

    let j = max_abs.log10().ceil() as i32;
    let divisor = 10f64.powi(j);
    let scaled = |x: f64| {
        if divisor.is_finite() && divisor != 0.0 {
            x / divisor
        } else {
            // 10^j itself is out of range at either end of f64
            x / 10f64.powi(j / 2) / 10f64.powi(j - j / 2)
        }
    };
    xs.iter()
        .map(|&x| finite(scaled(x), "decimal scaling").map(round3))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::descriptive::{mean, variance};

    #[test]
    fn test_min_max_scenario() {
        assert_eq!(
            min_max_normalize(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(),
            vec![0.0, 0.25, 0.5, 0.75, 1.0]
        );
    }

    #[test]
    fn test_min_max_degenerate() {
        let err = min_max_normalize(&[2.0, 2.0, 2.0]).unwrap_err();
        assert!(matches!(err, ProcessingError::DegenerateRange { value } if value == 2.0));
    }

    #[test]
    fn test_min_max_bounds_and_extremes() {
        let xs = [12.5, -3.0, 7.25, 40.0, 0.0, -3.0];
        let out = min_max_normalize(&xs).unwrap();
        assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(out[1], 0.0);
        assert_eq!(out[5], 0.0);
        assert_eq!(out[3], 1.0);
    }

    #[test]
    fn test_min_max_full_f64_span() {
        assert_eq!(
            min_max_normalize(&[-1e308, 0.0, 1e308]).unwrap(),
            vec![0.0, 0.5, 1.0]
        );
        let out = min_max_normalize(&[f64::MAX, -f64::MAX, 1.0]).unwrap();
        assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_z_score_overflow() {
        assert!(matches!(
            z_score_normalize(&[-1e200, 1e200]),
            Err(ProcessingError::NumericOverflow(_))
        ));
    }

    #[test]
    fn test_decimal_scale_extreme_magnitudes() {
        assert_eq!(decimal_scale(&[1.5e308, -1e308]).unwrap(), vec![0.15, -0.1]);
        let tiny = decimal_scale(&[4e-320, 2e-320]).unwrap();
        assert!(tiny.iter().all(|v| v.is_finite() && v.abs() <= 1.0));
    }

    #[test]
    fn test_z_score_mean_zero_variance_one() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let out = z_score_normalize(&xs).unwrap();
        assert_eq!(out[0], -1.5);
        assert_eq!(out[7], 2.0);

        let m = mean(&out).unwrap();
        assert!(m.abs() <= 0.001);
        let v = variance(&out, m).unwrap();
        assert!((v - 1.0).abs() <= 0.005);
    }

    #[test]
    fn test_z_score_degenerate() {
        assert!(matches!(
            z_score_normalize(&[0.1, 0.1, 0.1]),
            Err(ProcessingError::DegenerateDistribution)
        ));
        assert!(matches!(
            z_score_normalize(&[]),
            Err(ProcessingError::EmptyInput)
        ));
    }

    #[test]
    fn test_decimal_scale() {
        assert_eq!(
            decimal_scale(&[-45.0, 120.0, 999.0]).unwrap(),
            vec![-0.045, 0.12, 0.999]
        );
        // exact power of ten keeps magnitude 1
        assert_eq!(decimal_scale(&[100.0, 50.0]).unwrap(), vec![1.0, 0.5]);
        // fractions scale up
        assert_eq!(decimal_scale(&[0.05, 0.02]).unwrap(), vec![0.5, 0.2]);
    }

    #[test]
    fn test_decimal_scale_all_zero() {
        assert!(matches!(
            decimal_scale(&[0.0, -0.0, 0.0]),
            Err(ProcessingError::AllZeroInput)
        ));
    }

    #[test]
    fn test_normalize_dispatch() {
        let xs = [0.0, 10.0];
        assert_eq!(
            normalize(&xs, NormalizationMethod::MinMax).unwrap(),
            vec![0.0, 1.0]
        );
        assert_eq!(
            normalize(&xs, NormalizationMethod::ZScore).unwrap(),
            vec![-1.0, 1.0]
        );
        assert_eq!(
            normalize(&xs, NormalizationMethod::DecimalScaling).unwrap(),
            vec![0.0, 1.0]
        );
    }
}
