//! Covariance and Pearson correlation between two numeric columns.

use crate::error::{ProcessingError, Result};
use crate::stats::descriptive::{finite, raw_mean};
use crate::utils::round3;

/// Population covariance (divisor `n`), rounded to three decimals.
pub fn population_covariance(xs: &[f64], ys: &[f64]) -> Result<f64> {
    raw_covariance(xs, ys).map(round3)
}

/// Pearson correlation coefficient, rounded to three decimals.
///
/// Returns `Ok(None)` when either column has zero variance, where the
/// coefficient is undefined.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Result<Option<f64>> {
    let cov = raw_covariance(xs, ys)?;
    let var_x = raw_covariance(xs, xs)?;
    let var_y = raw_covariance(ys, ys)?;

    if var_x == 0.0 || var_y == 0.0 {
        return Ok(None);
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    Ok(Some(round3(r.clamp(-1.0, 1.0))))
}

fn raw_covariance(xs: &[f64], ys: &[f64]) -> Result<f64> {
    if xs.len() != ys.len() {
        return Err(ProcessingError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    let mx = raw_mean(xs)?;
    let my = raw_mean(ys)?;
    let sum: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    finite(sum / xs.len() as f64, "covariance")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert_eq!(pearson_correlation(&xs, &ys).unwrap(), Some(1.0));

        let neg = [8.0, 6.0, 4.0, 2.0];
        assert_eq!(pearson_correlation(&xs, &neg).unwrap(), Some(-1.0));
    }

    #[test]
    fn test_covariance_population() {
        // means 2.5 and 5; products 4.5 + 0.5 + 0.5 + 4.5 -> 10 / 4
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert_eq!(population_covariance(&xs, &ys).unwrap(), 2.5);
    }

    #[test]
    fn test_zero_variance_correlation_is_none() {
        assert_eq!(
            pearson_correlation(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).unwrap(),
            None
        );
    }

    #[test]
    fn test_overflowing_covariance() {
        let xs = [-1e200, 1e200];
        assert!(matches!(
            population_covariance(&xs, &xs),
            Err(ProcessingError::NumericOverflow("covariance"))
        ));
        assert!(pearson_correlation(&xs, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_mismatch_and_empty() {
        assert!(matches!(
            population_covariance(&[1.0], &[1.0, 2.0]),
            Err(ProcessingError::LengthMismatch { .. })
        ));
        assert!(matches!(
            population_covariance(&[], &[]),
            Err(ProcessingError::EmptyInput)
        ));
    }
}
