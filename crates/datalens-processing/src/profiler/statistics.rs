//! Descriptive statistics and pairwise relationships for numeric columns.

use crate::error::Result;
use crate::stats::correlation::{pearson_correlation, population_covariance};
use crate::stats::descriptive::{finite, mode, quantile_sorted, raw_mean, raw_variance, sorted};
use crate::types::{ColumnStatistics, CorrelationMatrix};
use crate::utils::round3;

/// Central tendency and dispersion of one numeric column.
pub(crate) fn column_statistics(column: &str, xs: &[f64]) -> Result<ColumnStatistics> {
    let sorted = sorted(xs)?;
    let mean = raw_mean(xs)?;
    let variance = raw_variance(xs, mean)?;
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let q1 = quantile_sorted(&sorted, 0.25);
    let q3 = quantile_sorted(&sorted, 0.75);
    let range = finite(max - min, "range")?;
    let iqr = finite(q3 - q1, "interquartile range")?;

    Ok(ColumnStatistics {
        column: column.to_string(),
        count: xs.len(),
        mean: round3(mean),
        median: round3(quantile_sorted(&sorted, 0.5)),
        mode: round3(mode(xs)?),
        variance: round3(variance),
        std_dev: round3(variance.sqrt()),
        min: round3(min),
        max: round3(max),
        range: round3(range),
        q1: round3(q1),
        q3: round3(q3),
        iqr: round3(iqr),
    })
}

/// Correlation and covariance between every pair of the given columns.
pub(crate) fn correlation_matrix(columns: &[(String, Vec<f64>)]) -> Result<CorrelationMatrix> {
    let n = columns.len();
    let mut correlation = vec![vec![None; n]; n];
    let mut covariance = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in i..n {
            let (_, xs) = &columns[i];
            let (_, ys) = &columns[j];
            let r = pearson_correlation(xs, ys)?;
            let c = population_covariance(xs, ys)?;
            correlation[i][j] = r;
            correlation[j][i] = r;
            covariance[i][j] = c;
            covariance[j][i] = c;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|(name, _)| name.clone()).collect(),
        correlation,
        covariance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_statistics() {
        let stats = column_statistics("v", &[4.0, 1.0, 3.0, 2.0, 5.0, 3.0]).unwrap();
        assert_eq!(
            stats,
            ColumnStatistics {
                column: "v".to_string(),
                count: 6,
                mean: 3.0,
                median: 3.0,
                mode: 3.0,
                variance: 1.667,
                std_dev: 1.291,
                min: 1.0,
                max: 5.0,
                range: 4.0,
                q1: 2.25,
                q3: 3.75,
                iqr: 1.5,
            }
        );
    }

    #[test]
    fn test_column_statistics_empty() {
        assert!(matches!(
            column_statistics("v", &[]),
            Err(ProcessingError::EmptyInput)
        ));
    }

    #[test]
    fn test_column_statistics_overflow() {
        assert!(matches!(
            column_statistics("v", &[-1e200, 1e200]),
            Err(ProcessingError::NumericOverflow("variance"))
        ));
        let stats = column_statistics("v", &[1e306, 1e306]).unwrap();
        assert_eq!(stats.mean, 1e306);
        assert_eq!(stats.variance, 0.0);
    }

    #[test]
    fn test_correlation_matrix_is_symmetric() {
        let columns = vec![
            ("a".to_string(), vec![1.0, 2.0, 3.0]),
            ("b".to_string(), vec![3.0, 2.0, 1.0]),
            ("c".to_string(), vec![7.0, 7.0, 7.0]),
        ];
        let m = correlation_matrix(&columns).unwrap();
        assert_eq!(m.correlation[0][0], Some(1.0));
        assert_eq!(m.correlation[0][1], Some(-1.0));
        assert_eq!(m.correlation[1][0], Some(-1.0));
        assert_eq!(m.correlation[2][0], None);
        assert_eq!(m.covariance[0][1], m.covariance[1][0]);
        assert_eq!(m.covariance[2][2], 0.0);
        assert_eq!(m.correlation_between("b", "a"), Some(-1.0));
    }
}
