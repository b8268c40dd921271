//! Chi-squared independence statistic over two paired samples.
//!
//! Contingency cells are keyed by cell value, so the same test serves
//! numeric columns and categorical columns. Only the raw statistic is
//! produced; p-values and degrees-of-freedom lookups are left to callers.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::types::{CellKey, CellValue, ChiSquaredResult, ContingencyCell};
use crate::utils::round3;

/// Chi-squared statistic for the pairs `(a[i], b[i])`.
///
/// The expected count of a cell is `count(a value) * count(b value) / n`;
/// the statistic sums `(observed - expected)^2 / expected` over observed
/// cells and is rounded to three decimals.
///
/// Fails with [`ProcessingError::LengthMismatch`] when the samples differ in
/// length and [`ProcessingError::EmptyInput`] when they are empty.
///
/// Every summed cell was observed at least once, so both of its marginal
/// counts are at least 1 and its expected count is at least `1 / n`. The
/// [`ProcessingError::ZeroExpectedFrequency`] check below therefore never
/// fires for this statistic; the guard keeps the division total.
pub fn chi_squared_independence(a: &[CellValue], b: &[CellValue]) -> Result<ChiSquaredResult> {
    if a.len() != b.len() {
        return Err(ProcessingError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(ProcessingError::EmptyInput);
    }

    let n = a.len();
    let mut first_totals: HashMap<CellKey, usize> = HashMap::new();
    let mut second_totals: HashMap<CellKey, usize> = HashMap::new();
    // observed pairs in order of first appearance
    let mut cells: Vec<(&CellValue, &CellValue, usize)> = Vec::new();
    let mut cell_index: HashMap<(CellKey, CellKey), usize> = HashMap::new();

    for (x, y) in a.iter().zip(b) {
        let kx = CellKey::from(x);
        let ky = CellKey::from(y);
        *first_totals.entry(kx.clone()).or_insert(0) += 1;
        *second_totals.entry(ky.clone()).or_insert(0) += 1;

        match cell_index.get(&(kx.clone(), ky.clone())) {
            Some(&i) => cells[i].2 += 1,
            None => {
                cell_index.insert((kx, ky), cells.len());
                cells.push((x, y, 1));
            }
        }
    }

    let mut statistic = 0.0;
    let mut table = Vec::with_capacity(cells.len());
    for (x, y, observed) in cells {
        let row_total = first_totals[&CellKey::from(x)];
        let col_total = second_totals[&CellKey::from(y)];
        let expected = (row_total * col_total) as f64 / n as f64;
        if expected == 0.0 {
            return Err(ProcessingError::ZeroExpectedFrequency {
                first: x.to_string(),
                second: y.to_string(),
            });
        }

        statistic += (observed as f64 - expected).powi(2) / expected;
        table.push(ContingencyCell {
            first: x.clone(),
            second: y.clone(),
            observed,
            expected: round3(expected),
        });
    }

    debug!(
        "Chi-squared over {} pairs: {} observed cells, statistic {:.3}",
        n,
        table.len(),
        statistic
    );

    Ok(ChiSquaredResult {
        statistic: round3(statistic),
        sample_size: n,
        contingency_table: table,
    })
}

/// Chi-squared statistic for two numeric columns.
pub fn chi_squared_numeric(a: &[f64], b: &[f64]) -> Result<ChiSquaredResult> {
    let a: Vec<CellValue> = a.iter().copied().map(CellValue::Number).collect();
    let b: Vec<CellValue> = b.iter().copied().map(CellValue::Number).collect();
    chi_squared_independence(&a, &b)
}
