//! Numeric-versus-categorical inference for a single column.

use crate::types::{CellValue, ColumnKind, Dataset};

/// Classify column `index` using the full-column rule.
///
/// The column is `Numeric` when every cell is a number or text that parses
/// as a finite number. A single non-numeric cell anywhere, including an
/// empty one, makes it `Categorical`. A column of a dataset with no rows is
/// vacuously `Numeric`.
pub(crate) fn infer_column_kind(dataset: &Dataset, index: usize) -> Option<ColumnKind> {
    let mut cells = dataset.column(index)?;
    let numeric = cells.all(cell_is_numeric);
    Some(if numeric {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    })
}

#[inline]
fn cell_is_numeric(cell: &CellValue) -> bool {
    match cell {
        CellValue::Number(_) => true,
        CellValue::Text(text) => crate::utils::is_numeric_string(text),
    }
}
