//! Conversion between [`Dataset`] and Polars [`DataFrame`].
//!
//! Numeric columns become `Float64`; categorical columns become `String`,
//! with empty cells mapped to null. Importing goes the other way: numeric
//! dtypes turn into `Number` cells, everything else is cast to text and
//! nulls become empty text.

use polars::prelude::*;
use tracing::debug;

use crate::error::{Result, ResultExt};
use crate::profiler::ColumnClassifier;
use crate::types::{CellValue, ColumnKind, Dataset};

impl Dataset {
    /// Export the dataset as a Polars `DataFrame`.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let kinds = ColumnClassifier::classify(self);
        let mut columns: Vec<Column> = Vec::with_capacity(self.column_count());

        for (index, (name, kind)) in self.headers().iter().zip(&kinds).enumerate() {
            let Some(cells) = self.column(index) else {
                continue;
            };
            let series = match kind {
                ColumnKind::Numeric => {
                    let values: Vec<Option<f64>> = cells.map(CellValue::as_number).collect();
                    Series::new(name.as_str().into(), values)
                }
                ColumnKind::Categorical => {
                    let values: Vec<Option<String>> = cells
                        .map(|cell| match cell {
                            CellValue::Text(text) if text.is_empty() => None,
                            other => Some(other.to_string()),
                        })
                        .collect();
                    Series::new(name.as_str().into(), values)
                }
            };
            columns.push(series.into());
        }

        let df = DataFrame::new(columns).context("Building DataFrame from dataset")?;
        debug!("Exported '{}' as {:?} DataFrame", self.file_name(), df.shape());
        Ok(df)
    }

    /// Build a dataset from a Polars `DataFrame`.
    pub fn from_dataframe(df: &DataFrame, file_name: impl Into<String>) -> Result<Self> {
        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mut rows: Vec<Vec<CellValue>> = vec![Vec::with_capacity(headers.len()); df.height()];

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            if series.dtype().is_primitive_numeric() {
                let floats = series
                    .cast(&DataType::Float64)
                    .context(format!("Casting column '{}' to Float64", series.name()))?;
                for (row, value) in rows.iter_mut().zip(floats.f64()?.into_iter()) {
                    row.push(match value {
                        Some(x) if x.is_finite() => CellValue::Number(x),
                        Some(x) => CellValue::Text(x.to_string()),
                        None => CellValue::Text(String::new()),
                    });
                }
            } else {
                let strings = series
                    .cast(&DataType::String)
                    .context(format!("Casting column '{}' to String", series.name()))?;
                for (row, value) in rows.iter_mut().zip(strings.str()?.into_iter()) {
                    row.push(CellValue::from_field(value.unwrap_or("")));
                }
            }
        }

        Dataset::new(file_name, headers, rows)
    }
}
