//! Comma-delimited text parser.
//!
//! Turns raw text into a [`Dataset`]. The first non-blank line holds the
//! headers; every following non-blank line is a row. Fields are trimmed and
//! become numbers when they parse as finite numbers.
//!
//! Quoting is not supported: a comma inside a quoted field splits the field.
//!
//! # Example
//!
//! ```rust
//! use datalens_processing::parser::CsvParser;
//! use datalens_processing::CellValue;
//!
//! let ds = CsvParser::new().parse("x, y\n1, a\r\n\n2, b\n", "data.csv").unwrap();
//! assert_eq!(ds.headers(), ["x", "y"]);
//! assert_eq!(ds.row_count(), 2);
//! assert_eq!(ds.rows()[1][0], CellValue::Number(2.0));
//! ```

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{ProcessingError, Result, ResultExt};
use crate::types::{CellValue, Dataset};

const DELIMITER: char = ',';

/// Parser for comma-delimited, newline-separated tabular text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse `text` into a dataset named `file_name`.
    ///
    /// Fails with [`ProcessingError::MissingHeader`] when the text has no
    /// non-blank line, and with [`ProcessingError::MalformedRow`] when a row
    /// has a different number of fields than the header.
    pub fn parse(&self, text: &str, file_name: &str) -> Result<Dataset> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        // (1-based line number, line) with blank lines dropped
        let mut lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .enumerate()
            .map(|(index, line)| (index + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header_line) = lines.next().ok_or(ProcessingError::MissingHeader)?;
        let headers: Vec<String> = header_line
            .split(DELIMITER)
            .map(|h| h.trim().to_string())
            .collect();

        if headers.iter().any(String::is_empty) {
            warn!("'{}' has an empty column name in its header", file_name);
        }

        let mut rows = Vec::new();
        for (line_number, line) in lines {
            let row: Vec<CellValue> = line.split(DELIMITER).map(CellValue::from_field).collect();
            if row.len() != headers.len() {
                return Err(ProcessingError::MalformedRow {
                    line: line_number,
                    expected: headers.len(),
                    found: row.len(),
                });
            }
            rows.push(row);
        }

        debug!("Parsed header: {:?}", headers);
        info!(
            "Parsed '{}': {} rows x {} columns",
            file_name,
            rows.len(),
            headers.len()
        );

        Dataset::new(file_name, headers, rows)
    }

    /// Read a file and parse it, naming the dataset after the file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(ProcessingError::from)
            .context(format!("Reading '{}'", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.parse(&text, &file_name)
    }
}

/// Parse `text` with the default parser.
pub fn parse(text: &str, file_name: &str) -> Result<Dataset> {
    CsvParser::new().parse(text, file_name)
}
