use crate::cell::CellValue;
use crate::column::ColumnRef;
use crate::error::{Result, SheetError};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Header used for a column whose header cell is empty.
const EMPTY_HEADER: &str = "__EMPTY";

/// A table loaded from a worksheet: one header row plus data rows.
///
/// Every data row holds exactly `headers().len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create an empty sheet with the given headers
    #[must_use]
    pub fn new(name: &str, headers: Vec<String>) -> Self {
        Sheet {
            name: name.to_string(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a sheet from a raw cell grid.
    ///
    /// Leading blank rows are skipped and the first non-blank row becomes
    /// the header row. Empty headers become `__EMPTY`, `__EMPTY_1`, ...;
    /// repeated headers get `_1`, `_2`, ... suffixes. Blank data rows are
    /// dropped and short rows are padded with nulls.
    #[must_use]
    pub fn from_grid(name: &str, grid: Vec<Vec<CellValue>>) -> Self {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let mut rows = grid
            .into_iter()
            .skip_while(|row| row.iter().all(CellValue::is_blank));

        let Some(header_row) = rows.next() else {
            tracing::debug!(sheet = name, "grid has no non-blank rows");
            return Sheet::new(name, Vec::new());
        };

        let headers = unique_headers(&header_row, width);
        let mut sheet = Sheet::new(name, headers);

        let mut skipped = 0usize;
        for mut row in rows {
            if row.iter().all(CellValue::is_blank) {
                skipped += 1;
                continue;
            }
            row.resize(width, CellValue::Null);
            sheet.rows.push(row);
        }

        tracing::debug!(
            sheet = name,
            columns = width,
            rows = sheet.rows.len(),
            blank_rows_skipped = skipped,
            "built sheet from grid"
        );
        sheet
    }

    /// Create a sheet from a 2D vector of values; the first row is the header
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let grid = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self::from_grid("Sheet1", grid)
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Column headers in order
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of columns
    #[must_use]
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows (the header row is not counted)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Get a cell by data-row and column index (0-based)
    pub fn cell(&self, row: usize, col: usize) -> Result<&CellValue> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .ok_or(SheetError::IndexOutOfBounds {
                row,
                col,
                rows: self.row_count(),
                cols: self.width(),
            })
    }

    /// Header text of a column
    pub fn header(&self, column: ColumnRef) -> Result<&str> {
        let index = column.resolve(self.width())?;
        Ok(&self.headers[index])
    }

    /// All values of one column, top to bottom
    pub fn column_values(&self, column: ColumnRef) -> Result<Vec<&CellValue>> {
        let index = column.resolve(self.width())?;
        Ok(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// Append a data row; its length must match the header width
    pub fn push_row<T: Into<CellValue>>(&mut self, data: Vec<T>) -> Result<()> {
        let row: Vec<CellValue> = data.into_iter().map(Into::into).collect();
        if row.len() != self.width() {
            return Err(SheetError::LengthMismatch {
                expected: self.width(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Copy of this sheet keeping only the rows the predicate accepts
    #[must_use]
    pub fn retain_rows<F>(&self, predicate: F) -> Sheet
    where
        F: Fn(&[CellValue]) -> bool,
    {
        Sheet {
            name: self.name.clone(),
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| predicate(row))
                .cloned()
                .collect(),
        }
    }

    /// Each data row as an ordered map of header to value
    #[must_use]
    pub fn records(&self) -> Vec<IndexMap<String, CellValue>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Serialize the records as a pretty-printed JSON array
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.records())
            .map_err(|e| SheetError::Serialize(e.to_string()))
    }

    /// Header row followed by the data rows, as one grid
    #[must_use]
    pub fn to_grid(&self) -> Vec<Vec<CellValue>> {
        let header: Vec<CellValue> = self
            .headers
            .iter()
            .map(|h| CellValue::String(h.clone()))
            .collect();
        std::iter::once(header).chain(self.rows.iter().cloned()).collect()
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Sheet::new("Sheet1", Vec::new())
    }
}

/// Derive unique header names from the header row
fn unique_headers(header_row: &[CellValue], width: usize) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(width);

    for col in 0..width {
        let base = match header_row.get(col) {
            Some(cell) if !cell.is_blank() => cell.as_str(),
            _ => EMPTY_HEADER.to_string(),
        };

        let name = match seen.get(&base).copied() {
            None => {
                seen.insert(base.clone(), 1);
                base
            }
            Some(mut counter) => {
                let mut candidate = format!("{base}_{counter}");
                counter += 1;
                while seen.contains_key(&candidate) {
                    candidate = format!("{base}_{counter}");
                    counter += 1;
                }
                seen.insert(base.clone(), counter);
                seen.insert(candidate.clone(), 1);
                if base != EMPTY_HEADER {
                    tracing::warn!(
                        header = %base,
                        renamed = %candidate,
                        "duplicate header renamed"
                    );
                }
                candidate
            }
        };
        headers.push(name);
    }

    headers
}
