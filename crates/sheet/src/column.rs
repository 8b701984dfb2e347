//! Spreadsheet column letters.
//!
//! Columns are addressed the way spreadsheets label them: `A`..`Z`, then
//! `AA`, `AB`, ... (bijective base 26). Input is case-insensitive.

use crate::error::{Result, SheetError};
use std::fmt;

/// Convert column letters to a 0-based column index
/// A=0, B=1, ... Z=25, AA=26, AB=27, ...
pub fn column_index(letters: &str) -> Result<usize> {
    let trimmed = letters.trim();
    if trimmed.is_empty() {
        return Err(SheetError::InvalidColumn(letters.to_string()));
    }

    let mut col: usize = 0;
    for b in trimmed.bytes() {
        let upper = b.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return Err(SheetError::InvalidColumn(letters.to_string()));
        }
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add((upper - b'A') as usize + 1))
            .ok_or_else(|| SheetError::InvalidColumn(letters.to_string()))?;
    }

    Ok(col - 1)
}

/// Convert a 0-based column index to column letters
/// 0=A, 1=B, ... 25=Z, 26=AA, 27=AB, ...
pub fn column_letters(mut col: usize) -> String {
    let mut result = String::new();
    col += 1;

    while col > 0 {
        col -= 1;
        result.insert(0, ((col % 26) as u8 + b'A') as char);
        col /= 26;
    }

    result
}

/// Parse a comma-separated list of column letters ("B, c,AA").
///
/// Empty segments are ignored; a list with no columns left is an error.
pub fn parse_column_list(list: &str) -> Result<Vec<ColumnRef>> {
    let columns = list
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ColumnRef::parse)
        .collect::<Result<Vec<_>>>()?;

    if columns.is_empty() {
        return Err(SheetError::InvalidColumn(list.to_string()));
    }

    Ok(columns)
}

/// A column addressed by its letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    index: usize,
}

impl ColumnRef {
    /// Parse column letters into a reference
    pub fn parse(letters: &str) -> Result<Self> {
        column_index(letters).map(Self::at)
    }

    /// Reference the column at a 0-based index
    #[must_use]
    pub fn at(index: usize) -> Self {
        Self { index }
    }

    /// 0-based index
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Spreadsheet letters for this column
    #[must_use]
    pub fn letters(&self) -> String {
        column_letters(self.index)
    }

    /// Resolve against a table `width` columns wide, giving the 0-based index
    pub fn resolve(&self, width: usize) -> Result<usize> {
        if self.index < width {
            Ok(self.index)
        } else {
            Err(SheetError::ColumnOutOfRange {
                letters: self.letters(),
                count: width,
            })
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters())
    }
}

impl std::str::FromStr for ColumnRef {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
