//! Null / non-null row filters.
//!
//! A filter names a set of columns, a per-cell [`Condition`] and a
//! [`Combinator`] deciding whether every selected cell or at least one of
//! them has to satisfy it. Filtering always produces a new sheet from the
//! source, so applying a second filter does not narrow the first.

use crate::cell::CellValue;
use crate::column::ColumnRef;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use std::fmt;
use std::str::FromStr;

/// How per-column checks are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    /// Every selected cell must satisfy the condition ("and")
    #[default]
    All,
    /// At least one selected cell must satisfy the condition ("or")
    Any,
}

/// The check applied to each selected cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Condition {
    #[default]
    IsNull,
    IsNotNull,
}

impl Condition {
    #[must_use]
    pub fn holds(self, cell: &CellValue) -> bool {
        match self {
            Condition::IsNull => cell.is_null(),
            Condition::IsNotNull => !cell.is_null(),
        }
    }
}

impl FromStr for Combinator {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "and" | "all" => Ok(Combinator::All),
            "or" | "any" => Ok(Combinator::Any),
            other => Err(SheetError::Parse(format!(
                "unknown combinator '{other}' (expected 'and' or 'or')"
            ))),
        }
    }
}

impl FromStr for Condition {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "null" | "is-null" => Ok(Condition::IsNull),
            "not-null" | "notnull" | "non-null" | "is-not-null" => Ok(Condition::IsNotNull),
            other => Err(SheetError::Parse(format!(
                "unknown condition '{other}' (expected 'null' or 'not-null')"
            ))),
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Combinator::All => "and",
            Combinator::Any => "or",
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Condition::IsNull => "null",
            Condition::IsNotNull => "not-null",
        })
    }
}

/// A row filter over a set of columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilter {
    pub primary: Option<ColumnRef>,
    pub columns: Vec<ColumnRef>,
    pub combinator: Combinator,
    pub condition: Condition,
}

/// Row counts from applying a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutcome {
    pub matched: usize,
    pub total: usize,
}

impl RowFilter {
    #[must_use]
    pub fn new(columns: Vec<ColumnRef>, combinator: Combinator, condition: Condition) -> Self {
        RowFilter {
            primary: None,
            columns,
            combinator,
            condition,
        }
    }

    /// Record the primary column.
    ///
    /// It is validated against the sheet but does not take part in matching.
    #[must_use]
    pub fn with_primary(mut self, primary: ColumnRef) -> Self {
        self.primary = Some(primary);
        self
    }

    /// Whether a row passes the filter.
    ///
    /// With no columns selected, `All` accepts every row and `Any` none.
    /// Columns past the end of the row read as null.
    #[must_use]
    pub fn matches(&self, row: &[CellValue]) -> bool {
        let mut checks = self.columns.iter().map(|col| {
            let cell = row.get(col.index()).unwrap_or(&CellValue::Null);
            self.condition.holds(cell)
        });

        match self.combinator {
            Combinator::All => checks.all(|ok| ok),
            Combinator::Any => checks.any(|ok| ok),
        }
    }

    /// Check every referenced column against the sheet width
    pub fn validate(&self, sheet: &Sheet) -> Result<()> {
        let width = sheet.width();
        if let Some(primary) = self.primary {
            primary.resolve(width)?;
        }
        for col in &self.columns {
            col.resolve(width)?;
        }
        Ok(())
    }

    /// Filter a sheet into a new one, leaving the source untouched
    pub fn apply(&self, sheet: &Sheet) -> Result<(Sheet, FilterOutcome)> {
        self.validate(sheet)?;

        let filtered = sheet.retain_rows(|row| self.matches(row));
        let outcome = FilterOutcome {
            matched: filtered.row_count(),
            total: sheet.row_count(),
        };

        tracing::info!(
            sheet = sheet.name(),
            filter = %self,
            matched = outcome.matched,
            total = outcome.total,
            "applied row filter"
        );

        Ok((filtered, outcome))
    }
}

impl fmt::Display for RowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols: Vec<String> = self.columns.iter().map(ColumnRef::letters).collect();
        write!(f, "{} {} [{}]", self.combinator, self.condition, cols.join(","))?;
        if let Some(primary) = self.primary {
            write!(f, " primary={primary}")?;
        }
        Ok(())
    }
}

impl Sheet {
    /// Rows of this sheet that pass `filter`, as a new sheet
    pub fn filtered(&self, filter: &RowFilter) -> Result<Sheet> {
        filter.apply(self).map(|(sheet, _)| sheet)
    }
}
