use serde::{Deserialize, Serialize};
use std::fmt;

/// Text shown for a null cell in rendered views.
pub const NULL_DISPLAY: &str = "NULL";

/// A single cell loaded from a spreadsheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl CellValue {
    /// Check if the value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Get the value as a string; null becomes the empty string
    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::String(s) => s.clone(),
        }
    }

    /// Text used by the table views, where null is spelled out
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Null => NULL_DISPLAY.to_string(),
            other => other.as_str(),
        }
    }

    /// True for null and for the empty string
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Infer a value from text such as a CSV field.
    ///
    /// Blank text is null. Otherwise booleans, then integers, then finite
    /// floats are tried before falling back to the untrimmed string. Numbers
    /// written with a leading zero, like `0123`, stay text.
    #[must_use]
    pub fn parse(s: &str) -> CellValue {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return CellValue::Null;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Bool(false);
        }
        if has_leading_zero(trimmed) {
            return CellValue::String(s.to_string());
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Int(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && trimmed.bytes().any(|b| b.is_ascii_digit()) => {
                CellValue::Float(f)
            }
            _ => CellValue::String(s.to_string()),
        }
    }
}

/// `0123` or `-007`, but not `0` or `0.5`
fn has_leading_zero(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text).as_bytes();
    matches!(digits, [b'0', next, ..] if next.is_ascii_digit())
}

/// Formats like the table views, so null prints as `NULL`
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}
