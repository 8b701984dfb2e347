use crate::csv::CsvOptions;
use crate::error::Result;
use crate::sheet::Sheet;
use std::path::Path;

/// Input file kinds, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Tsv,
    Html,
    Workbook,
}

impl SourceKind {
    /// Classify a path; anything that is not csv/tsv/html goes to the workbook reader
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => SourceKind::Csv,
            "tsv" | "tab" => SourceKind::Tsv,
            "html" | "htm" => SourceKind::Html,
            _ => SourceKind::Workbook,
        }
    }
}

impl Sheet {
    /// Load a sheet from a local file, choosing the reader by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_sheet(path, None)
    }

    /// Like [`Sheet::load`], reading the named worksheet when the file is a workbook
    pub fn load_sheet<P: AsRef<Path>>(path: P, sheet_name: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let kind = SourceKind::from_path(path);
        tracing::debug!(path = %path.display(), ?kind, "loading sheet");

        if sheet_name.is_some() && kind != SourceKind::Workbook {
            tracing::warn!(path = %path.display(), "worksheet name ignored for non-workbook input");
        }

        match kind {
            SourceKind::Csv => Self::from_csv_path(path),
            SourceKind::Tsv => Self::from_csv_path_with_options(path, CsvOptions::tsv()),
            SourceKind::Html => Self::from_html_path(path),
            SourceKind::Workbook => match sheet_name {
                Some(name) => Self::from_workbook_sheet(path, name),
                None => Self::from_workbook_path(path),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use tempfile::tempdir;

    #[test]
    fn test_source_kind() {
        assert_eq!(SourceKind::from_path(Path::new("a.CSV")), SourceKind::Csv);
        assert_eq!(SourceKind::from_path(Path::new("a.tsv")), SourceKind::Tsv);
        assert_eq!(SourceKind::from_path(Path::new("a.htm")), SourceKind::Html);
        assert_eq!(SourceKind::from_path(Path::new("a.xlsx")), SourceKind::Workbook);
        assert_eq!(SourceKind::from_path(Path::new("noext")), SourceKind::Workbook);
    }

    #[test]
    fn test_load_dispatch() {
        let dir = tempdir().unwrap();

        let tsv = dir.path().join("data.tsv");
        std::fs::write(&tsv, "a\tb\n1\t\n").unwrap();
        let sheet = Sheet::load(&tsv).unwrap();
        assert_eq!(sheet.headers(), &["a", "b"]);
        assert_eq!(sheet.cell(0, 0).unwrap(), &CellValue::Int(1));
        assert!(sheet.cell(0, 1).unwrap().is_null());

        let xlsx = dir.path().join("data.xlsx");
        sheet.save_as_xlsx(&xlsx).unwrap();
        let from_book = Sheet::load(&xlsx).unwrap();
        assert_eq!(from_book.headers(), sheet.headers());
    }
}
