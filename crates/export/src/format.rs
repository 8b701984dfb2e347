use crate::error::ExportError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File formats a filtered sheet can be exported to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Pdf,
    Jpeg,
    Png,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Xlsx,
        ExportFormat::Csv,
        ExportFormat::Pdf,
        ExportFormat::Jpeg,
        ExportFormat::Png,
    ];

    /// File extension, without the dot
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Png => "png",
        }
    }

    /// MIME type of the encoded file
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Png => "image/png",
        }
    }

    fn accepts_extension(self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case(self.extension())
            || (self == ExportFormat::Jpeg && ext.eq_ignore_ascii_case("jpeg"))
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            "png" => Ok(ExportFormat::Png),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Output path for a user-supplied base name.
///
/// The format's extension is appended unless the name already carries it.
#[must_use]
pub fn export_path(dir: &Path, filename: &str, format: ExportFormat) -> PathBuf {
    let has_ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| format.accepts_extension(e));

    if has_ext {
        dir.join(filename)
    } else {
        dir.join(format!("{filename}.{}", format.extension()))
    }
}
