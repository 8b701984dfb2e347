//! # sheetsift-export
//!
//! Writes a (usually filtered) [`Sheet`] to a spreadsheet, CSV, PDF or image
//! file. Every format carries the header row first, then the data rows.

pub mod error;
pub mod format;
pub mod pdf;
pub mod raster;

use sheetsift_sheet::{CsvOptions, Sheet};
use std::path::{Path, PathBuf};

pub use error::{ExportError, Result};
pub use format::{export_path, ExportFormat};
pub use pdf::PdfLayout;
pub use raster::ImageLayout;

/// Tuning for the rendered formats
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Title printed at the top of PDF pages; the sheet name when unset
    pub title: Option<String>,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
    /// Deflate PDF content streams
    pub compress_pdf: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: None,
            jpeg_quality: 90,
            compress_pdf: true,
        }
    }
}

impl ExportOptions {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    #[must_use]
    pub fn with_pdf_compression(mut self, compress: bool) -> Self {
        self.compress_pdf = compress;
        self
    }

    fn title_for<'a>(&'a self, sheet: &'a Sheet) -> &'a str {
        self.title.as_deref().unwrap_or_else(|| sheet.name())
    }
}

/// Encode a sheet in the given format
pub fn export_bytes(
    sheet: &Sheet,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<Vec<u8>> {
    if sheet.width() == 0 {
        return Err(ExportError::EmptySheet);
    }

    let bytes = match format {
        ExportFormat::Xlsx => sheet.to_xlsx_bytes()?,
        ExportFormat::Csv => {
            let mut buffer = Vec::new();
            sheet.write_csv(&mut buffer, CsvOptions::default())?;
            buffer
        }
        ExportFormat::Pdf => pdf::render_pdf(
            sheet,
            options.title_for(sheet),
            &PdfLayout::default(),
            options.compress_pdf,
        )?,
        ExportFormat::Jpeg | ExportFormat::Png => {
            let canvas = raster::render_image(sheet, &ImageLayout::default())?;
            raster::encode(&canvas, format, options.jpeg_quality)?
        }
    };

    tracing::debug!(%format, bytes = bytes.len(), "encoded sheet");
    Ok(bytes)
}

/// Write a sheet to `path` in the given format and return the path written
pub fn export_sheet<P: AsRef<Path>>(
    sheet: &Sheet,
    format: ExportFormat,
    path: P,
    options: &ExportOptions,
) -> Result<PathBuf> {
    let bytes = export_bytes(sheet, format, options)?;
    let path = path.as_ref().to_path_buf();
    std::fs::write(&path, bytes)?;

    tracing::info!(
        path = %path.display(),
        %format,
        rows = sheet.row_count(),
        "exported sheet"
    );
    Ok(path)
}

/// Export into `dir` under a user-supplied base name, adding the extension
pub fn export_named(
    sheet: &Sheet,
    format: ExportFormat,
    dir: &Path,
    filename: &str,
    options: &ExportOptions,
) -> Result<PathBuf> {
    export_sheet(sheet, format, export_path(dir, filename, format), options)
}
