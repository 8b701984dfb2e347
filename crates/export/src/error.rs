use sheetsift_sheet::SheetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: the sheet has no columns")]
    EmptySheet,

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Image of {width}x{height} pixels exceeds the {max} pixel limit")]
    ImageTooLarge { width: u32, height: u32, max: u32 },

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
