use sheetsift_sheet::SheetError;
use thiserror::Error;

/// Errors raised while fetching a remote workbook
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} - {reason}")]
    Status { status: u16, reason: String },

    #[error("Could not read workbook from {url}: {source}")]
    Workbook {
        url: String,
        #[source]
        source: SheetError,
    },
}

pub type Result<T> = std::result::Result<T, FetchError>;
