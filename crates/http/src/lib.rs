//! # sheetsift-http
//!
//! Fetches workbooks from `http(s)` URLs so they can be loaded like local
//! files. Supports HTTP/2 via ALPN negotiation with fallback to HTTP/1.1.

use reqwest::Client;
use sheetsift_sheet::{workbook_sheet_names_from_bytes, Sheet};
use std::time::Duration;

mod error;

pub use error::{FetchError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// True for sources that should be fetched rather than opened
#[must_use]
pub fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// HTTP client for workbook downloads.
pub struct WorkbookFetcher {
    client: Client,
}

impl WorkbookFetcher {
    /// Constructs a fetcher with a 30-second timeout.
    ///
    /// The client is configured to bypass system proxy lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetsift_http::WorkbookFetcher;
    /// let fetcher = WorkbookFetcher::new().expect("failed to create fetcher");
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Constructs a fetcher with a custom per-request timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // Disable system proxy lookup to avoid macOS system-configuration issues
            .no_proxy()
            .build()?;

        Ok(Self { client })
    }

    /// Download the body of `url`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Status` for non-success responses.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "fetching workbook");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let bytes = response.bytes().await?;
        tracing::info!(url, bytes = bytes.len(), "downloaded workbook");
        Ok(bytes.to_vec())
    }

    /// Download a workbook and read its first worksheet
    pub async fn fetch_sheet(&self, url: &str) -> Result<Sheet> {
        self.fetch_named_sheet(url, None).await
    }

    /// Download a workbook and read a worksheet, the first one when `sheet_name` is `None`
    pub async fn fetch_named_sheet(&self, url: &str, sheet_name: Option<&str>) -> Result<Sheet> {
        let bytes = self.fetch_bytes(url).await?;
        Sheet::from_workbook_bytes_sheet(bytes, sheet_name).map_err(|source| {
            FetchError::Workbook {
                url: url.to_string(),
                source,
            }
        })
    }

    /// Download a workbook and list its worksheet names
    pub async fn fetch_sheet_names(&self, url: &str) -> Result<Vec<String>> {
        let bytes = self.fetch_bytes(url).await?;
        workbook_sheet_names_from_bytes(bytes).map_err(|source| FetchError::Workbook {
            url: url.to_string(),
            source,
        })
    }
}
