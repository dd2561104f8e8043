//! Scrape error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Page load failed: {0}")]
    PageLoad(String),

    #[error("Timed out after {timeout_ms}ms waiting for {selector}")]
    WaitTimeout { selector: String, timeout_ms: u64 },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Unknown element handle: {0}")]
    UnknownElement(usize),

    #[error("No page loaded")]
    NoPage,

    #[error("Driver error: {0}")]
    Driver(String),
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
