use thiserror::Error;

/// Failure to turn a venue's published document into text.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("document not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid document URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("I/O error while converting document: {0}")]
    Io(#[from] std::io::Error),

    #[error("converter '{command}' failed: {reason}")]
    Conversion { command: String, reason: String },

    #[error("converted document from {url} is empty")]
    EmptyDocument { url: String },

    #[error("fetching {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },
}

/// Why a single extraction attempt produced no menu.
///
/// Every variant ends the attempt with "no data"; none of them abort a batch.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("validity range does not cover {day}: {detail}")]
    DateRangeRejected { day: String, detail: String },

    #[error("template mismatch: expected {expected} structural markers, found {found}")]
    TemplateMismatch { expected: usize, found: usize },

    #[error("no block found for day {day}")]
    SegmentationMiss { day: String },

    #[error("price extraction failed: {context}")]
    PriceExtractionMiss { context: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("timestamp {0} is outside the representable date range")]
    InvalidTimestamp(i64),
}
