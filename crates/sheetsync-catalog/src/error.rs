use thiserror::Error;

/// Failure of a single fetch attempt. Never surfaced to catalog consumers;
/// the fetcher retries or falls through to the next strategy.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u128 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid request URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    /// Returns `true` if another attempt on the same strategy could succeed.
    ///
    /// A malformed strategy URL fails identically every time, so the fetcher
    /// moves straight to the next strategy instead of sleeping.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        !matches!(self, FetchError::InvalidUrl { .. })
    }
}

/// Why a parsed row was left out of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("row has no product name")]
    MissingName,

    #[error("price \"{raw}\" is not a positive amount")]
    InvalidPrice { raw: String },
}
