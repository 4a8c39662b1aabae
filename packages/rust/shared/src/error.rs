//! Error types for cnsearch.
//!
//! Library crates use [`CnSearchError`] via `thiserror`.
//! The server binary wraps this with `color-eyre` for rich diagnostics.
//!
//! The variants split into two propagation classes:
//! - `InvalidField` / `InvalidFuzziness` are precondition violations and are
//!   never recovered — they fail before any network call is made.
//! - The remaining variants are collaborator failures; the orchestrator
//!   decides per call site whether they abort the request or degrade it to
//!   an empty result.

/// Top-level error type for all cnsearch operations.
#[derive(Debug, thiserror::Error)]
pub enum CnSearchError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The full-text index store is unreachable or returned a transport error.
    #[error("index store unavailable: {0}")]
    StoreUnavailable(String),

    /// The web search engine returned a non-success status.
    #[error("web discovery unavailable: {0}")]
    DiscoveryUnavailable(String),

    /// A page fetch timed out during crawling.
    #[error("crawl timed out: {0}")]
    CrawlTimeout(String),

    /// Any other fetch/parse fault during crawling.
    #[error("crawl failed: {0}")]
    CrawlFailure(String),

    /// A search was requested against a field that is not indexed.
    #[error("invalid target field: {0}")]
    InvalidField(String),

    /// A search was requested with an unsupported fuzziness level.
    #[error("invalid fuzziness level: {0}")]
    InvalidFuzziness(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CnSearchError>;

impl CnSearchError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// True for the precondition-violation class that must never be
    /// swallowed by degrade-to-empty handling.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::InvalidField(_) | Self::InvalidFuzziness(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = CnSearchError::config("missing index URL");
        assert_eq!(err.to_string(), "config error: missing index URL");

        let err = CnSearchError::StoreUnavailable("connection refused".into());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn precondition_classification() {
        assert!(CnSearchError::InvalidField("unknown".into()).is_precondition());
        assert!(CnSearchError::InvalidFuzziness("3".into()).is_precondition());
        assert!(!CnSearchError::CrawlFailure("boom".into()).is_precondition());
    }
}
