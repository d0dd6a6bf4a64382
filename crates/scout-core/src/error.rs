//! Error types for per-ticker fetch failures

use thiserror::Error;

/// Result type alias for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// A failure to produce a [`crate::CompanyInfo`] record for one ticker
///
/// Every variant carries the ticker it belongs to, so a failure can be
/// reported on its own after the batch has been collected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The agent run itself failed (provider error, tool loop gave up, ...)
    #[error("agent run failed for {ticker}: {reason}")]
    AgentFailed {
        /// Ticker the fetch was running for
        ticker: String,
        /// Underlying error message
        reason: String,
    },

    /// The agent finished but its output did not conform to the schema
    #[error("response for {ticker} did not match the CompanyInfo schema: {reason}")]
    SchemaMismatch {
        /// Ticker the fetch was running for
        ticker: String,
        /// Underlying error message
        reason: String,
    },
}

impl FetchError {
    /// The ticker this failure belongs to
    pub fn ticker(&self) -> &str {
        match self {
            Self::AgentFailed { ticker, .. } | Self::SchemaMismatch { ticker, .. } => ticker,
        }
    }
}
