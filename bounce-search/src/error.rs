//! Error types for the bounce-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys, secrets or bearer tokens
//! appear in error messages.

/// Errors that can occur during a travel search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The search criteria were rejected before any provider was called.
    #[error("validation error: {0}")]
    Validation(String),

    /// A provider did not answer within its time budget.
    #[error("provider timed out: {0}")]
    Timeout(String),

    /// An HTTP request to a provider API failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A provider response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Acquiring or refreshing a provider access token failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A provider refused the request for a domain reason
    /// (unsupported destination, partner access missing, etc.).
    #[error("provider error: {0}")]
    Provider(String),

    /// Invalid search or provider configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Returns `true` if this error was caused by the caller's input
    /// rather than by a provider or the environment.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Convenience type alias for bounce-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
