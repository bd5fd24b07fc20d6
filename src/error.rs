//! Error types for the bounce service.

use bounce_search::SearchError;

/// Top-level error type for the travel search service.
#[derive(Debug, thiserror::Error)]
pub enum BounceError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP server startup or runtime error.
    #[error("server error: {0}")]
    Server(String),

    /// Search pipeline error.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, BounceError>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn search_errors_convert_transparently() {
        let err: BounceError = SearchError::Validation("location must not be empty".into()).into();
        assert_eq!(err.to_string(), "validation error: location must not be empty");
    }

    #[test]
    fn io_errors_convert() {
        let err: BounceError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
