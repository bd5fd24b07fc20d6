//! Shared HTTP client for live provider APIs.

use crate::error::SearchError;
use std::time::Duration;

/// User-Agent sent to provider APIs.
const USER_AGENT: &str = concat!("bounce-search/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] for provider API calls.
///
/// The client has:
/// - A request timeout of `timeout`
/// - A fixed, identifiable User-Agent
/// - gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Join `path` onto `base`, tolerating a trailing slash on either side.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `base` is not a valid URL.
pub fn endpoint(base: &str, path: &str) -> Result<url::Url, SearchError> {
    let base = format!("{}/", base.trim_end_matches('/'));
    url::Url::parse(&base)
        .and_then(|b| b.join(path.trim_start_matches('/')))
        .map_err(|e| SearchError::Config(format!("invalid provider base URL: {e}")))
}
