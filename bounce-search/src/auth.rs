//! Bearer-token credentials for providers that need OAuth.
//!
//! [`CredentialProvider`] holds the current token and its expiry and
//! hands out a valid token on demand, fetching a fresh one through its
//! [`TokenFetcher`] when the cached token is missing or within
//! [`REFRESH_MARGIN`] of expiring. Time comes from an injected
//! [`Clock`] so expiry can be driven deterministically in tests.

#[cfg(any(test, feature = "test-util"))]
use std::sync::Mutex as StdMutex;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::error::SearchError;

/// Tokens are refreshed this long before their reported expiry.
pub const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: StdMutex<Duration>,
}

#[cfg(any(test, feature = "test-util"))]
impl ManualClock {
    /// A clock frozen at the moment of creation.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: StdMutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        if let Ok(mut offset) = self.offset.lock() {
            *offset += by;
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().map(|o| *o).unwrap_or_default();
        self.origin + offset
    }
}

/// A freshly issued token as reported by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct TokenGrant {
    /// The bearer token.
    pub access_token: String,
    /// Lifetime in seconds from issue.
    pub expires_in: u64,
}

/// Obtains new tokens from an authorisation server.
pub trait TokenFetcher: Send + Sync {
    /// Request a new token.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Auth`] if the server refuses or cannot be reached.
    fn fetch_token(&self) -> impl std::future::Future<Output = Result<TokenGrant, SearchError>> + Send;
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Caches one bearer token and refreshes it before it expires.
///
/// Concurrent callers that find the token stale wait on the same lock,
/// so at most one refresh is in flight.
pub struct CredentialProvider<F, C = SystemClock> {
    fetcher: F,
    clock: C,
    cached: Mutex<Option<CachedToken>>,
}

impl<F: TokenFetcher> CredentialProvider<F, SystemClock> {
    /// A credential provider using the wall clock.
    pub fn new(fetcher: F) -> Self {
        Self::with_clock(fetcher, SystemClock)
    }
}

impl<F: TokenFetcher, C: Clock> CredentialProvider<F, C> {
    /// A credential provider using `clock` for expiry decisions.
    pub fn with_clock(fetcher: F, clock: C) -> Self {
        Self {
            fetcher,
            clock,
            cached: Mutex::new(None),
        }
    }

    /// Return a token that is valid for at least [`REFRESH_MARGIN`],
    /// fetching a new one if needed.
    ///
    /// # Errors
    ///
    /// Propagates the fetcher's error; the previous (stale) token is
    /// discarded.
    pub async fn get_valid_token(&self) -> Result<String, SearchError> {
        let mut cached = self.cached.lock().await;
        let now = self.clock.now();

        if let Some(token) = cached.as_ref().filter(|t| now < t.refresh_at) {
            return Ok(token.token.clone());
        }

        tracing::debug!("requesting new access token");
        *cached = None;
        let grant = self.fetcher.fetch_token().await?;
        let lifetime = Duration::from_secs(grant.expires_in).saturating_sub(REFRESH_MARGIN);
        *cached = Some(CachedToken {
            token: grant.access_token.clone(),
            refresh_at: now + lifetime,
        });
        tracing::debug!(valid_for_secs = lifetime.as_secs(), "access token cached");
        Ok(grant.access_token)
    }

    /// Drop the cached token so the next call fetches a new one.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    /// The clock driving expiry.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
