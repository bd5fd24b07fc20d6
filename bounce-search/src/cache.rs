//! In-memory cache of per-provider listings.
//!
//! Caches each provider's raw listings keyed by the (provider label,
//! normalised criteria) pair. Uses [`moka`] for async-friendly caching
//! with TTL and capacity eviction. Concurrent lookups of the same
//! missing key share one upstream fetch.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache;

use crate::error::SearchError;
use crate::types::{Listing, SearchCriteria};

/// Composite cache key: provider label + normalised criteria.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    provider: String,
    /// Trimmed location, casing kept.
    location: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    guests: Option<u32>,
}

impl CacheKey {
    /// Build a deterministic key for one provider's answer to `criteria`.
    ///
    /// The location is trimmed so `"Paris "` and `"Paris"` share an
    /// entry. Casing is kept because providers echo it into listing names.
    pub fn new(provider: &str, criteria: &SearchCriteria) -> Self {
        Self {
            provider: provider.to_owned(),
            location: criteria.location.trim().to_owned(),
            start_date: criteria.start_date,
            end_date: criteria.end_date,
            guests: criteria.guests,
        }
    }
}

/// Shared cache handle. Cloning is cheap; clones share storage.
#[derive(Clone)]
pub struct ListingCache {
    inner: Cache<CacheKey, Vec<Listing>>,
}

impl ListingCache {
    /// Create a cache holding at most `capacity` result sets for `ttl`.
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Look up cached listings for `key`.
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<Listing>> {
        self.inner.get(key).await
    }

    /// Insert listings for `key`, replacing any previous entry.
    pub async fn insert(&self, key: CacheKey, listings: Vec<Listing>) {
        self.inner.insert(key, listings).await;
    }

    /// Return the cached listings for `key`, or run `fetch` and cache
    /// its result.
    ///
    /// Only one `fetch` runs per key at a time; concurrent callers for
    /// the same key wait for it and receive the same listings. A failed
    /// fetch is not cached and its error is returned to every waiter.
    pub async fn get_or_fetch<F>(&self, key: CacheKey, fetch: F) -> Result<Vec<Listing>, SearchError>
    where
        F: std::future::Future<Output = Result<Vec<Listing>, SearchError>>,
    {
        self.inner
            .try_get_with(key, fetch)
            .await
            .map_err(|err: Arc<SearchError>| (*err).clone())
    }
}

impl std::fmt::Debug for ListingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}
