//! Core aggregator: concurrent multi-provider fan-out, dedup, score, rank.
//!
//! Queries all registered providers concurrently, each bounded by a
//! timeout, guarded by a circuit breaker and optionally served from the
//! listing cache. Results are flattened in registration order,
//! deduplicated, scored and ranked into highlights and the rest.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::cache::{CacheKey, ListingCache};
use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::provider::ListingProvider;
use crate::providers::{AmadeusConfig, Provider};
use crate::types::{Listing, SearchCriteria, SearchResult};

use super::dedup::deduplicate;
use super::ranking::rank;
use super::scoring::{score_listings, ScoreWeights};

/// Aggregates listings from a set of labelled providers.
///
/// Shared state (cache, circuit breaker) lives inside the aggregator, so
/// one instance should serve every request.
pub struct Aggregator<P = Provider> {
    providers: Vec<(String, P)>,
    weights: ScoreWeights,
    timeout: Duration,
    cache: Option<ListingCache>,
    breaker: Mutex<CircuitBreaker>,
}

impl<P: ListingProvider> Aggregator<P> {
    /// An aggregator with no providers and a cache built from `config`.
    ///
    /// `config.providers` is ignored; register providers with
    /// [`Aggregator::with_provider`].
    pub fn new(config: &SearchConfig) -> Self {
        let cache = config.cache_enabled().then(|| {
            ListingCache::new(
                config.cache_capacity,
                Duration::from_secs(config.cache_ttl_seconds),
            )
        });
        Self {
            providers: Vec::new(),
            weights: config.weights,
            timeout: config.provider_timeout(),
            cache,
            breaker: Mutex::new(CircuitBreaker::new(config.circuit_breaker.clone())),
        }
    }

    /// Register `provider` under `label`. Registration order is the
    /// flatten order of every search.
    pub fn with_provider(mut self, label: impl Into<String>, provider: P) -> Self {
        self.providers.push((label.into(), provider));
        self
    }

    /// Replace the listing cache.
    pub fn with_cache(mut self, cache: Option<ListingCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the per-provider timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the circuit breaker configuration, resetting its state.
    pub fn with_circuit_breaker(mut self, config: CircuitBreakerConfig) -> Self {
        self.breaker = Mutex::new(CircuitBreaker::new(config));
        self
    }

    /// Labels of the registered providers, in registration order.
    pub fn provider_labels(&self) -> Vec<&str> {
        self.providers.iter().map(|(label, _)| label.as_str()).collect()
    }

    /// `(label, state, consecutive_failures)` for every provider the
    /// breaker has seen.
    pub fn circuit_health(&self) -> Vec<(String, CircuitState, u32)> {
        self.breaker().health_report()
    }

    /// Run one aggregated search.
    ///
    /// # Pipeline
    ///
    /// 1. Validate `criteria`
    /// 2. Fan out to every provider concurrently with [`futures::future::join_all`]
    /// 3. Log per-provider failures at warn level; a failed provider contributes nothing
    /// 4. Flatten in registration order
    /// 5. Deduplicate by `(lat, lon, name)`, first occurrence wins
    /// 6. Score and rank into highlights and the rest
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Validation`] for invalid criteria. Provider
    /// failures never surface here; if every provider fails the result
    /// is empty.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResult> {
        criteria.validate()?;
        tracing::trace!(?criteria, "aggregated search");

        let queries = self
            .providers
            .iter()
            .map(|(label, provider)| self.query_provider(label, provider, criteria));
        let outcomes = futures::future::join_all(queries).await;

        let flattened: Vec<Listing> = outcomes.into_iter().flatten().collect();
        let unique = deduplicate(flattened);
        let result = rank(score_listings(unique, &self.weights));

        tracing::debug!(
            providers = self.providers.len(),
            listings = result.len(),
            highlights = result.highlights.len(),
            "search complete"
        );
        Ok(result)
    }

    /// Query one provider, turning every kind of failure into an empty
    /// contribution.
    ///
    /// The breaker is updated only by a real upstream call: cache hits
    /// leave it untouched and callers coalesced onto one in-flight fetch
    /// count as one outcome.
    async fn query_provider(&self, label: &str, provider: &P, criteria: &SearchCriteria) -> Vec<Listing> {
        if !self.breaker().should_attempt(label) {
            tracing::debug!(provider = %label, "circuit open, skipping provider");
            return Vec::new();
        }

        let timeout = self.timeout;
        let fetch = async {
            let outcome = match tokio::time::timeout(timeout, provider.search(criteria)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(SearchError::Timeout(format!(
                    "{label} after {}s",
                    timeout.as_secs_f64()
                ))),
            };
            match &outcome {
                Ok(_) => self.breaker().record_success(label),
                Err(_) => self.breaker().record_failure(label),
            }
            outcome
        };
        let outcome = match &self.cache {
            Some(cache) => cache.get_or_fetch(CacheKey::new(label, criteria), fetch).await,
            None => fetch.await,
        };

        match outcome {
            Ok(mut listings) => {
                tracing::debug!(provider = %label, count = listings.len(), "provider returned listings");
                for listing in &mut listings {
                    if listing.source.is_none() {
                        listing.source = Some(label.to_owned());
                    }
                }
                listings
            }
            Err(err) => {
                tracing::warn!(provider = %label, error = %err, "provider query failed");
                Vec::new()
            }
        }
    }

    fn breaker(&self) -> MutexGuard<'_, CircuitBreaker> {
        self.breaker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Aggregator<Provider> {
    /// Build an aggregator with every provider listed in `config`,
    /// labelled by its [`crate::ProviderKind`] name.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if either configuration is invalid.
    pub fn from_config(config: &SearchConfig, amadeus: &AmadeusConfig) -> Result<Self> {
        config.validate()?;
        let timeout = config.provider_timeout();
        config
            .providers
            .iter()
            .try_fold(Self::new(config), |aggregator, kind| {
                let provider = Provider::from_kind(*kind, amadeus, timeout)?;
                Ok(aggregator.with_provider(kind.name(), provider))
            })
    }
}

impl<P> std::fmt::Debug for Aggregator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field(
                "providers",
                &self.providers.iter().map(|(l, _)| l.as_str()).collect::<Vec<_>>(),
            )
            .field("weights", &self.weights)
            .field("timeout", &self.timeout)
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::StaticProvider;
    use crate::types::ProviderKind;

    fn no_cache() -> SearchConfig {
        SearchConfig {
            cache_ttl_seconds: 0,
            ..Default::default()
        }
    }

    fn listing(name: &str, price: f64) -> Listing {
        Listing::new(name, 1.0, 1.0).with_price(price)
    }

    #[tokio::test]
    async fn invalid_criteria_rejected() {
        let aggregator: Aggregator<StaticProvider> = Aggregator::new(&no_cache());
        let err = aggregator.search(&SearchCriteria::new("  ")).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn no_providers_yields_empty_result() {
        let aggregator: Aggregator<StaticProvider> = Aggregator::new(&no_cache());
        let result = aggregator.search(&SearchCriteria::new("Paris")).await.expect("ok");
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn source_tagged_with_label_when_absent() {
        let aggregator = Aggregator::new(&no_cache())
            .with_provider("mine", StaticProvider::new(vec![listing("A", 100.0)]))
            .with_provider("vrbo", StaticProvider::vrbo_sample());
        let result = aggregator.search(&SearchCriteria::new("Paris")).await.expect("ok");
        let sources: Vec<_> = result
            .iter()
            .map(|s| s.listing.source.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(sources, ["mine", "vrbo"]);
    }

    #[test]
    fn labels_in_registration_order() {
        let aggregator = Aggregator::new(&no_cache())
            .with_provider("b", StaticProvider::default())
            .with_provider("a", StaticProvider::default());
        assert_eq!(aggregator.provider_labels(), ["b", "a"]);
    }

    #[test]
    fn from_config_registers_configured_kinds() {
        let config = SearchConfig {
            providers: vec![ProviderKind::Vrbo, ProviderKind::Demo, ProviderKind::Booking],
            ..Default::default()
        };
        let aggregator =
            Aggregator::from_config(&config, &AmadeusConfig::default()).expect("builds");
        assert_eq!(aggregator.provider_labels(), ["vrbo", "demo", "booking"]);
    }

    #[test]
    fn from_config_rejects_invalid_config() {
        let config = SearchConfig {
            provider_timeout_seconds: 0,
            ..Default::default()
        };
        assert!(Aggregator::from_config(&config, &AmadeusConfig::default()).is_err());
    }

    #[tokio::test]
    async fn default_providers_return_vrbo_sample() {
        let config = SearchConfig {
            providers: vec![ProviderKind::Booking, ProviderKind::Vrbo, ProviderKind::Airbnb],
            ..no_cache()
        };
        let aggregator =
            Aggregator::from_config(&config, &AmadeusConfig::default()).expect("builds");
        let result = aggregator.search(&SearchCriteria::new("Paris")).await.expect("ok");
        assert_eq!(result.highlights.len(), 1);
        assert_eq!(result.highlights[0].listing.name, "VRBO Sample");
        assert_eq!(result.highlights[0].score.value, 10.0);
        assert!(result.rest.is_empty());
    }

    #[test]
    fn debug_lists_labels() {
        let aggregator = Aggregator::new(&no_cache()).with_provider("vrbo", StaticProvider::vrbo_sample());
        assert!(format!("{aggregator:?}").contains("vrbo"));
    }
}
