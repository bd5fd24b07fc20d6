//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which providers are queried, per-provider
//! timeouts, caching, score weights and circuit breaker behaviour. It is
//! embedded as the `[search]` table of the service's TOML config.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::aggregator::scoring::ScoreWeights;
use crate::circuit_breaker::CircuitBreakerConfig;
use crate::error::SearchError;
use crate::types::ProviderKind;

/// Configuration for the search aggregation pipeline.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Which providers to query, in registration order. Queried
    /// concurrently; results are flattened in this order.
    pub providers: Vec<ProviderKind>,
    /// Per-provider time budget in seconds. A provider that exceeds it
    /// contributes no listings.
    pub provider_timeout_seconds: u64,
    /// How long to cache per-provider results in seconds. Set to 0 to
    /// disable caching.
    pub cache_ttl_seconds: u64,
    /// Maximum number of cached per-provider result sets.
    pub cache_capacity: u64,
    /// Weights applied to each score factor.
    pub weights: ScoreWeights,
    /// Per-provider failure tracking.
    pub circuit_breaker: CircuitBreakerConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            providers: vec![
                ProviderKind::Amadeus,
                ProviderKind::Booking,
                ProviderKind::Vrbo,
                ProviderKind::Airbnb,
            ],
            provider_timeout_seconds: 8,
            cache_ttl_seconds: 600,
            cache_capacity: 100,
            weights: ScoreWeights::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// An empty provider list is valid: every search then returns an
    /// empty result.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.provider_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "provider_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.cache_ttl_seconds > 0 && self.cache_capacity == 0 {
            return Err(SearchError::Config(
                "cache_capacity must be greater than 0 when caching is enabled".into(),
            ));
        }
        if self.circuit_breaker.failure_threshold == 0 {
            return Err(SearchError::Config(
                "circuit_breaker.failure_threshold must be greater than 0".into(),
            ));
        }
        self.weights.validate()
    }

    /// The per-provider timeout as a [`Duration`].
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }

    /// Returns `true` if per-provider results should be cached.
    pub fn cache_enabled(&self) -> bool {
        self.cache_ttl_seconds > 0
    }
}
