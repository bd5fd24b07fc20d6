//! # bounce-search
//!
//! Multi-provider hotel search aggregation for Bounce.
//!
//! Given a destination with optional dates and guest count, this crate
//! asks every configured listing provider for candidates, merges their
//! answers and returns the three best listings as highlights followed by
//! the rest in ranked order.
//!
//! ## Design
//!
//! - Providers implement [`ListingProvider`]; [`providers::Provider`] wraps the built-in ones
//! - Queries all providers concurrently; one slow or failing provider never blocks the others
//! - Deduplicates by exact `(lat, lon, name)`, first occurrence wins
//! - Scores each listing as `1000 / price + transit + service`, with configurable weights
//! - In-memory per-provider cache with TTL and single-flight population
//! - Per-provider circuit breaker so a dead provider is skipped until it recovers
//!
//! ## Security
//!
//! - Provider secrets are read from the environment, never from config files
//! - Secrets never appear in error messages
//! - Search criteria are logged only at trace level

pub mod aggregator;
pub mod auth;
pub mod cache;
pub mod circuit_breaker;
pub mod config;
pub mod error;
pub mod http;
pub mod provider;
pub mod providers;
pub mod types;

pub use aggregator::scoring::{score, ScoreWeights};
pub use aggregator::Aggregator;
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use provider::ListingProvider;
pub use types::{Listing, ListingScore, ProviderKind, ScoredListing, SearchCriteria, SearchResult};

/// Run one search with providers built from `config`.
///
/// Builds a fresh [`Aggregator`] per call, so nothing is cached between
/// calls. Long-running services should build one aggregator with
/// [`Aggregator::from_config`] and reuse it.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration and
/// [`SearchError::Validation`] for invalid criteria. Provider failures
/// only reduce the result.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> bounce_search::Result<()> {
/// use bounce_search::{SearchConfig, SearchCriteria};
/// use bounce_search::providers::AmadeusConfig;
///
/// let criteria = SearchCriteria::new("Paris, France");
/// let result = bounce_search::search(&criteria, &SearchConfig::default(), &AmadeusConfig::default()).await?;
/// for listing in &result.highlights {
///     println!("{}: {:.1}", listing.listing.name, listing.score.total);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    criteria: &SearchCriteria,
    config: &SearchConfig,
    amadeus: &providers::AmadeusConfig,
) -> Result<SearchResult> {
    Aggregator::from_config(config, amadeus)?.search(criteria).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_with_demo_provider() {
        let config = SearchConfig {
            providers: vec![ProviderKind::Demo],
            ..Default::default()
        };
        let result = search(
            &SearchCriteria::new("Oslo"),
            &config,
            &providers::AmadeusConfig::default(),
        )
        .await
        .expect("ok");
        assert_eq!(result.highlights.len(), 3);
        assert_eq!(result.rest.len(), 17);
    }

    #[tokio::test]
    async fn search_rejects_invalid_config() {
        let config = SearchConfig {
            provider_timeout_seconds: 0,
            ..Default::default()
        };
        let err = search(
            &SearchCriteria::new("Oslo"),
            &config,
            &providers::AmadeusConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }
}
