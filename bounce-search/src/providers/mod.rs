//! Listing provider implementations.
//!
//! Each module provides a struct implementing [`crate::provider::ListingProvider`].
//! [`Provider`] wraps them so a heterogeneous, config-driven provider list
//! can be registered with one [`crate::Aggregator`].

pub mod amadeus;
pub mod demo;
pub mod static_listings;
pub mod unavailable;

pub use amadeus::{AmadeusConfig, AmadeusProvider};
pub use demo::DemoProvider;
pub use static_listings::StaticProvider;
pub use unavailable::UnavailableProvider;

use std::time::Duration;

use crate::error::SearchError;
use crate::provider::ListingProvider;
use crate::types::{Listing, ProviderKind, SearchCriteria};

/// Any of the built-in providers.
pub enum Provider {
    /// Live Amadeus hotel list.
    Amadeus(AmadeusProvider),
    /// Fixed listings.
    Static(StaticProvider),
    /// Registered but not yet queryable.
    Unavailable(UnavailableProvider),
    /// Generated demo data.
    Demo(DemoProvider),
}

impl Provider {
    /// Build the provider for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the Amadeus configuration is
    /// invalid. Missing Amadeus credentials are not an error here.
    pub fn from_kind(
        kind: ProviderKind,
        amadeus: &AmadeusConfig,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        Ok(match kind {
            ProviderKind::Amadeus => {
                Self::Amadeus(AmadeusProvider::from_env(amadeus.clone(), timeout)?)
            }
            ProviderKind::Vrbo => Self::Static(StaticProvider::vrbo_sample()),
            ProviderKind::Booking | ProviderKind::Airbnb => {
                Self::Unavailable(UnavailableProvider::new(kind))
            }
            ProviderKind::Demo => Self::Demo(DemoProvider),
        })
    }
}

impl ListingProvider for Provider {
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>, SearchError> {
        match self {
            Self::Amadeus(p) => p.search(criteria).await,
            Self::Static(p) => p.search(criteria).await,
            Self::Unavailable(p) => p.search(criteria).await,
            Self::Demo(p) => p.search(criteria).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(kind: ProviderKind) -> Provider {
        Provider::from_kind(kind, &AmadeusConfig::default(), Duration::from_secs(2))
            .expect("provider builds")
    }

    #[test]
    fn every_kind_builds() {
        for kind in ProviderKind::all() {
            let _ = build(*kind);
        }
    }

    #[tokio::test]
    async fn vrbo_dispatches_to_sample() {
        let listings = build(ProviderKind::Vrbo)
            .search(&SearchCriteria::new("Paris"))
            .await
            .expect("ok");
        assert_eq!(listings[0].name, "VRBO Sample");
    }

    #[tokio::test]
    async fn booking_and_airbnb_are_empty() {
        for kind in [ProviderKind::Booking, ProviderKind::Airbnb] {
            let listings = build(kind).search(&SearchCriteria::new("Paris")).await;
            assert!(listings.expect("ok").is_empty());
        }
    }

    #[tokio::test]
    async fn demo_dispatches_to_generator() {
        let listings = build(ProviderKind::Demo)
            .search(&SearchCriteria::new("Oslo"))
            .await
            .expect("ok");
        assert_eq!(listings.len(), 20);
    }

    #[test]
    fn invalid_amadeus_config_rejected() {
        let config = AmadeusConfig {
            max_hotels: 0,
            ..Default::default()
        };
        assert!(Provider::from_kind(ProviderKind::Amadeus, &config, Duration::from_secs(1)).is_err());
        // Non-Amadeus kinds ignore the Amadeus table.
        assert!(Provider::from_kind(ProviderKind::Vrbo, &config, Duration::from_secs(1)).is_ok());
    }
}
