//! Providers that answer from a fixed listing set.

use crate::error::SearchError;
use crate::provider::ListingProvider;
use crate::types::{Listing, ProviderKind, SearchCriteria};

/// Returns the same listings for every search.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    listings: Vec<Listing>,
}

impl StaticProvider {
    /// A provider answering every search with `listings`.
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    /// The VRBO sample: a single listing at the origin priced at 100.
    pub fn vrbo_sample() -> Self {
        Self::new(vec![Listing::new("VRBO Sample", 0.0, 0.0)
            .with_price(100.0)
            .with_source(ProviderKind::Vrbo.name())])
    }

    /// The listings this provider returns.
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }
}

impl ListingProvider for StaticProvider {
    async fn search(&self, _criteria: &SearchCriteria) -> Result<Vec<Listing>, SearchError> {
        Ok(self.listings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn vrbo_sample_ignores_criteria() {
        let provider = StaticProvider::vrbo_sample();
        let paris = provider.search(&SearchCriteria::new("Paris")).await.expect("ok");
        let lima = provider.search(&SearchCriteria::new("Lima")).await.expect("ok");
        assert_eq!(paris, lima);
        assert_eq!(paris.len(), 1);
        assert_eq!(paris[0].name, "VRBO Sample");
        assert_eq!(paris[0].price, Some(100.0));
        assert_eq!(paris[0].dedup_key(), "0:0:VRBO Sample");
    }

    #[tokio::test]
    async fn empty_static_provider() {
        let provider = StaticProvider::default();
        assert!(provider.listings().is_empty());
        assert!(provider
            .search(&SearchCriteria::new("x"))
            .await
            .expect("ok")
            .is_empty());
    }
}
