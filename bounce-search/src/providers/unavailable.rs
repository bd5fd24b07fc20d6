//! Placeholder for sources whose partner API access is still pending.

use crate::error::SearchError;
use crate::provider::ListingProvider;
use crate::types::{Listing, ProviderKind, SearchCriteria};

/// A provider that is registered but cannot be queried yet.
///
/// Every search succeeds with no listings, so the source shows up in the
/// pipeline without ever contributing.
#[derive(Debug, Clone, Copy)]
pub struct UnavailableProvider {
    kind: ProviderKind,
}

impl UnavailableProvider {
    /// A placeholder for `kind`.
    pub fn new(kind: ProviderKind) -> Self {
        Self { kind }
    }

    /// Which source this stands in for.
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }
}

impl ListingProvider for UnavailableProvider {
    async fn search(&self, _criteria: &SearchCriteria) -> Result<Vec<Listing>, SearchError> {
        tracing::debug!(provider = %self.kind, "partner API access pending, no listings");
        Ok(Vec::new())
    }
}
