//! Trait definition for pluggable listing providers.
//!
//! Each data source (Amadeus, Booking, VRBO, Airbnb, demo data)
//! implements [`ListingProvider`] so the aggregator can fan out to any
//! mix of them without knowing how each obtains its listings.

use crate::error::SearchError;
use crate::types::{Listing, SearchCriteria};

/// A pluggable source of candidate listings.
///
/// Implementors handle their own transport, authentication and response
/// mapping. Any failure (network, auth, unsupported destination) is
/// reported as an `Err`; the aggregator treats it as that provider
/// contributing nothing.
///
/// All implementations must be `Send + Sync` for concurrent fan-out.
pub trait ListingProvider: Send + Sync {
    /// Return candidate listings for `criteria`.
    ///
    /// `criteria` has already been validated. Returning an empty vector
    /// is a valid answer, distinct from failing.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the provider cannot answer.
    fn search(
        &self,
        criteria: &SearchCriteria,
    ) -> impl std::future::Future<Output = Result<Vec<Listing>, SearchError>> + Send;
}
