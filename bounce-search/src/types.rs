//! Core types for search criteria, listings, scores and provider identification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SearchError;

/// What the traveller is searching for.
///
/// Deserialises from the JSON request body. `destination` is accepted as
/// an alias for `location`; a missing location deserialises as empty and
/// is rejected by [`SearchCriteria::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    /// Destination, usually `"City"` or `"City, Country"`.
    #[serde(default, alias = "destination")]
    pub location: String,
    /// Check-in date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Check-out date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Number of guests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<u32>,
}

impl SearchCriteria {
    /// Criteria for a location with no dates or guest count.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Default::default()
        }
    }

    /// Sets the stay dates.
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Sets the guest count.
    pub fn with_guests(mut self, guests: u32) -> Self {
        self.guests = Some(guests);
        self
    }

    /// The city part of the location: text before the first comma,
    /// trimmed. `"Paris, France"` yields `"Paris"`.
    pub fn city(&self) -> &str {
        self.location
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
    }

    /// Rejects criteria that no provider should be asked about.
    ///
    /// Checks:
    /// - `location` must not be empty or whitespace
    /// - `guests`, when present, must be greater than 0
    /// - `end_date` must not precede `start_date` when both are present
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.location.trim().is_empty() {
            return Err(SearchError::Validation(
                "location must not be empty".into(),
            ));
        }
        if self.guests == Some(0) {
            return Err(SearchError::Validation(
                "guests must be greater than 0".into(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(SearchError::Validation(
                    "endDate must not be before startDate".into(),
                ));
            }
        }
        Ok(())
    }
}

/// One candidate accommodation offer returned by a provider.
///
/// Only `price`, `transit` and `service` feed the score; the remaining
/// optional fields are carried through to the response for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Property name as reported by the provider.
    pub name: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Nightly price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Transit convenience factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit: Option<f64>,
    /// Service/amenity richness factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<f64>,
    /// Provider-side identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Guest rating, 0.0 to 5.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Amenity labels (`"WiFi"`, `"Pool"`, ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
    /// Label of the provider that returned this listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Listing {
    /// A listing with only the identity fields set.
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            price: None,
            transit: None,
            service: None,
            id: None,
            rating: None,
            amenities: Vec::new(),
            source: None,
        }
    }

    /// Sets the nightly price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the transit factor.
    pub fn with_transit(mut self, transit: f64) -> Self {
        self.transit = Some(transit);
        self
    }

    /// Sets the service factor.
    pub fn with_service(mut self, service: f64) -> Self {
        self.service = Some(service);
        self
    }

    /// Sets the provider label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Identity used for cross-provider deduplication: `"lat:lon:name"`.
    ///
    /// Exact and case-sensitive on `name`. Integral coordinates render
    /// without a fractional part, so `(0.0, 0.0, "test")` keys as
    /// `"0:0:test"`.
    pub fn dedup_key(&self) -> String {
        format!("{}:{}:{}", self.lat, self.lon, self.name)
    }
}

/// Per-factor breakdown of a listing's ranking score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingScore {
    /// Price value factor (`1000 / price`).
    pub value: f64,
    /// Transit convenience factor.
    pub transit: f64,
    /// Service/amenity factor.
    pub service: f64,
    /// Weighted sum used for ranking.
    pub total: f64,
}

/// A listing annotated with its score. Serialises flat: the listing
/// fields plus a `score` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredListing {
    /// The scored listing.
    #[serde(flatten)]
    pub listing: Listing,
    /// Its score.
    pub score: ListingScore,
}

/// Response of one search: the top-ranked highlights and everything else.
///
/// `highlights` holds at most three entries and is a prefix of the full
/// ranking; `rest` is exactly the remaining suffix.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Top-ranked listings, at most three.
    pub highlights: Vec<ScoredListing>,
    /// Remaining listings in ranked order.
    pub rest: Vec<ScoredListing>,
}

impl SearchResult {
    /// Total number of listings in the result.
    pub fn len(&self) -> usize {
        self.highlights.len() + self.rest.len()
    }

    /// Returns `true` if no provider contributed any listing.
    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty() && self.rest.is_empty()
    }

    /// All listings in ranked order (`highlights` followed by `rest`).
    pub fn iter(&self) -> impl Iterator<Item = &ScoredListing> {
        self.highlights.iter().chain(self.rest.iter())
    }
}

/// Supported listing data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Amadeus self-service hotel API.
    Amadeus,
    /// Booking.com, pending RapidAPI partner access.
    Booking,
    /// VRBO, served from a fixed sample.
    Vrbo,
    /// Airbnb, pending partner API access.
    Airbnb,
    /// Deterministic demo listings derived from the destination name.
    Demo,
}

impl ProviderKind {
    /// Returns the label used in logs, cache keys and `Listing::source`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Amadeus => "amadeus",
            Self::Booking => "booking",
            Self::Vrbo => "vrbo",
            Self::Airbnb => "airbnb",
            Self::Demo => "demo",
        }
    }

    /// Returns all available provider variants.
    pub fn all() -> &'static [ProviderKind] {
        &[
            Self::Amadeus,
            Self::Booking,
            Self::Vrbo,
            Self::Airbnb,
            Self::Demo,
        ]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
