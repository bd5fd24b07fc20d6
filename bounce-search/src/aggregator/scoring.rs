//! Listing scoring from price, transit convenience and service richness.
//!
//! Assigns each factor independently:
//! - Value: `1000 / price` for a positive, finite price, otherwise 0
//! - Transit: the listing's `transit` factor, otherwise 0
//! - Service: the listing's `service` factor, otherwise 0
//!
//! Formula: `total = w_value * value + w_transit * transit + w_service * service`
//! where every weight defaults to 1.0 (a plain sum).

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::{Listing, ListingScore, ScoredListing};

/// Numerator of the price value factor.
const VALUE_NUMERATOR: f64 = 1000.0;

/// Per-factor weights for the total score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight of the price value factor.
    pub value: f64,
    /// Weight of the transit factor.
    pub transit: f64,
    /// Weight of the service factor.
    pub service: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            value: 1.0,
            transit: 1.0,
            service: 1.0,
        }
    }
}

impl ScoreWeights {
    /// Weights must be finite and non-negative.
    pub fn validate(&self) -> Result<(), SearchError> {
        for (name, weight) in [
            ("value", self.value),
            ("transit", self.transit),
            ("service", self.service),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SearchError::Config(format!(
                    "weights.{name} must be a finite, non-negative number"
                )));
            }
        }
        Ok(())
    }
}

/// Score a listing with unit weights.
///
/// Pure and deterministic: the same listing always yields a
/// bit-identical score.
pub fn score(listing: &Listing) -> ListingScore {
    score_weighted(listing, &ScoreWeights::default())
}

/// Score a listing with explicit factor weights.
///
/// The factors reported in [`ListingScore`] are unweighted; only
/// `total` applies `weights`.
pub fn score_weighted(listing: &Listing, weights: &ScoreWeights) -> ListingScore {
    let value = listing
        .price
        .filter(|p| p.is_finite() && *p > 0.0)
        .map_or(0.0, |p| VALUE_NUMERATOR / p);
    let transit = finite_or_zero(listing.transit);
    let service = finite_or_zero(listing.service);
    let total = weights.value * value + weights.transit * transit + weights.service * service;
    ListingScore {
        value,
        transit,
        service,
        total,
    }
}

/// Attach scores to a list of listings, preserving order.
pub fn score_listings(listings: Vec<Listing>, weights: &ScoreWeights) -> Vec<ScoredListing> {
    listings
        .into_iter()
        .map(|listing| {
            let score = score_weighted(&listing, weights);
            ScoredListing { listing, score }
        })
        .collect()
}

fn finite_or_zero(factor: Option<f64>) -> f64 {
    factor.filter(|f| f.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(price: f64) -> Listing {
        Listing::new("Hotel", 0.0, 0.0).with_price(price)
    }

    #[test]
    fn price_100_has_value_10() {
        let s = score(&priced(100.0));
        assert!((s.value - 10.0).abs() < f64::EPSILON);
        assert!((s.total - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn price_50_has_value_20() {
        let s = score(&priced(50.0));
        assert!((s.value - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_price_has_value_0() {
        let s = score(&Listing::new("Hotel", 0.0, 0.0));
        assert_eq!(s.value, 0.0);
        assert_eq!(s.total, 0.0);
    }

    #[test]
    fn non_positive_price_has_value_0() {
        assert_eq!(score(&priced(0.0)).value, 0.0);
        assert_eq!(score(&priced(-20.0)).value, 0.0);
        assert_eq!(score(&priced(f64::NAN)).value, 0.0);
        assert_eq!(score(&priced(f64::INFINITY)).value, 0.0);
    }

    #[test]
    fn transit_and_service_default_to_0() {
        let s = score(&priced(100.0));
        assert_eq!(s.transit, 0.0);
        assert_eq!(s.service, 0.0);
    }

    #[test]
    fn total_is_plain_sum_with_default_weights() {
        let listing = priced(200.0).with_transit(1.5).with_service(2.5);
        let s = score(&listing);
        assert!((s.value - 5.0).abs() < f64::EPSILON);
        assert!((s.total - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn weights_apply_to_total_only() {
        let listing = priced(100.0).with_transit(2.0).with_service(4.0);
        let weights = ScoreWeights {
            value: 0.5,
            transit: 2.0,
            service: 0.0,
        };
        let s = score_weighted(&listing, &weights);
        assert!((s.value - 10.0).abs() < f64::EPSILON);
        assert!((s.transit - 2.0).abs() < f64::EPSILON);
        assert!((s.service - 4.0).abs() < f64::EPSILON);
        assert!((s.total - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn scoring_is_deterministic() {
        let listing = priced(37.0).with_transit(0.3);
        let a = score(&listing);
        let b = score(&listing);
        assert_eq!(a.total.to_bits(), b.total.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn score_listings_preserves_order() {
        let scored = score_listings(
            vec![priced(100.0), priced(50.0), priced(1000.0)],
            &ScoreWeights::default(),
        );
        let values: Vec<f64> = scored.iter().map(|s| s.score.value).collect();
        assert_eq!(values, vec![10.0, 20.0, 1.0]);
    }

    #[test]
    fn weights_validation() {
        assert!(ScoreWeights::default().validate().is_ok());
        let bad = ScoreWeights {
            service: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate().unwrap_err().to_string().contains("service"));
    }
}
