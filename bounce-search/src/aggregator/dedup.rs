//! Listing deduplication by `(lat, lon, name)`.
//!
//! Two listings with identical coordinates and name are the same
//! physical offer even when different providers returned them. The
//! first occurrence in flatten order wins; later duplicates are dropped.

use std::collections::HashSet;

use crate::types::Listing;

/// Deduplicate listings by [`Listing::dedup_key`], keeping the first
/// occurrence of each key.
///
/// The relative order of surviving listings is preserved, so ranking
/// ties still resolve by provider-registration order.
pub fn deduplicate(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen: HashSet<String> = HashSet::with_capacity(listings.len());
    let before = listings.len();

    let unique: Vec<Listing> = listings
        .into_iter()
        .filter(|listing| seen.insert(listing.dedup_key()))
        .collect();

    let dropped = before - unique.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = unique.len(), "dropped duplicate listings");
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str, lat: f64, lon: f64, source: &str) -> Listing {
        Listing::new(name, lat, lon).with_source(source)
    }

    #[test]
    fn unique_listings_pass_through() {
        let deduped = deduplicate(vec![
            listing("A", 1.0, 1.0, "vrbo"),
            listing("B", 1.0, 1.0, "vrbo"),
        ]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn identical_key_merged() {
        let deduped = deduplicate(vec![
            listing("A", 1.0, 1.0, "amadeus"),
            listing("A", 1.0, 1.0, "vrbo"),
        ]);
        assert_eq!(deduped.len(), 1);
    }

    #[test]
    fn first_occurrence_wins_even_with_different_fields() {
        let deduped = deduplicate(vec![
            listing("A", 1.0, 1.0, "amadeus").with_price(80.0),
            listing("A", 1.0, 1.0, "vrbo").with_price(40.0),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].source.as_deref(), Some("amadeus"));
        assert_eq!(deduped[0].price, Some(80.0));
    }

    #[test]
    fn name_comparison_is_case_sensitive() {
        let deduped = deduplicate(vec![
            listing("Hotel", 1.0, 1.0, "a"),
            listing("hotel", 1.0, 1.0, "b"),
        ]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn different_coordinates_are_different_offers() {
        let deduped = deduplicate(vec![
            listing("A", 1.0, 1.0, "a"),
            listing("A", 1.0, 1.5, "a"),
        ]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn order_preserved_after_dedup() {
        let deduped = deduplicate(vec![
            listing("C", 0.0, 0.0, "a"),
            listing("A", 0.0, 0.0, "a"),
            listing("C", 0.0, 0.0, "b"),
            listing("B", 0.0, 0.0, "b"),
        ]);
        let names: Vec<&str> = deduped.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(deduplicate(vec![]).is_empty());
    }
}
