//! Deterministic demo listings.
//!
//! Generates a stable set of hotels for any destination so the service
//! can be exercised without provider credentials. Every value is derived
//! from a 32-bit rolling hash of the hotel name, so the same destination
//! always yields the same listings.

use crate::error::SearchError;
use crate::provider::ListingProvider;
use crate::providers::amadeus::city_coordinates;
use crate::types::{Listing, ProviderKind, SearchCriteria};

/// Number of generated "City Hotel N" listings after the featured five.
const ADDITIONAL_HOTELS: usize = 15;

/// Spread of generated coordinates around the city centre, in degrees.
const COORDINATE_SPREAD: f64 = 0.1;

/// Rolling `hash * 31 + unit` over UTF-16 code units in wrapping 32-bit
/// arithmetic, returned as its absolute value.
pub fn name_hash(s: &str) -> u32 {
    s.encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

/// Curated featured hotels, matched by substring of the lowercased city.
const CURATED: &[(&str, [&str; 5])] = &[
    (
        "paris",
        [
            "Le Grand Paris Hotel",
            "Hotel des Champs-Élysées",
            "Boutique Louvre Palace",
            "The Eiffel Tower Inn",
            "Montmartre Luxury Suites",
        ],
    ),
    (
        "london",
        [
            "The Royal Westminster",
            "Thames View Hotel",
            "Covent Garden Boutique",
            "Tower Bridge Lodge",
            "Hyde Park Manor",
        ],
    ),
    (
        "tokyo",
        [
            "Shibuya Sky Hotel",
            "Imperial Palace Inn",
            "Ginza Luxury Suites",
            "Harajuku Modern Hotel",
            "Tokyo Bay Resort",
        ],
    ),
    (
        "new york",
        [
            "Manhattan Grand Hotel",
            "Times Square Boutique",
            "Central Park View Hotel",
            "Brooklyn Bridge Inn",
            "Fifth Avenue Luxury",
        ],
    ),
    (
        "los angeles",
        [
            "Hollywood Hills Hotel",
            "Beverly Hills Boutique",
            "Santa Monica Beach Resort",
            "Downtown LA Tower",
            "Sunset Strip Inn",
        ],
    ),
    (
        "miami",
        [
            "South Beach Grand",
            "Art Deco Boutique Hotel",
            "Biscayne Bay Resort",
            "Ocean Drive Inn",
            "Coral Gables Luxury",
        ],
    ),
];

fn featured_names(city: &str) -> [String; 5] {
    let lowered = city.to_lowercase();
    if let Some((_, names)) = CURATED.iter().find(|(needle, _)| lowered.contains(needle)) {
        return names.map(str::to_owned);
    }
    [
        format!("{city} Grand Hotel"),
        format!("The {city} Boutique"),
        format!("{city} Business Center"),
        format!("Historic {city} Inn"),
        format!("{city} Luxury Resort"),
    ]
}

fn featured_amenities(index: usize) -> &'static [&'static str] {
    match index {
        0 => &["WiFi", "Pool", "Spa", "Restaurant"],
        1 => &["WiFi", "Gym", "Business Center"],
        2 => &["WiFi", "Bar", "Room Service"],
        _ => &["WiFi", "Pool", "Breakfast"],
    }
}

fn additional_amenities(index: usize) -> &'static [&'static str] {
    match index % 3 {
        0 => &["WiFi", "Pool", "Gym"],
        1 => &["WiFi", "Spa", "Restaurant"],
        _ => &["WiFi", "Business Center"],
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Offset from the city centre derived from two slices of the hash.
fn offset(hash: u32) -> (f64, f64) {
    let unit = |n: u32| f64::from(n % 1000) / 1000.0 - 0.5;
    (
        unit(hash) * COORDINATE_SPREAD,
        unit(hash / 1000) * COORDINATE_SPREAD,
    )
}

fn make_listing(
    name: String,
    centre: (f64, f64),
    price: f64,
    rating: f64,
    id: u32,
    amenities: &[&str],
) -> Listing {
    let hash = name_hash(&name);
    let (dlat, dlon) = offset(hash);
    let mut listing = Listing::new(name, round4(centre.0 + dlat), round4(centre.1 + dlon))
        .with_price(price)
        .with_source(ProviderKind::Demo.name());
    listing.rating = Some(rating);
    listing.id = Some(format!("hotel-{id}"));
    listing.amenities = amenities.iter().map(|a| (*a).to_owned()).collect();
    listing
}

/// Generate the demo listings for `city`.
///
/// The five featured hotels are priced `120 + hash % 280 + 20 * index`
/// and rated `3.5 + (hash % 15) / 10`; the additional hotels are priced
/// `100 + hash % 200 + 15 * index` and rated `3.2 + (hash % 18) / 10`.
/// Ratings are capped at 5.0 and rounded to one decimal.
pub fn generate(city: &str) -> Vec<Listing> {
    let centre = city_coordinates(city).unwrap_or((0.0, 0.0));

    let featured = featured_names(city).into_iter().enumerate().map(|(i, name)| {
        let hash = name_hash(&name);
        let price = f64::from(120 + hash % 280) + 20.0 * i as f64;
        let rating = round1((3.5 + f64::from(hash % 15) / 10.0).min(5.0));
        make_listing(name, centre, price, rating, hash % 10_000, featured_amenities(i))
    });

    let additional = (0..ADDITIONAL_HOTELS).map(|i| {
        let name = format!("{city} Hotel {}", i + 6);
        let hash = name_hash(&name);
        let price = f64::from(100 + hash % 200) + 15.0 * i as f64;
        let rating = round1((3.2 + f64::from(hash % 18) / 10.0).min(5.0));
        make_listing(
            name,
            centre,
            price,
            rating,
            hash % 10_000 + 1000,
            additional_amenities(i),
        )
    });

    featured.chain(additional).collect()
}

/// Serves [`generate`]d listings for the criteria's city.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoProvider;

impl ListingProvider for DemoProvider {
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>, SearchError> {
        Ok(generate(criteria.city()))
    }
}
