//! Amadeus self-service hotel API.
//!
//! Authenticates with the OAuth client-credentials grant and lists hotels
//! around the destination city with the `hotels/by-geocode` reference
//! endpoint. The destination is resolved to coordinates through a small
//! built-in table of major cities; other destinations are reported as
//! unsupported.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::{CredentialProvider, TokenFetcher, TokenGrant};
use crate::error::SearchError;
use crate::http;
use crate::provider::ListingProvider;
use crate::types::{Listing, ProviderKind, SearchCriteria};

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const HOTELS_BY_GEOCODE_PATH: &str = "/v1/reference-data/locations/hotels/by-geocode";

/// Coordinates of the destinations the geocode search supports.
const CITY_COORDINATES: &[(&str, f64, f64)] = &[
    ("paris", 48.8566, 2.3522),
    ("london", 51.5074, -0.1278),
    ("new york", 40.7128, -74.0060),
    ("tokyo", 35.6762, 139.6503),
    ("rome", 41.9028, 12.4964),
    ("barcelona", 41.3851, 2.1734),
    ("amsterdam", 52.3676, 4.9041),
    ("berlin", 52.5200, 13.4050),
    ("sydney", -33.8688, 151.2093),
    ("bangkok", 13.7563, 100.5018),
    ("dubai", 25.2048, 55.2708),
    ("singapore", 1.3521, 103.8198),
    ("istanbul", 41.0082, 28.9784),
    ("los angeles", 34.0522, -118.2437),
    ("miami", 25.7617, -80.1918),
    ("madrid", 40.4168, -3.7038),
    ("vienna", 48.2082, 16.3738),
    ("prague", 50.0755, 14.4378),
    ("copenhagen", 55.6761, 12.5683),
    ("stockholm", 59.3293, 18.0686),
];

/// Look up `(lat, lon)` for a city name, case-insensitively.
pub fn city_coordinates(city: &str) -> Option<(f64, f64)> {
    let key = city.trim().to_lowercase();
    CITY_COORDINATES
        .iter()
        .find(|(name, _, _)| *name == key)
        .map(|&(_, lat, lon)| (lat, lon))
}

/// Configuration of the `[amadeus]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmadeusConfig {
    /// API root, without the `/v1` prefix.
    pub base_url: String,
    /// Environment variable holding the API key (OAuth client id).
    pub api_key_env: String,
    /// Environment variable holding the API secret.
    pub api_secret_env: String,
    /// Search radius around the city centre, in kilometres.
    pub radius_km: u32,
    /// Maximum number of hotels mapped into listings.
    pub max_hotels: usize,
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            base_url: "https://test.api.amadeus.com".to_owned(),
            api_key_env: "AMADEUS_API_KEY".to_owned(),
            api_secret_env: "AMADEUS_API_SECRET".to_owned(),
            radius_km: 20,
            max_hotels: 25,
        }
    }
}

impl AmadeusConfig {
    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), SearchError> {
        http::endpoint(&self.base_url, TOKEN_PATH)?;
        if self.radius_km == 0 {
            return Err(SearchError::Config(
                "amadeus.radius_km must be greater than 0".into(),
            ));
        }
        if self.max_hotels == 0 {
            return Err(SearchError::Config(
                "amadeus.max_hotels must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Read the client id and secret from the configured environment
    /// variables. Returns `None` unless both are set and non-empty.
    pub fn credentials_from_env(&self) -> Option<(String, String)> {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Some((read(&self.api_key_env)?, read(&self.api_secret_env)?))
    }
}

/// Fetches client-credentials tokens from the Amadeus token endpoint.
pub struct AmadeusTokenFetcher {
    client: reqwest::Client,
    token_url: url::Url,
    client_id: String,
    client_secret: String,
}

impl TokenFetcher for AmadeusTokenFetcher {
    async fn fetch_token(&self) -> Result<TokenGrant, SearchError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        let response = self
            .client
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| SearchError::Auth(format!("Amadeus token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Auth(format!(
                "Amadeus token endpoint returned {status}"
            )));
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|e| SearchError::Auth(format!("malformed Amadeus token response: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct HotelListResponse {
    #[serde(default)]
    data: Vec<HotelRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HotelRecord {
    hotel_id: Option<String>,
    name: Option<String>,
    geo_code: Option<GeoCode>,
}

#[derive(Debug, Deserialize)]
struct GeoCode {
    latitude: f64,
    longitude: f64,
}

/// Amadeus hotel list provider.
pub struct AmadeusProvider {
    client: reqwest::Client,
    config: AmadeusConfig,
    credentials: Option<CredentialProvider<AmadeusTokenFetcher>>,
}

impl AmadeusProvider {
    /// Build a provider with credentials read from the environment.
    ///
    /// Missing credentials are not an error here: the provider is built
    /// and every search it serves fails, so the other providers still
    /// answer.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an invalid configuration.
    pub fn from_env(config: AmadeusConfig, timeout: Duration) -> Result<Self, SearchError> {
        let credentials = config.credentials_from_env();
        if credentials.is_none() {
            tracing::warn!(
                key_env = %config.api_key_env,
                secret_env = %config.api_secret_env,
                "Amadeus API credentials not configured"
            );
        }
        Self::build(config, credentials, timeout)
    }

    /// Build a provider with explicit credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an invalid configuration.
    pub fn with_credentials(
        config: AmadeusConfig,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        Self::build(config, Some((client_id.into(), client_secret.into())), timeout)
    }

    fn build(
        config: AmadeusConfig,
        credentials: Option<(String, String)>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(timeout)?;
        let token_url = http::endpoint(&config.base_url, TOKEN_PATH)?;
        let credentials = credentials.map(|(client_id, client_secret)| {
            CredentialProvider::new(AmadeusTokenFetcher {
                client: client.clone(),
                token_url,
                client_id,
                client_secret,
            })
        });
        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    async fn fetch_hotels(
        &self,
        criteria: &SearchCriteria,
        credentials: &CredentialProvider<AmadeusTokenFetcher>,
    ) -> Result<Vec<Listing>, SearchError> {
        let city = criteria.city();
        let (lat, lon) = city_coordinates(city)
            .ok_or_else(|| SearchError::Provider(format!("city not supported yet: {city}")))?;

        let token = credentials.get_valid_token().await?;
        let url = http::endpoint(&self.config.base_url, HOTELS_BY_GEOCODE_PATH)?;
        let radius = self.config.radius_km.to_string();
        let (lat_param, lon_param) = (lat.to_string(), lon.to_string());

        let response = self
            .client
            .get(url)
            .bearer_auth(&token)
            .query(&[
                ("latitude", lat_param.as_str()),
                ("longitude", lon_param.as_str()),
                ("radius", radius.as_str()),
                ("radiusUnit", "KM"),
                ("hotelSource", "ALL"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Amadeus request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            credentials.invalidate().await;
            return Err(SearchError::Auth("Amadeus rejected the access token".into()));
        }
        if !status.is_success() {
            return Err(SearchError::Http(format!("Amadeus HTTP error: {status}")));
        }

        let body: HotelListResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(format!("malformed Amadeus hotel list: {e}")))?;

        tracing::debug!(count = body.data.len(), "Amadeus hotels received");
        Ok(map_hotels(body.data, city, self.config.max_hotels))
    }
}

/// Map hotel records to listings, skipping records without coordinates.
fn map_hotels(records: Vec<HotelRecord>, city: &str, max: usize) -> Vec<Listing> {
    records
        .into_iter()
        .filter_map(|record| {
            let geo = record.geo_code?;
            let name = record
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| format!("Hotel in {city}"));
            let mut listing = Listing::new(name, geo.latitude, geo.longitude)
                .with_source(ProviderKind::Amadeus.name());
            listing.id = record.hotel_id;
            Some(listing)
        })
        .take(max)
        .collect()
}

impl ListingProvider for AmadeusProvider {
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>, SearchError> {
        tracing::trace!(location = %criteria.location, "Amadeus search");
        let Some(credentials) = self.credentials.as_ref() else {
            return Err(SearchError::Config(
                "Amadeus API credentials not configured".into(),
            ));
        };
        self.fetch_hotels(criteria, credentials).await
    }
}
