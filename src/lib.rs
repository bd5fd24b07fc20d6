//! Bounce: travel search service.
//!
//! Accepts destination, date and guest criteria over HTTP, fans them out
//! to every configured hotel provider through [`bounce_search`] and
//! answers with the three best listings as highlights plus the rest.

pub mod config;
pub mod error;
pub mod server;

pub use config::BounceConfig;
pub use error::{BounceError, Result};
pub use server::SearchServer;

use bounce_search::Aggregator;

/// Build the shared aggregator described by `config`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn build_aggregator(config: &BounceConfig) -> Result<Aggregator> {
    config.validate()?;
    Ok(Aggregator::from_config(&config.search, &config.amadeus)?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use bounce_search::ProviderKind;

    #[test]
    fn default_config_builds_default_providers() {
        let aggregator = build_aggregator(&BounceConfig::default()).unwrap();
        assert_eq!(
            aggregator.provider_labels(),
            ["amadeus", "booking", "vrbo", "airbnb"]
        );
    }

    #[test]
    fn configured_provider_subset() {
        let mut config = BounceConfig::default();
        config.search.providers = vec![ProviderKind::Demo];
        let aggregator = build_aggregator(&config).unwrap();
        assert_eq!(aggregator.provider_labels(), ["demo"]);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = BounceConfig::default();
        config.logging.filter = String::new();
        assert!(matches!(
            build_aggregator(&config),
            Err(BounceError::Config(_))
        ));
    }
}
