//! Service configuration.
//!
//! Loaded from a TOML file (see [`BounceConfig::default_config_path`]);
//! every section and field is optional and falls back to its default.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3001
//!
//! [search]
//! providers = ["amadeus", "booking", "vrbo", "airbnb"]
//! provider_timeout_seconds = 8
//!
//! [amadeus]
//! api_key_env = "AMADEUS_API_KEY"
//! api_secret_env = "AMADEUS_API_SECRET"
//!
//! [logging]
//! filter = "bounce=info,bounce_search=info"
//! ```

use bounce_search::SearchConfig;
use bounce_search::providers::AmadeusConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BounceError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Aggregation pipeline.
    pub search: SearchConfig,
    /// Amadeus provider.
    pub amadeus: AmadeusConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind. `0` picks a free port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3001,
        }
    }
}

impl ServerConfig {
    /// `host:port` as passed to the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Override the port from `API_PORT`, then `PORT`, as reported by
    /// `lookup`. Unparsable values are ignored.
    pub fn apply_port_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let port = ["API_PORT", "PORT"]
            .iter()
            .filter_map(|name| lookup(name))
            .find_map(|value| value.trim().parse::<u16>().ok());
        if let Some(port) = port {
            self.port = port;
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "bounce=info,bounce_search=info".to_owned(),
        }
    }
}

impl BounceConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| BounceError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| BounceError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/bounce/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("bounce").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("bounce")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/bounce-config/config.toml")
        }
    }

    /// Load `path` if given, else the default path if it exists, else defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file is missing, or if
    /// any file that is read cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Self::default_config_path();
                if default.is_file() {
                    Self::from_file(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(BounceError::Config("server.host must not be empty".into()));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(BounceError::Config("logging.filter must not be empty".into()));
        }
        self.search.validate()?;
        self.amadeus.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use bounce_search::ProviderKind;

    #[test]
    fn default_config_is_valid() {
        let config = BounceConfig::default();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:3001");
        assert_eq!(config.logging.filter, "bounce=info,bounce_search=info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config: BounceConfig = toml::from_str("").unwrap();
        assert_eq!(config, BounceConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_given_fields() {
        let toml_str = r#"
            [server]
            port = 8080

            [search]
            providers = ["demo", "vrbo"]
            cache_ttl_seconds = 0

            [search.weights]
            value = 2.0

            [amadeus]
            radius_km = 5
        "#;
        let config: BounceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.search.providers,
            vec![ProviderKind::Demo, ProviderKind::Vrbo]
        );
        assert!(!config.search.cache_enabled());
        assert_eq!(config.search.weights.value, 2.0);
        assert_eq!(config.search.weights.transit, 1.0);
        assert_eq!(config.amadeus.radius_km, 5);
        assert_eq!(config.amadeus.max_hotels, 25);
    }

    #[test]
    fn unknown_provider_rejected() {
        let result: std::result::Result<BounceConfig, _> =
            toml::from_str("[search]\nproviders = [\"expedia\"]\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_blank_host() {
        let mut config = BounceConfig::default();
        config.server.host = " ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn validate_surfaces_search_errors() {
        let mut config = BounceConfig::default();
        config.search.provider_timeout_seconds = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, BounceError::Search(_)));
        assert!(err.to_string().contains("provider_timeout_seconds"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = BounceConfig::default();
        config.server.port = 4000;
        config.search.providers = vec![ProviderKind::Demo];
        config.save_to_file(&path).unwrap();

        let loaded = BounceConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = BounceConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, BounceError::Io(_)));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        let err = BounceConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, BounceError::Config(_)));
    }

    #[test]
    fn default_path_ends_with_bounce_config() {
        let path = BounceConfig::default_config_path();
        assert!(path.ends_with("bounce/config.toml"));
    }

    #[test]
    fn port_env_prefers_api_port() {
        let mut server = ServerConfig::default();
        server.apply_port_env(|name| match name {
            "API_PORT" => Some("4100".into()),
            "PORT" => Some("4200".into()),
            _ => None,
        });
        assert_eq!(server.port, 4100);
    }

    #[test]
    fn port_env_falls_back_and_ignores_garbage() {
        let mut server = ServerConfig::default();
        server.apply_port_env(|name| match name {
            "API_PORT" => Some("not-a-port".into()),
            "PORT" => Some("4200".into()),
            _ => None,
        });
        assert_eq!(server.port, 4200);

        let mut untouched = ServerConfig::default();
        untouched.apply_port_env(|_| None);
        assert_eq!(untouched.port, 3001);
    }
}
