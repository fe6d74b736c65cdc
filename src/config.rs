//! Exporter configuration.
//!
//! Values come from built-in defaults, an optional TOML file, and command
//! line flags, in increasing order of precedence. The file format mirrors
//! [`ExporterConfig`]:
//!
//! ```toml
//! [nis]
//! address = "ups.local:3551"
//! timeout_secs = 10
//!
//! [web]
//! listen_address = "0.0.0.0:9191"
//! endpoint = "/metrics"
//! ```

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("NIS address must not be empty")]
    EmptyAddress,
    #[error("NIS timeout must be at least one second")]
    InvalidTimeout,
    #[error("invalid listen address {0:?}")]
    InvalidListenAddress(String),
    #[error("invalid metrics endpoint {0:?} (must start with '/' and not be /health)")]
    InvalidEndpoint(String),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Where and how to reach the apcupsd Network Information Server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NisConfig {
    /// `host:port` of the NIS.
    pub address: String,
    /// Connection and read timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NisConfig {
    fn default() -> Self {
        Self {
            address: "localhost:3551".to_owned(),
            timeout_secs: 30,
        }
    }
}

impl NisConfig {
    /// Returns the timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// HTTP exposition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// `host:port` to listen on for scrapes.
    pub listen_address: String,
    /// Path serving the metrics.
    pub endpoint: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:9191".to_owned(),
            endpoint: "/metrics".to_owned(),
        }
    }
}

impl WebConfig {
    /// Parses the listen address. A bare `:port` listens on all interfaces.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = match self.listen_address.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => self.listen_address.clone(),
        };
        addr.parse()
            .map_err(|_| ConfigError::InvalidListenAddress(self.listen_address.clone()))
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExporterConfig {
    /// NIS connection settings.
    #[serde(default)]
    pub nis: NisConfig,
    /// HTTP exposition settings.
    #[serde(default)]
    pub web: WebConfig,
}

impl ExporterConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ExporterConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nis.address.trim().is_empty() {
            return Err(ConfigError::EmptyAddress);
        }
        if self.nis.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        self.web.listen_addr()?;
        if !self.web.endpoint.starts_with('/') || self.web.endpoint == "/health" {
            return Err(ConfigError::InvalidEndpoint(self.web.endpoint.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ExporterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.nis.address, "localhost:3551");
        assert_eq!(config.nis.timeout(), Duration::from_secs(30));
        assert_eq!(config.web.listen_addr().unwrap().port(), 9191);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = ExporterConfig::from_toml("[nis]\naddress = \"ups.lan:3551\"\n").unwrap();
        assert_eq!(config.nis.address, "ups.lan:3551");
        assert_eq!(config.nis.timeout_secs, 30);
        assert_eq!(config.web.endpoint, "/metrics");
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = ExporterConfig::from_toml("").unwrap();
        assert_eq!(config.nis.address, NisConfig::default().address);
    }

    #[test]
    fn test_zero_timeout_invalid() {
        let mut config = ExporterConfig::default();
        config.nis.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimeout)));
    }

    #[test]
    fn test_bad_endpoint_invalid() {
        let mut config = ExporterConfig::default();
        config.web.endpoint = "metrics".to_owned();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint(_))
        ));
        config.web.endpoint = "/health".to_owned();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_bad_listen_address_invalid() {
        let mut config = ExporterConfig::default();
        config.web.listen_address = ":9100".to_owned();
        assert_eq!(config.web.listen_addr().unwrap().port(), 9100);

        config.web.listen_address = "localhost".to_owned();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidListenAddress(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            ExporterConfig::from_toml("[nis\naddress ="),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ExporterConfig::from_file("/nonexistent/apcupsd-exporter.toml"),
            Err(ConfigError::FileReadError(_))
        ));
    }
}
