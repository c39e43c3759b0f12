//! Layered configuration.
//!
//! Settings merge from `weft.toml` and `WEFT_`-prefixed environment
//! variables (double-underscore section separator, e.g.
//! `WEFT_SERVER__PORT=9000`), environment winning.

use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolver::ResolverOptions;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration could not be loaded or parsed.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// Configuration loaded but failed validation.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration for a Weft deployment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WeftConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Graph store backend selection.
    pub graph: GraphConfig,
    /// Blob fetch settings.
    pub blob: BlobConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Which graph store implementation backs the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphBackend {
    /// In-process store; components are registered through the publish API.
    Memory,
    /// Remote closure RPC endpoint.
    Http,
}

/// Graph store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Backend selection.
    pub backend: GraphBackend,
    /// Base URL of the remote store (required for the `http` backend).
    pub url: Option<String>,
    /// API key sent to the remote store.
    pub api_key: Option<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            backend: GraphBackend::Memory,
            url: None,
            api_key: None,
        }
    }
}

/// Blob fetch settings.
///
/// Both knobs default to off, reproducing the unbounded, deadline-free fetch
/// fan-out of the original contract.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BlobConfig {
    /// Per-fetch deadline in seconds.
    pub fetch_timeout_secs: Option<u64>,
    /// Upper bound on concurrently in-flight fetches.
    pub max_concurrent_fetches: Option<usize>,
}

impl BlobConfig {
    /// Converts these settings into resolver fetch options.
    #[must_use]
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            max_concurrent_fetches: self.max_concurrent_fetches,
            fetch_timeout: self.fetch_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl WeftConfig {
    /// Loads configuration from `weft.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("weft.toml")
    }

    /// Loads configuration from the given TOML file and the environment.
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction or validation fails.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("WEFT_").split("__"))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".to_string()));
        }
        if self.graph.backend == GraphBackend::Http && self.graph.url.is_none() {
            return Err(ConfigError::Invalid(
                "graph.url is required when graph.backend = \"http\"".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    #[serial]
    fn test_defaults() {
        let config = WeftConfig::load_from("/nonexistent/weft.toml").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.graph.backend, GraphBackend::Memory);
        assert!(config.blob.fetch_timeout_secs.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    #[serial]
    fn test_toml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[server]\nport = 3000\n\n[graph]\nbackend = \"http\"\nurl = \"https://graph.weft.dev\"\n\n[blob]\nmax_concurrent_fetches = 16"
        )
        .unwrap();

        let config = WeftConfig::load_from(file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.graph.backend, GraphBackend::Http);
        assert_eq!(config.blob.max_concurrent_fetches, Some(16));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        std::env::set_var("WEFT_SERVER__PORT", "9000");

        let config = WeftConfig::load_from("/nonexistent/weft.toml").unwrap();
        assert_eq!(config.server.port, 9000);

        std::env::remove_var("WEFT_SERVER__PORT");
    }

    #[test]
    #[serial]
    fn test_http_backend_requires_url() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[graph]\nbackend = \"http\"").unwrap();

        let err = WeftConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("graph.url"));
    }

    #[test]
    #[serial]
    fn test_resolver_options_conversion() {
        let blob = BlobConfig {
            fetch_timeout_secs: Some(5),
            max_concurrent_fetches: Some(8),
        };
        let options = blob.resolver_options();
        assert_eq!(options.max_concurrent_fetches, Some(8));
        assert_eq!(options.fetch_timeout, Some(Duration::from_secs(5)));
    }
}
