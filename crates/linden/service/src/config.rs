//! Configuration for the RPC service.

use crate::error::{ServiceError, ServiceResult};
use linden_routing::PathStrategy;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Routing configuration
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".parse().expect("static addr"),
            enable_cors: true,
        }
    }
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Path resolution strategy: `"queries|mutations"` or `"root"`. The
    /// custom strategy is injected in code, not selected here.
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
        }
    }
}

impl RoutingConfig {
    /// Resolve the configured strategy name.
    pub fn path_strategy(&self) -> ServiceResult<PathStrategy> {
        match self.strategy.as_str() {
            "queries|mutations" => Ok(PathStrategy::QueriesMutations),
            "root" => Ok(PathStrategy::Root),
            other => Err(ServiceError::Config(format!(
                "Unknown path strategy: {}",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_strategy() -> String {
    "queries|mutations".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServiceConfig {
    /// Load configuration: defaults, then an optional file, then `LINDEN_*`
    /// environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&ServiceConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Double-underscore nesting so keys like `listen_addr` stay intact:
        // LINDEN_SERVER__LISTEN_ADDR -> server.listen_addr.
        builder = builder.add_source(
            config::Environment::with_prefix("LINDEN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.listen_addr.port(), 8080);
        assert!(config.server.enable_cors);
        assert_eq!(config.routing.strategy, "queries|mutations");
    }

    #[test]
    fn test_strategy_parsing() {
        let config = RoutingConfig {
            strategy: "root".to_string(),
        };
        assert!(matches!(
            config.path_strategy().unwrap(),
            PathStrategy::Root
        ));

        let config = RoutingConfig {
            strategy: "nearest-dir".to_string(),
        };
        assert!(config.path_strategy().is_err());
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        std::env::set_var("LINDEN_SERVER__LISTEN_ADDR", "127.0.0.1:9911");
        std::env::set_var("LINDEN_ROUTING__STRATEGY", "root");

        let config = ServiceConfig::load(None).unwrap();

        std::env::remove_var("LINDEN_SERVER__LISTEN_ADDR");
        std::env::remove_var("LINDEN_ROUTING__STRATEGY");

        assert_eq!(config.server.listen_addr.port(), 9911);
        assert_eq!(config.routing.strategy, "root");
    }

    #[test]
    fn test_default_strategy_is_queries_mutations() {
        let config = RoutingConfig::default();
        assert!(matches!(
            config.path_strategy().unwrap(),
            PathStrategy::QueriesMutations
        ));
    }
}
