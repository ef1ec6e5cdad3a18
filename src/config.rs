//! Configuration management for route-gate.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Args;
use crate::gate::GateOptions;
use crate::route::{RoutePath, RouteTable};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gate timing and fallback.
    pub gate: GateSection,
    /// Landing routes per onboarding stage.
    pub routes: RouteTable,
    /// Persisted session location.
    pub session: SessionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Gate configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateSection {
    /// Minimum splash hold with a valid session, in milliseconds.
    pub valid_delay_ms: u64,
    /// Minimum splash hold otherwise, in milliseconds.
    pub invalid_delay_ms: u64,
    /// Destination when the session is invalid or resolution fails.
    ///
    /// Unset means `routes.welcome`. When set, it also replaces
    /// `routes.welcome` so the two never disagree.
    pub fallback_route: Option<String>,
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            valid_delay_ms: 1500,
            invalid_delay_ms: 2000,
            fallback_route: None,
        }
    }
}

/// Session storage section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Path of the persisted session JSON file.
    pub path: PathBuf,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("session.json"),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level for route-gate (error, warn, info, debug, trace).
    ///
    /// Unset leaves filtering to `RUST_LOG`.
    pub level: Option<String>,
}

fn env_millis(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Some(ms) = env_millis("ROUTE_GATE_VALID_DELAY_MS") {
            self.gate.valid_delay_ms = ms;
        }

        if let Some(ms) = env_millis("ROUTE_GATE_INVALID_DELAY_MS") {
            self.gate.invalid_delay_ms = ms;
        }

        if let Ok(route) = std::env::var("ROUTE_GATE_FALLBACK_ROUTE") {
            if !route.is_empty() {
                self.gate.fallback_route = Some(route);
            }
        }

        if let Ok(path) = std::env::var("ROUTE_GATE_SESSION_FILE") {
            if !path.is_empty() {
                self.session.path = PathBuf::from(path);
            }
        }

        // RUST_LOG is left to the subscriber as a full filter
        if let Ok(level) = std::env::var("ROUTE_GATE_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = Some(level);
            }
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ms) = args.valid_delay_ms {
            self.gate.valid_delay_ms = ms;
        }

        if let Some(ms) = args.invalid_delay_ms {
            self.gate.invalid_delay_ms = ms;
        }

        if let Some(ref route) = args.fallback_route {
            self.gate.fallback_route = Some(route.clone());
        }

        if let Some(ref path) = args.session {
            self.session.path = path.clone();
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = Some(level.clone());
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// The validated fallback route, defaulting to `routes.welcome`.
    pub fn fallback_route(&self) -> Result<RoutePath, ConfigError> {
        match self.gate.fallback_route {
            Some(ref route) => {
                RoutePath::new(route.as_str()).map_err(|_| ConfigError::InvalidRoute(route.clone()))
            }
            None => Ok(self.routes.welcome.clone()),
        }
    }

    /// Convert to validated gate options.
    pub fn to_options(&self) -> Result<GateOptions, ConfigError> {
        Ok(GateOptions {
            valid_delay: Duration::from_millis(self.gate.valid_delay_ms),
            invalid_delay: Duration::from_millis(self.gate.invalid_delay_ms),
            fallback_route: self.fallback_route()?,
        })
    }

    /// Landing routes with the welcome route pinned to the fallback route.
    pub fn route_table(&self) -> Result<RouteTable, ConfigError> {
        Ok(self.routes.clone().with_welcome(self.fallback_route()?))
    }

    /// Get the configured log level, if any.
    pub fn log_filter(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
    /// Fallback route without a leading `/`.
    #[error("invalid fallback route: {0}")]
    InvalidRoute(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteResolver;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gate.valid_delay_ms, 1500);
        assert_eq!(config.gate.invalid_delay_ms, 2000);
        assert!(config.gate.fallback_route.is_none());
        assert_eq!(config.fallback_route().unwrap().as_str(), "/welcome");
        assert_eq!(config.routes.home.as_str(), "/home");
        assert!(config.log_filter().is_none());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "gate": {
                "valid_delay_ms": 500,
                "invalid_delay_ms": 800,
                "fallback_route": "/login"
            },
            "routes": {
                "home": "/dashboard"
            },
            "session": {
                "path": "/var/lib/app/session.json"
            }
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.gate.valid_delay_ms, 500);
        assert_eq!(config.gate.invalid_delay_ms, 800);
        assert_eq!(config.routes.home.as_str(), "/dashboard");
        assert_eq!(config.routes.welcome.as_str(), "/welcome");
        assert_eq!(
            config.session.path,
            PathBuf::from("/var/lib/app/session.json")
        );

        let options = config.to_options().unwrap();
        assert_eq!(options.valid_delay, Duration::from_millis(500));
        assert_eq!(options.fallback_route.as_str(), "/login");
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{ "gate": { "valid_delay_ms": 900 } }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.gate.valid_delay_ms, 900);
        assert_eq!(config.gate.invalid_delay_ms, 2000); // Default
    }

    #[test]
    fn test_config_bad_route_in_table() {
        let json = r#"{ "routes": { "home": "dashboard" } }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        let args = Args {
            valid_delay_ms: Some(100),
            invalid_delay_ms: Some(200),
            fallback_route: Some("/start".to_string()),
            session: Some(PathBuf::from("/tmp/s.json")),
            log_level: Some("debug".to_string()),
            ..Args::default()
        };

        config.apply_args(&args);

        assert_eq!(config.gate.valid_delay_ms, 100);
        assert_eq!(config.gate.invalid_delay_ms, 200);
        assert_eq!(config.gate.fallback_route.as_deref(), Some("/start"));
        assert_eq!(config.session.path, PathBuf::from("/tmp/s.json"));
        assert_eq!(config.log_filter(), Some("debug"));
    }

    #[test]
    fn test_apply_args_keeps_unset_values() {
        let mut config = Config::default();
        config.apply_args(&Args::default());
        assert_eq!(config.gate.valid_delay_ms, 1500);
        assert!(config.gate.fallback_route.is_none());
    }

    #[test]
    fn test_invalid_fallback_route() {
        let mut config = Config::default();
        config.gate.fallback_route = Some("welcome".to_string());

        assert!(matches!(
            config.to_options(),
            Err(ConfigError::InvalidRoute(_))
        ));
    }

    #[test]
    fn test_fallback_route_pins_table_welcome() {
        let mut config = Config::default();
        config.gate.fallback_route = Some("/login".to_string());

        let options = config.to_options().unwrap();
        let table = config.route_table().unwrap();
        assert_eq!(options.fallback_route.as_str(), "/login");
        assert_eq!(table.welcome, options.fallback_route);
        assert_eq!(table.next_route(None).as_str(), "/login");
    }

    #[test]
    fn test_table_welcome_is_default_fallback() {
        let json = r#"{ "routes": { "welcome": "/intro" } }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        let options = config.to_options().unwrap();
        assert_eq!(options.fallback_route.as_str(), "/intro");
        assert_eq!(config.route_table().unwrap().welcome.as_str(), "/intro");
    }

    #[test]
    fn test_rust_log_is_not_folded_into_level() {
        std::env::set_var("RUST_LOG", "debug");
        let mut config = Config::default();
        config.apply_env();
        std::env::remove_var("RUST_LOG");

        assert!(config.log_filter().is_none());
    }

    #[test]
    fn test_missing_config_file() {
        let args = Args {
            config: Some(PathBuf::from("/nonexistent/route-gate.json")),
            ..Args::default()
        };
        assert!(matches!(Config::load(&args), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"valid_delay_ms\""));
        assert!(json.contains("\"/welcome\""));
    }
}
