//! Configuration System
//!
//! Loads the terminal client's configuration from a TOML file and applies
//! environment variable overrides on top.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::ClientConfig;
use crate::live::LiveConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub live: LiveSettings,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analytics backend
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Push channel
#[derive(Debug, Clone, Deserialize)]
pub struct LiveSettings {
    #[serde(default = "default_live_enabled")]
    pub enabled: bool,

    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_live_enabled() -> bool {
    true
}

fn default_event_capacity() -> usize {
    64
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            enabled: default_live_enabled(),
            event_capacity: default_event_capacity(),
        }
    }
}

/// Token persistence
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Overrides the default `<data dir>/crowdwatch/auth_token`
    pub token_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Share responses between panels until the selection changes
    #[serde(default)]
    pub cache: bool,
}

fn default_page_size() -> u32 {
    10
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            cache: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "crowdwatch=info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// First readable file of the default locations, else defaults
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("crowdwatch").join("config.toml")),
            Some(PathBuf::from("/etc/crowdwatch/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    pub fn token_path(&self) -> Option<PathBuf> {
        self.session.token_path.as_ref().map(PathBuf::from)
    }

    pub fn live_config(&self) -> LiveConfig {
        LiveConfig {
            base_url: self.api.base_url.clone(),
            event_capacity: self.live.event_capacity,
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("CROWDWATCH_API_URL") {
            self.api.base_url = url;
        }
        if let Some(path) = var("CROWDWATCH_TOKEN_PATH") {
            self.session.token_path = Some(path);
        }
        if let Some(size) = var("CROWDWATCH_PAGE_SIZE") {
            match size.parse() {
                Ok(n) if n > 0 => self.dashboard.page_size = n,
                _ => tracing::warn!(value = %size, "Ignoring invalid CROWDWATCH_PAGE_SIZE"),
            }
        }
        if let Some(cache) = var("CROWDWATCH_CACHE") {
            self.dashboard.cache = matches!(cache.as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(level) = var("CROWDWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("CROWDWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# crowdwatch configuration
#
# Environment variables override these settings:
# - CROWDWATCH_API_URL
# - CROWDWATCH_TOKEN_PATH
# - CROWDWATCH_PAGE_SIZE
# - CROWDWATCH_CACHE
# - CROWDWATCH_LOG_LEVEL
# - CROWDWATCH_LOG_FORMAT

[api]
# Analytics backend; the push channel is served from the same host
base_url = "http://localhost:3000"

# Request timeout in milliseconds
request_timeout_ms = 10000

[live]
# Open the push channel for `watch`
enabled = true

# Events buffered per listener
event_capacity = 64

[session]
# Where the bearer token is kept (default: <data dir>/crowdwatch/auth_token)
# token_path = "/home/me/.local/share/crowdwatch/auth_token"

[dashboard]
# Visitor log rows per page
page_size = 10

# Reuse responses across panels until the site or date changes
cache = false

[logging]
# Filter directive: trace, debug, info, warn, error, or e.g. "crowdwatch=debug"
level = "crowdwatch=info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
