//! Configuration management
//!
//! Loads configuration from config.toml at startup. All bounds and
//! windows are configurable to avoid hardcoded constants; zero values
//! are rejected at load time so the components can assume well-formed
//! inputs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Service configuration
///
/// Loaded from config.toml at startup. Missing file means defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Result cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Rate limiter settings
    #[serde(default)]
    pub limiter: LimiterConfig,

    /// Resource pool settings
    #[serde(default)]
    pub pool: PoolConfig,

    /// Status API server settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// Result cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Maximum cached entries
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Entry lifetime in seconds
    #[serde(default = "default_cache_ttl_seconds")]
    pub ttl_seconds: u64,
}

/// Rate limiter configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimiterConfig {
    /// Admissions per identity per window
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,

    /// Sliding window length in seconds
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

/// Resource pool configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolConfig {
    /// Maximum handles retained on release
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

/// Status API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Port for the HTTP status server
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_seconds: default_cache_ttl_seconds(),
        }
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_seconds: default_window_seconds(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
        }
    }
}

fn default_cache_capacity() -> usize {
    1000
}

fn default_cache_ttl_seconds() -> u64 {
    300 // 5 minutes
}

fn default_max_requests() -> usize {
    100
}

fn default_window_seconds() -> u64 {
    60
}

fn default_max_connections() -> usize {
    20
}

fn default_api_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from config.toml file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// # Errors
    /// Returns error if the file exists but cannot be parsed, or if
    /// any bound or window is zero.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

        let config = match std::fs::read_to_string(&config_path) {
            Ok(contents) => toml::from_str::<Config>(&contents)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => return Err(ConfigError::IoError(e)),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the components cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.capacity == 0 {
            return Err(ConfigError::Invalid("cache.capacity must be > 0".into()));
        }
        if self.cache.ttl_seconds == 0 {
            return Err(ConfigError::Invalid("cache.ttl_seconds must be > 0".into()));
        }
        if self.limiter.max_requests == 0 {
            return Err(ConfigError::Invalid(
                "limiter.max_requests must be > 0".into(),
            ));
        }
        if self.limiter.window_seconds == 0 {
            return Err(ConfigError::Invalid(
                "limiter.window_seconds must be > 0".into(),
            ));
        }
        if self.pool.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "pool.max_connections must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Cache entry lifetime as a Duration
    #[inline]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_seconds)
    }

    /// Rate limit window as a Duration
    #[inline]
    pub fn limiter_window(&self) -> Duration {
        Duration::from_secs(self.limiter.window_seconds)
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading file
    IoError(std::io::Error),
    /// Parse error (invalid TOML)
    ParseError(String),
    /// Well-formed file with unusable values
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::ParseError(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::ParseError(_) | ConfigError::Invalid(_) => None,
        }
    }
}
