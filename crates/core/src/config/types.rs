use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::facets::FacetLimits;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            provider: ProviderConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration (persistent client store)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("bibliofind.db")
}

/// Search provider configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Search backend type
    #[serde(default)]
    pub backend: ProviderBackend,
    /// Open Library configuration (used when backend = "open_library")
    #[serde(default)]
    pub open_library: OpenLibraryConfig,
}

/// Available search backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderBackend {
    #[default]
    OpenLibrary,
    // Future: GoogleBooks
}

/// Open Library backend configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OpenLibraryConfig {
    /// API base URL (e.g. "https://openlibrary.org")
    #[serde(default = "default_provider_url")]
    pub url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            url: default_provider_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_provider_url() -> String {
    "https://openlibrary.org".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Per-session behavior knobs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Debounce quiet interval in milliseconds (default: 300)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Suggestion list length (default: 10)
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub facets: FacetLimits,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            suggestion_limit: default_suggestion_limit(),
            cache: CacheConfig::default(),
            history: HistoryConfig::default(),
            analytics: AnalyticsConfig::default(),
            facets: FacetLimits::default(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_suggestion_limit() -> usize {
    10
}

/// Result cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Maximum live entries (default: 50)
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
    /// Entry time-to-live in seconds (default: 300)
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_cache_capacity() -> usize {
    50
}

fn default_cache_ttl_secs() -> u64 {
    300
}

/// History configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    /// Maximum retained entries (default: 50)
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

fn default_history_capacity() -> usize {
    50
}

/// Analytics configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsConfig {
    /// Trending window in hours (default: 24)
    #[serde(default = "default_trending_window_hours")]
    pub trending_window_hours: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            trending_window_hours: default_trending_window_hours(),
        }
    }
}

fn default_trending_window_hours() -> u64 {
    24
}

/// Config view for API responses (deployment paths omitted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub session: SessionConfig,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            provider: config.provider.clone(),
            session: config.session.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.debounce_ms, 300);
        assert_eq!(config.session.cache.capacity, 50);
        assert_eq!(config.session.cache.ttl_secs, 300);
        assert_eq!(config.session.history.capacity, 50);
        assert_eq!(config.session.analytics.trending_window_hours, 24);
        assert_eq!(config.provider.backend, ProviderBackend::OpenLibrary);
        assert_eq!(config.provider.open_library.url, "https://openlibrary.org");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.facets.genre_top, 20);
    }

    #[test]
    fn test_sanitized_config_omits_database() {
        let config = Config::default();
        let sanitized = SanitizedConfig::from(&config);
        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("bibliofind.db"));
        assert!(json.contains("open_library"));
    }
}
