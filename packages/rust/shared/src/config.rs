//! Application configuration for cnsearch.
//!
//! Config is loaded from a TOML file (path supplied by the server binary);
//! CLI flags and environment variables override file values, which override
//! defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CnSearchError, Result};

// ---------------------------------------------------------------------------
// Config structs (matching cnsearch.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Index store settings.
    #[serde(default)]
    pub index: IndexConfig,

    /// Web discovery settings.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Crawl pipeline settings.
    #[serde(default)]
    pub crawl: CrawlConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// `[index]` section — the external full-text index store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Base URL of the index store service.
    #[serde(default = "default_index_url")]
    pub url: String,

    /// Name of the index holding company records.
    #[serde(default = "default_index_name")]
    pub name: String,

    /// Timeout for index store requests in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            name: default_index_name(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_index_url() -> String {
    "http://127.0.0.1:9200".into()
}
fn default_index_name() -> String {
    "companies".into()
}
fn default_timeout_secs() -> u64 {
    10
}

/// `[discovery]` section — the public web search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Search endpoint issuing HTML result pages.
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Result language hint passed to the engine.
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Timeout for search requests in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            lang: default_lang(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_search_endpoint() -> String {
    "https://www.google.com/search".into()
}
fn default_lang() -> String {
    "en".into()
}

/// `[crawl]` section — page-fetch behavior of the crawl pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Whether unresolved queries may fall back to discovery + crawling.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Per-fetch timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// `[server]` section — HTTP boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// API keys accepted by the `/search` endpoint.
    #[serde(default)]
    pub api_keys: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_keys: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    5000
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CnSearchError::config(format!("failed to read {}: {e}", path.display()))
    })?;

    toml::from_str(&content).map_err(|e| {
        CnSearchError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Load config from `path` if given, otherwise fall back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(p) => load_config_from(p),
        None => {
            tracing::debug!("no config file given, using defaults");
            Ok(AppConfig::default())
        }
    }
}
