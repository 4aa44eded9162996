//! Persistent configuration model, defaults, and loading.

use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Error, Result};

const CONFIG_DIR_NAME: &str = "mentune";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Root configuration persisted to `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    #[serde(default)]
    /// Media catalog connection settings.
    pub catalog: CatalogConfig,
    #[serde(default)]
    /// Input size limits.
    pub input: InputConfig,
    #[serde(default)]
    /// Log output preferences.
    pub logging: LoggingConfig,
}

/// Catalog Web API endpoints and request pacing.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Client id for the client-credentials grant. The secret lives in the
    /// environment or the system keyring, never in this file.
    #[serde(default)]
    pub client_id: String,
    /// Optional ISO 3166-1 market code used to scope search results.
    #[serde(default)]
    pub market: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

/// Limits applied when reading text to scan.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct InputConfig {
    /// Maximum number of characters accepted from a file or stdin.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

/// Log verbosity persisted between runs.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, serde::Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token_url: default_token_url(),
            client_id: String::new(),
            market: String::new(),
            search_limit: default_search_limit(),
            requests_per_second: default_requests_per_second(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_token_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_search_limit() -> u32 {
    20
}

fn default_requests_per_second() -> u32 {
    5
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_read_timeout_secs() -> u64 {
    15
}

fn default_max_chars() -> usize {
    200_000
}

/// Clamps values that would make the catalog or reader unusable.
pub fn sanitize_config(config: Config) -> Config {
    let catalog = config.catalog;
    Config {
        catalog: CatalogConfig {
            api_base_url: catalog.api_base_url.trim().trim_end_matches('/').to_string(),
            token_url: catalog.token_url.trim().to_string(),
            client_id: catalog.client_id.trim().to_string(),
            market: catalog.market.trim().to_ascii_uppercase(),
            search_limit: catalog.search_limit.clamp(1, 50),
            requests_per_second: catalog.requests_per_second.clamp(1, 50),
            connect_timeout_secs: catalog.connect_timeout_secs.max(1),
            read_timeout_secs: catalog.read_timeout_secs.max(1),
        },
        input: InputConfig {
            max_chars: config.input.max_chars.max(1),
        },
        logging: config.logging,
    }
}

/// Default config location under the user's config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Parses and sanitizes a config document.
pub fn parse_config(content: &str) -> Result<Config> {
    let config = toml::from_str::<Config>(content)
        .map_err(|err| Error::config(format!("failed to parse config: {err}")))?;
    Ok(sanitize_config(config))
}

/// Loads the config at `path`, writing defaults there first when it is missing.
pub fn load_or_create(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!(
            "Config file not found. Creating default config. path={}",
            path.display()
        );
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string(&Config::default())
            .map_err(|err| Error::config(format!("failed to serialize default config: {err}")))?;
        std::fs::write(path, content)?;
    }
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}
