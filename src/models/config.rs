//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Static list of well-known tag slugs
    #[serde(default = "defaults::tags")]
    pub tags: Vec<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.client.validate()?;
        if self.tags.iter().all(|t| t.trim().is_empty()) {
            return Err(AppError::validation("No tags defined"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            logging: LoggingConfig::default(),
            tags: defaults::tags(),
        }
    }
}

/// HTTP client settings. Fixed once a client is built from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Site root, without trailing slash
    #[serde(default = "defaults::root_url")]
    pub root_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept header
    #[serde(default = "defaults::accept")]
    pub accept: String,

    /// Accept-Language header
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Total request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Optional proxy, e.g. "http://127.0.0.1:7890" or "socks5://..."
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

impl ClientConfig {
    /// Site root with any trailing slash removed.
    pub fn root(&self) -> &str {
        self.root_url.trim_end_matches('/')
    }

    /// Validate client settings.
    pub fn validate(&self) -> Result<()> {
        let root = Url::parse(&self.root_url)?;
        if !matches!(root.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "client.root_url must be http(s): {}",
                self.root_url
            )));
        }
        // Detail and card URLs are both built from the bare origin.
        if root.path() != "/" || root.query().is_some() || root.fragment().is_some() {
            return Err(AppError::validation(format!(
                "client.root_url must not carry a path or query: {}",
                self.root_url
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(AppError::validation("client.user_agent is empty"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::validation("client.timeout_secs must be > 0"));
        }
        if let Some(proxy) = &self.proxy {
            Url::parse(proxy)
                .map_err(|e| AppError::validation(format!("client.proxy '{proxy}': {e}")))?;
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            root_url: defaults::root_url(),
            user_agent: defaults::user_agent(),
            accept: defaults::accept(),
            accept_language: defaults::accept_language(),
            timeout_secs: defaults::timeout(),
            proxy: None,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Client defaults
    pub fn root_url() -> String {
        "https://3dporndude.com".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .into()
    }
    pub fn accept() -> String {
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8"
            .into()
    }
    pub fn accept_language() -> String {
        "en-US,en;q=0.9".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }

    // Tag defaults
    pub fn tags() -> Vec<String> {
        [
            "futanari-hentai",
            "tentacles",
            "hardcore",
            "rough",
            "pov",
            "big-tits",
            "blowjob",
            "anal",
            "creampie",
            "milf",
            "teen",
            "lesbian",
            "threesome",
            "gangbang",
            "bbc",
            "deepthroat",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}
