//! Client configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! base_url = "http://127.0.0.1:8000"
//! lifecycle_path = "/sys/lifecycle"
//! ```
//!
//! Every key is optional and falls back to the backend's defaults.

use localbridge_core::routes;
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Where the backend listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Validated http(s) URL, without trailing slash.
    base_url: String,
    lifecycle_path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    lifecycle_path: Option<String>,
}

impl BridgeConfig {
    /// Configuration for a backend at `base_url`, with the default lifecycle path.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            lifecycle_path: routes::LIFECYCLE.to_string(),
        })
    }

    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        let mut config = Self::new(file.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        if let Some(path) = file.lifecycle_path {
            config.lifecycle_path = normalize_path(path);
        }
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Replace the base URL, keeping everything else.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn lifecycle_path(&self) -> &str {
        &self.lifecycle_path
    }

    /// Full URL for an HTTP endpoint path such as `/sys/info`.
    ///
    /// The path is appended to the base URL as-is.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}{}", self.base_url, path))
    }

    /// WebSocket URL of the lifecycle endpoint.
    pub fn lifecycle_url(&self) -> String {
        format!("{}{}", http_to_ws_scheme(&self.base_url), self.lifecycle_path)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            lifecycle_path: routes::LIFECYCLE.to_string(),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url.as_str().trim_end_matches('/').to_string()),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

fn normalize_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

/// Convert an HTTP(S) URL to the WS(S) scheme.
fn http_to_ws_scheme(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        url.to_string()
    }
}

/// Error loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("base URL must be http or https, got: {0}")]
    UnsupportedScheme(String),
}
