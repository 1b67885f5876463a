use std::path::Path;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://v3-exhibitor-live-update.onrender.com/api";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

const ENV_CONFIG_FILE: &str = "EXPO_CONFIG_FILE";
const ENV_BASE_URL: &str = "EXPO_API_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "EXPO_API_TIMEOUT_SECS";
const ENV_LOG_LEVEL: &str = "EXPO_LOG_LEVEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

/// Booth service connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Optional JSON file named by `EXPO_CONFIG_FILE`, then environment
    /// overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();
        let base = match non_blank(lookup(ENV_CONFIG_FILE)) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        base.with_overrides(lookup)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply `EXPO_*` overrides from `lookup`; blank values are ignored.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(base_url) = non_blank(lookup(ENV_BASE_URL)) {
            self.api.base_url = base_url;
        }
        if let Some(raw) = non_blank(lookup(ENV_TIMEOUT_SECS)) {
            self.api.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
        }
        if let Some(level) = non_blank(lookup(ENV_LOG_LEVEL)) {
            self.log_level = level;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url_ok = Url::parse(&self.api.base_url)
            .map(|url| !url.cannot_be_a_base())
            .unwrap_or(false);
        if !base_url_ok {
            return Err(ConfigError::InvalidValue {
                key: "api.base_url",
                value: self.api.base_url.clone(),
            });
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "api.timeout_secs",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
