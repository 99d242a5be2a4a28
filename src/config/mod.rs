//! Configuration management.
//!
//! Configuration is read from `~/.config/feedloom/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! The resulting [`Config`] is passed down explicitly; nothing reads global
//! settings.

pub mod interval;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::i18n::DEFAULT_LANGUAGE;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub proxy: ProxyConfig,
    pub poller: PollerConfig,
    pub locale: LocaleConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Proxy endpoint; the feed URL is passed in its `url` query parameter.
    pub base_url: String,
    pub disable_cache: bool,
    pub timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://allorigins.hexlet.app/get".to_string(),
            disable_cache: true,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    #[serde(rename = "interval", deserialize_with = "interval::deserialize")]
    pub interval_secs: u64,
    /// Poll immediately instead of waiting one interval.
    pub poll_on_start: bool,
    /// Maximum concurrent fetches.
    pub workers: usize,
    /// Upper bound on how many cycles a failing feed is skipped.
    pub max_backoff_cycles: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            poll_on_start: false,
            workers: 10,
            max_backoff_cycles: 8,
        }
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    pub language: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/feedloom/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("feedloom").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> &'static str {
        r##"# Feedloom Configuration

[proxy]
# CORS proxy endpoint. The feed URL is appended as the `url` query parameter.
# Responses may be the raw feed or a JSON object with a `contents` field.
base_url = "https://allorigins.hexlet.app/get"

# Ask the proxy not to serve cached copies
disable_cache = true

# Request timeout in seconds
timeout_secs = 10

[poller]
# How often every known feed is re-fetched ("5s", "1m", "1h", ...)
interval = "5s"

# Poll right away instead of waiting one interval
poll_on_start = false

# Maximum concurrent fetches
workers = 10

# A failing feed is skipped for a growing number of cycles, at most this many
max_backoff_cycles = 8

[locale]
# Interface language: "ru" or "en"
language = "ru"
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
