use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::Deserialize;

use crate::{error::ConfigError, feed_utils::FeedKey, trending_window::Cadence};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "trending.toml";
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "github-trending-feed";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Read-only settings handed to the fetcher. Sources, weakest first:
/// the toml file, then `GH_API_KEY` / `GH_API_USER_AGENT`, then cli flags.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_base_url: String,
    pub user_agent: String,
    pub token: Option<String>,
    pub languages: Vec<String>,
    pub cadence: Cadence,
    pub cache_ttl_secs: u64,
    /// Take day boundaries in UTC instead of the local time zone.
    pub utc: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            token: None,
            languages: Vec::new(),
            cadence: Cadence::default(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            utc: false,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given (it must exist), otherwise `trending.toml` if
    /// present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Config::default());
                }
                default
            }
        };
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Applies `GH_API_KEY` and `GH_API_USER_AGENT` from the process environment
    /// (and `.env`, once `dotenv` has run).
    pub fn with_env(self) -> Self {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("GH_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.token = Some(token);
        }
        if let Some(user_agent) = lookup("GH_API_USER_AGENT").filter(|v| !v.trim().is_empty()) {
            self.user_agent = user_agent;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_base_url must be an http(s) url, got `{}`",
                self.api_base_url
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("user_agent can't be empty".to_owned()));
        }
        if i64::try_from(self.cache_ttl_secs).is_err() {
            return Err(ConfigError::Invalid("cache_ttl_secs is too large".to_owned()));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> TimeDelta {
        TimeDelta::try_seconds(i64::try_from(self.cache_ttl_secs).unwrap_or(i64::MAX))
            .unwrap_or(TimeDelta::MAX)
    }

    pub fn feed_key(&self) -> FeedKey {
        FeedKey::new(&self.languages, self.cadence)
    }
}
