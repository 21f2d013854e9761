//! Configuration module for gh-feed.
//!
//! This module handles parsing configuration from environment variables.
//! Command-line flags override individual fields after loading.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `GITHUB_TOKEN` | No | - | Token sent as `Authorization: token …` |
//! | `GH_FEED_API_URL` | No | `https://api.github.com` | API base URL |
//! | `GH_FEED_CACHE_DIR` | No | `<cache dir>/gh-feed` | Cache directory |
//! | `GH_FEED_CACHE_TTL_SECS` | No | 300 | Cache freshness window |
//! | `GH_FEED_EXPORT_PATH` | No | `activity.json` | JSON export destination |
//! | `GH_FEED_TIMEOUT_SECS` | No | 30 | HTTP request timeout |
//!
//! `NO_COLOR` is read by [`crate::theme::Theme::from_env`].
//!
//! # Example
//!
//! ```no_run
//! use gh_feed::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("API: {}", config.api_url);
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;
use thiserror::Error;

use crate::cache::DEFAULT_TTL_SECS;
use crate::export::DEFAULT_EXPORT_PATH;
use crate::github::DEFAULT_API_URL;

/// Default HTTP request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Cache directory name under the user cache directory.
const CACHE_DIR_NAME: &str = "gh-feed";

/// Cache directory used when no user cache directory exists.
const FALLBACK_CACHE_DIR: &str = ".gh_feed_cache";

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Configuration for gh-feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// GitHub token, if any.
    pub token: Option<String>,

    /// API base URL without trailing slash.
    pub api_url: String,

    /// Directory holding per-user cache files.
    pub cache_dir: PathBuf,

    /// How long a cache entry stays fresh.
    pub cache_ttl: Duration,

    /// Where `--json` writes the export.
    pub export_path: PathBuf,

    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - `GH_FEED_API_URL` is not an `http://` or `https://` URL
    /// - `GH_FEED_CACHE_TTL_SECS` or `GH_FEED_TIMEOUT_SECS` is not a positive integer
    pub fn from_env() -> Result<Self, ConfigError> {
        // Optional: GITHUB_TOKEN (blank counts as unset)
        let token = env::var("GITHUB_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        // Optional: GH_FEED_API_URL (default: https://api.github.com)
        let api_url = match env::var("GH_FEED_API_URL") {
            Ok(val) => {
                let url = val.trim().trim_end_matches('/').to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidValue {
                        key: "GH_FEED_API_URL".to_string(),
                        message: format!("expected http:// or https:// URL, got '{val}'"),
                    });
                }
                url
            }
            Err(_) => DEFAULT_API_URL.to_string(),
        };

        // Optional: GH_FEED_CACHE_DIR (default: user cache dir)
        let cache_dir = env::var("GH_FEED_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_cache_dir());

        // Optional: GH_FEED_CACHE_TTL_SECS (default: 300, must be > 0)
        let cache_ttl = Duration::from_secs(positive_secs(
            "GH_FEED_CACHE_TTL_SECS",
            DEFAULT_TTL_SECS,
        )?);

        // Optional: GH_FEED_EXPORT_PATH (default: ./activity.json)
        let export_path = env::var("GH_FEED_EXPORT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_EXPORT_PATH));

        // Optional: GH_FEED_TIMEOUT_SECS (default: 30, must be > 0)
        let timeout = Duration::from_secs(positive_secs(
            "GH_FEED_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?);

        Ok(Self {
            token,
            api_url,
            cache_dir,
            cache_ttl,
            export_path,
            timeout,
        })
    }
}

/// Parses `key` as a positive number of seconds, or returns `default`.
fn positive_secs(key: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(val) => {
            let secs = val.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("expected positive integer, got '{val}'"),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "value must be greater than 0".to_string(),
                });
            }
            Ok(secs)
        }
        Err(_) => Ok(default),
    }
}

/// `<user cache dir>/gh-feed`, or `.gh_feed_cache` in the working directory.
fn default_cache_dir() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.cache_dir().join(CACHE_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR))
}
