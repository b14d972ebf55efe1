//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_TOKEN_FILE: &str = ".vidhost/session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix applied to every API path, without a trailing slash.
    pub base_url: String,
    /// File backing the persisted token store.
    pub token_file: PathBuf,
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            timeouts: Timeouts::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `VIDHOST_BASE_URL`: default `http://127.0.0.1:5000/api`
    /// - `VIDHOST_TOKEN_FILE`: default `.vidhost/session.json`
    /// - `VIDHOST_REQUEST_TIMEOUT_SECS`: default 120
    /// - `VIDHOST_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout is not a positive integer or the base URL
    /// is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(
            &std::env::var("VIDHOST_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
        )?;
        let token_file = std::env::var("VIDHOST_TOKEN_FILE")
            .map_or_else(|_| PathBuf::from(DEFAULT_TOKEN_FILE), PathBuf::from);
        let timeouts = Timeouts {
            request_secs: env_parse_secs("VIDHOST_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_secs("VIDHOST_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { base_url, token_file, timeouts })
    }
}

/// Trim trailing slashes and reject anything that is not http(s).
///
/// # Errors
///
/// Returns an error for an empty or non-http(s) URL.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Parse(format!("base URL must start with http:// or https://: '{raw}'")));
    }
    Ok(trimmed.to_owned())
}

fn env_parse_secs(key: &str, default: u64) -> Result<u64, ConfigError> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::Parse(format!("{key} must be a positive integer, got '{raw}'"))),
        Ok(secs) => Ok(secs),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
