//! Configuration for the HTTP remote store.

use std::env;
use std::time::Duration;
use url::Url;

/// Environment variable holding the remote base URL.
pub const REMOTE_URL_VAR: &str = "CONFERENCE_REMOTE_URL";

/// Environment variable holding the per-request timeout in milliseconds.
pub const REMOTE_TIMEOUT_VAR: &str = "CONFERENCE_REMOTE_TIMEOUT_MS";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP remote configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the remote, always ending in `/`
    pub base_url: Url,
    /// Timeout applied to each request
    pub timeout: Duration,
}

impl Config {
    /// Create a configuration for `base_url` with the default timeout.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ConfigError::InvalidRemoteUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidRemoteUrl(format!(
                "'{}' cannot be used as a base URL",
                base_url
            )));
        }

        // Relative joins would otherwise replace the last path segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load a `.env` file if present, then read the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(REMOTE_URL_VAR).ok_or(ConfigError::MissingRemoteUrl)?;
        let config = Self::new(&base_url)?;

        let timeout = match lookup(REMOTE_TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(config.with_timeout(timeout))
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("CONFERENCE_REMOTE_URL environment variable is required")]
    MissingRemoteUrl,

    #[error("Invalid remote URL: {0}")]
    InvalidRemoteUrl(String),

    #[error("Invalid CONFERENCE_REMOTE_TIMEOUT_MS value: {0}")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_vars(vars(&[(REMOTE_URL_VAR, "http://localhost:8282")])).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8282/");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn custom_timeout() {
        let config = Config::from_vars(vars(&[
            (REMOTE_URL_VAR, "http://localhost:8282"),
            (REMOTE_TIMEOUT_VAR, "2500"),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn missing_url() {
        let result = Config::from_vars(vars(&[]));
        assert_eq!(result, Err(ConfigError::MissingRemoteUrl));
    }

    #[test]
    fn invalid_url() {
        let result = Config::from_vars(vars(&[(REMOTE_URL_VAR, "not a url")]));
        assert!(matches!(result, Err(ConfigError::InvalidRemoteUrl(_))));

        let result = Config::new("mailto:someone@example.com");
        assert!(matches!(result, Err(ConfigError::InvalidRemoteUrl(_))));
    }

    #[test]
    fn invalid_timeout() {
        for raw in ["soon", "-5", "0"] {
            let result = Config::from_vars(vars(&[
                (REMOTE_URL_VAR, "http://localhost:8282"),
                (REMOTE_TIMEOUT_VAR, raw),
            ]));
            assert_eq!(result, Err(ConfigError::InvalidTimeout(raw.to_string())));
        }
    }

    #[test]
    fn base_path_is_kept() {
        let config = Config::new("https://example.com/api").unwrap();
        assert_eq!(config.base_url.as_str(), "https://example.com/api/");

        let joined = config.base_url.join("v1/questions").unwrap();
        assert_eq!(joined.as_str(), "https://example.com/api/v1/questions");
    }
}
