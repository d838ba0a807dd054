//! Runtime configuration sourced from the environment (and an optional `.env` file).

use crate::error::{AppError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.nasa.gov";
/// NASA's shared, heavily rate-limited key.
pub const DEMO_API_KEY: &str = "DEMO_KEY";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const ENV_API_KEY: &str = "NASA_API_KEY";
const ENV_BASE_URL: &str = "NASA_API_BASE_URL";
const ENV_TIMEOUT: &str = "NASA_HTTP_TIMEOUT_SECS";
const ENV_LOG_DIR: &str = "NASA_LOG_DIR";

/// Settings needed to talk to the NASA API.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    /// Directory for the rolling log file, if file logging is enabled.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Loads `.env` (if present) and reads configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(ENV_API_KEY).unwrap_or_else(|| DEMO_API_KEY.to_string());

        let base_url = get(ENV_BASE_URL)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match get(ENV_TIMEOUT) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(AppError::Config(format!(
                        "{} must be a positive integer number of seconds, got '{}'",
                        ENV_TIMEOUT, raw
                    )))
                },
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            log_dir: get(ENV_LOG_DIR).map(PathBuf::from),
        })
    }

    /// Replaces the API key (e.g. from a `--api-key` flag). Blank keys are ignored.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
            self.api_key = key;
        }
        self
    }

    pub fn is_demo_key(&self) -> bool {
        self.api_key == DEMO_API_KEY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_key, DEMO_API_KEY);
        assert!(config.is_demo_key());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_blank_key_falls_back_to_demo_key() {
        let config = Config::from_lookup(lookup_from(&[("NASA_API_KEY", "   ")])).unwrap();
        assert!(config.is_demo_key());
    }

    #[test]
    fn test_values_are_read_and_normalized() {
        let config = Config::from_lookup(lookup_from(&[
            ("NASA_API_KEY", "abc123"),
            ("NASA_API_BASE_URL", "http://localhost:8080/"),
            ("NASA_HTTP_TIMEOUT_SECS", "30"),
            ("NASA_LOG_DIR", "/tmp/nasa-logs"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "abc123");
        assert!(!config.is_demo_key());
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/nasa-logs")));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        for bad in ["zero", "0", "-5"] {
            let result = Config::from_lookup(lookup_from(&[("NASA_HTTP_TIMEOUT_SECS", bad)]));
            match result {
                Err(AppError::Config(msg)) => assert!(msg.contains("NASA_HTTP_TIMEOUT_SECS")),
                other => panic!("Expected Config error for '{}', got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_cli_key_overrides_environment() {
        let config = Config::from_lookup(lookup_from(&[("NASA_API_KEY", "from-env")]))
            .unwrap()
            .with_api_key(Some("from-flag".to_string()));
        assert_eq!(config.api_key, "from-flag");

        let unchanged = config.clone().with_api_key(Some(" ".to_string()));
        assert_eq!(unchanged.api_key, "from-flag");
        assert_eq!(unchanged.with_api_key(None).api_key, "from-flag");
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        env::set_var("NASA_API_KEY", "process-key");
        env::set_var("NASA_HTTP_TIMEOUT_SECS", "7");
        let config = Config::from_env();
        env::remove_var("NASA_API_KEY");
        env::remove_var("NASA_HTTP_TIMEOUT_SECS");

        let config = config.unwrap();
        assert_eq!(config.api_key, "process-key");
        assert_eq!(config.timeout, Duration::from_secs(7));
    }
}
