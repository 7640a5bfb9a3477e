//! Configuration module for the dashboard client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::PortalError;
use crate::models::Language;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend, without the `/api` suffix
    pub api_base_url: String,
    /// Path to the SQLite file used as durable client storage
    pub storage_path: PathBuf,
    /// Initial UI language sent with every request
    pub language: Language,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Retries after the first attempt (network errors and 5xx only)
    pub max_retries: u32,
    /// Upper bound for the exponential backoff between retries
    pub backoff_cap: Duration,
    /// How long a cached query counts as fresh
    pub stale_time: Duration,
    /// Redirect unauthenticated visitors of protected routes to the login page
    pub redirect_unauthenticated: bool,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            storage_path: "./data/session.sqlite".into(),
            language: Language::En,
            request_timeout: Duration::from_secs(15),
            max_retries: 1,
            backoff_cap: Duration::from_millis(4000),
            stale_time: Duration::from_secs(30),
            redirect_unauthenticated: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, PortalError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let api_base_url = env::var("CIVIC_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let storage_path = env::var("CIVIC_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_path);

        let language = match env::var("CIVIC_LANGUAGE") {
            Ok(tag) => Language::from_tag(&tag)
                .ok_or_else(|| PortalError::Config(format!("Unsupported CIVIC_LANGUAGE: {}", tag)))?,
            Err(_) => defaults.language,
        };

        let request_timeout = parse_var::<u64>("CIVIC_REQUEST_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let max_retries = parse_var::<u32>("CIVIC_MAX_RETRIES")?.unwrap_or(defaults.max_retries);

        let backoff_cap = parse_var::<u64>("CIVIC_BACKOFF_CAP_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.backoff_cap);

        let stale_time = parse_var::<u64>("CIVIC_STALE_TIME_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.stale_time);

        let redirect_unauthenticated = parse_var::<bool>("CIVIC_REDIRECT_UNAUTHENTICATED")?
            .unwrap_or(defaults.redirect_unauthenticated);

        let log_level = env::var("CIVIC_LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Self {
            api_base_url,
            storage_path,
            language,
            request_timeout,
            max_retries,
            backoff_cap,
            stale_time,
            redirect_unauthenticated,
            log_level,
        })
    }
}

/// Read and parse an optional environment variable.
fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, PortalError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PortalError::Config(format!("Invalid {} value: {}", name, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 9] = [
        "CIVIC_API_BASE_URL",
        "CIVIC_STORAGE_PATH",
        "CIVIC_LANGUAGE",
        "CIVIC_REQUEST_TIMEOUT_SECS",
        "CIVIC_MAX_RETRIES",
        "CIVIC_BACKOFF_CAP_MS",
        "CIVIC_STALE_TIME_SECS",
        "CIVIC_REDIRECT_UNAUTHENTICATED",
        "CIVIC_LOG_LEVEL",
    ];

    // Both cases live in one test because the process environment is shared.
    #[test]
    fn test_config_from_env() {
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:5000");
        assert_eq!(config.storage_path, PathBuf::from("./data/session.sqlite"));
        assert_eq!(config.language, Language::En);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.max_retries, 1);
        assert!(!config.redirect_unauthenticated);
        assert_eq!(config.log_level, "info");

        env::set_var("CIVIC_API_BASE_URL", "https://portal.example.gov/");
        env::set_var("CIVIC_LANGUAGE", "am");
        env::set_var("CIVIC_MAX_RETRIES", "3");
        let config = Config::from_env().unwrap();
        assert_eq!(config.api_base_url, "https://portal.example.gov");
        assert_eq!(config.language, Language::Am);
        assert_eq!(config.max_retries, 3);

        env::set_var("CIVIC_MAX_RETRIES", "many");
        let err = Config::from_env().unwrap_err();
        assert_eq!(err.error_code(), crate::errors::codes::CONFIG_ERROR);

        for var in VARS {
            env::remove_var(var);
        }
    }
}
