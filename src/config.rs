//! Runtime configuration.
//!
//! Values come from the process environment (after loading `.env` with
//! `dotenvy`) and may be overridden by CLI flags.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_LOG_FILE: &str = "sips.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the lookup service (without the `/api/...` path).
    pub api_url: String,
    pub timeout: Duration,
    /// Filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Log destination for the TUI (stdout belongs to the terminal UI).
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| {
            var(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Config::default();

        if let Some(url) = non_empty("SIPS_API_URL") {
            config.api_url = validate_url(&url)?;
        }
        if let Some(raw) = non_empty("SIPS_TIMEOUT_SECS") {
            config.timeout = parse_timeout(&raw)?;
        }
        if let Some(filter) = non_empty("SIPS_LOG") {
            config.log_filter = filter;
        }
        if let Some(path) = non_empty("SIPS_LOG_FILE") {
            config.log_file = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Apply CLI overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        api_url: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, AppError> {
        if let Some(url) = api_url {
            self.api_url = validate_url(url)?;
        }
        if let Some(secs) = timeout_secs {
            if secs == 0 {
                return Err(AppError::new(2, "Timeout must be > 0 seconds."));
            }
            self.timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }
}

fn validate_url(url: &str) -> Result<String, AppError> {
    let url = url.trim().trim_end_matches('/');
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AppError::new(
            2,
            format!("SIPS_API_URL must start with http:// or https:// (got '{url}')."),
        ));
    }
    Ok(url.to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration, AppError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(AppError::new(
            2,
            format!("SIPS_TIMEOUT_SECS must be a positive integer (got '{raw}')."),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_vars(|_| None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn environment_values_are_read_and_trimmed() {
        let env = vars(&[
            ("SIPS_API_URL", " https://sips.example.com/ "),
            ("SIPS_TIMEOUT_SECS", "30"),
            ("SIPS_LOG", "cups_lookup=debug"),
            ("SIPS_LOG_FILE", ""),
        ]);
        let config = Config::from_vars(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.api_url, "https://sips.example.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.log_filter, "cups_lookup=debug");
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn invalid_values_are_usage_errors() {
        let env = vars(&[("SIPS_API_URL", "ftp://nope")]);
        let err = Config::from_vars(|k| env.get(k).cloned()).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let env = vars(&[("SIPS_TIMEOUT_SECS", "0")]);
        assert!(Config::from_vars(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn cli_overrides_win() {
        let config = Config::default()
            .with_overrides(Some("http://localhost:8080/"), Some(3))
            .unwrap();
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(Config::default().with_overrides(None, Some(0)).is_err());
    }
}
