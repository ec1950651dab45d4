use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::table::DEFAULT_PAGE_SIZE;

/// Contact details printed on receipts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParishInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Default for ParishInfo {
    fn default() -> Self {
        Self {
            name: "Saint Mary's Parish".to_string(),
            phone: "+91 98765 43210".to_string(),
            email: "contact@saintmarys.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Base URL of the parish REST API, always ending in `/`
    pub api_base_url: String,

    /// Per-request timeout for the HTTP client
    pub request_timeout: Duration,

    /// How long a toast stays on screen
    pub toast_duration: Duration,

    /// Rows per page in every list table
    pub page_size: usize,

    /// Where desktop builds write downloaded receipts
    pub receipt_dir: PathBuf,

    pub parish: ParishInfo,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4000/".to_string(),
            request_timeout: Duration::from_millis(10_000),
            toast_duration: Duration::from_millis(5_000),
            page_size: DEFAULT_PAGE_SIZE,
            receipt_dir: PathBuf::from("./receipts"),
            parish: ParishInfo::default(),
        }
    }
}

fn parse_var<T>(name: &str, raw: Option<String>) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(value) => value
            .parse()
            .map(Some)
            .with_context(|| format!("{} has an invalid value: {:?}", name, value)),
        None => Ok(None),
    }
}

impl ConsoleConfig {
    /// Load from the process environment, seeding it from `.env` when present.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset or blank variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("PARISH_API_URL").filter(|u| !u.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }
        if !config.api_base_url.ends_with('/') {
            config.api_base_url.push('/');
        }
        reqwest::Url::parse(&config.api_base_url)
            .with_context(|| format!("PARISH_API_URL is not a valid URL: {}", config.api_base_url))?;

        if let Some(ms) = parse_var::<u64>("PARISH_API_TIMEOUT_MS", lookup("PARISH_API_TIMEOUT_MS"))? {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>("PARISH_TOAST_MS", lookup("PARISH_TOAST_MS"))? {
            config.toast_duration = Duration::from_millis(ms);
        }
        if let Some(size) = parse_var::<usize>("PARISH_PAGE_SIZE", lookup("PARISH_PAGE_SIZE"))? {
            anyhow::ensure!(size > 0, "PARISH_PAGE_SIZE must be at least 1");
            config.page_size = size;
        }
        if let Some(dir) = lookup("PARISH_RECEIPT_DIR").filter(|d| !d.trim().is_empty()) {
            config.receipt_dir = PathBuf::from(dir.trim());
        }

        if let Some(name) = lookup("PARISH_NAME").filter(|v| !v.trim().is_empty()) {
            config.parish.name = name;
        }
        if let Some(phone) = lookup("PARISH_PHONE").filter(|v| !v.trim().is_empty()) {
            config.parish.phone = phone;
        }
        if let Some(email) = lookup("PARISH_EMAIL").filter(|v| !v.trim().is_empty()) {
            config.parish.email = email;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.page_size, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            ("PARISH_API_URL", "https://api.parish.example/v1"),
            ("PARISH_PAGE_SIZE", "25"),
            ("PARISH_TOAST_MS", "1500"),
            ("PARISH_RECEIPT_DIR", "/tmp/receipts"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.parish.example/v1/");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.toast_duration, Duration::from_millis(1500));
        assert_eq!(config.receipt_dir, PathBuf::from("/tmp/receipts"));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(ConsoleConfig::from_lookup(lookup(&[("PARISH_PAGE_SIZE", "ten")])).is_err());
        assert!(ConsoleConfig::from_lookup(lookup(&[("PARISH_PAGE_SIZE", "0")])).is_err());
        assert!(ConsoleConfig::from_lookup(lookup(&[("PARISH_API_URL", "not a url")])).is_err());
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config =
            ConsoleConfig::from_lookup(lookup(&[("PARISH_API_TIMEOUT_MS", "  ")])).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
