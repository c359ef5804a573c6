use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Everything has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote résumé API. `None` runs against the in-memory store.
    pub store_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Debounce delay for autosave. Zero disables it.
    pub autosave_delay: Duration,
    pub store_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            store_url: optional_env("STORE_URL"),
            port: parse_env("PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            autosave_delay: Duration::from_millis(
                parse_env("AUTOSAVE_DELAY_MS", 2000u64)
                    .context("AUTOSAVE_DELAY_MS must be a number of milliseconds")?,
            ),
            store_timeout: Duration::from_secs(
                parse_env("STORE_TIMEOUT_SECS", 30u64)
                    .context("STORE_TIMEOUT_SECS must be a number of seconds")?,
            ),
        })
    }
}

/// Unset or blank values count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value for '{key}': {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        assert_eq!(parse_env("VITAE_TEST_UNSET_KEY", 42u16).unwrap(), 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("VITAE_TEST_BAD_PORT", "eighty");
        assert!(parse_env("VITAE_TEST_BAD_PORT", 8080u16).is_err());
    }

    #[test]
    fn test_blank_optional_is_absent() {
        std::env::set_var("VITAE_TEST_BLANK_URL", "   ");
        assert_eq!(optional_env("VITAE_TEST_BLANK_URL"), None);
    }
}
