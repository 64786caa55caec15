//! Environment-driven configuration with `.env` support.

use crate::error::{Result, SentryError};
use std::env;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_PORT: u16 = 3000;

const DEFAULT_WATER_MODEL_URL: &str =
    "https://teachablemachine.withgoogle.com/models/HMHHWzV40/";
const DEFAULT_DOOR_MODEL_URL: &str =
    "https://teachablemachine.withgoogle.com/models/LC7nD1PQc/";
const DEFAULT_SITE_ROOT: &str = "site";
const DEFAULT_PUBLIC_ROOT: &str = "public";

/// Runtime configuration for the daemon and its HTTP surface.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub port: u16,
    pub water_model_url: Url,
    pub door_model_url: Url,
    /// Primary static root, also holds the root document.
    pub site_root: PathBuf,
    /// Secondary static root consulted when the primary misses.
    pub public_root: PathBuf,
}

impl SentryConfig {
    /// Load configuration from environment variables, reading `.env` first
    /// if one exists.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: Self::load_port()?,
            water_model_url: Self::load_model_url(
                "SENTRY_WATER_MODEL_URL",
                DEFAULT_WATER_MODEL_URL,
            )?,
            door_model_url: Self::load_model_url("SENTRY_DOOR_MODEL_URL", DEFAULT_DOOR_MODEL_URL)?,
            site_root: Self::load_dir("SENTRY_SITE_ROOT", DEFAULT_SITE_ROOT),
            public_root: Self::load_dir("SENTRY_PUBLIC_ROOT", DEFAULT_PUBLIC_ROOT),
        })
    }

    fn load_port() -> Result<u16> {
        match env::var("SENTRY_PORT") {
            Ok(raw) => Self::parse_port(&raw),
            Err(_) => Ok(DEFAULT_PORT),
        }
    }

    fn parse_port(raw: &str) -> Result<u16> {
        raw.parse::<u16>().map_err(|_| {
            SentryError::Config(format!("SENTRY_PORT must be a port number, got '{}'", raw))
        })
    }

    fn load_model_url(var: &str, default: &str) -> Result<Url> {
        let raw = env::var(var).unwrap_or_else(|_| default.to_string());
        Self::parse_model_url(var, &raw)
    }

    /// Model bases must end with '/' so `model.json` and `metadata.json`
    /// resolve underneath them.
    fn parse_model_url(var: &str, raw: &str) -> Result<Url> {
        let url = Url::parse(raw)
            .map_err(|e| SentryError::Config(format!("{} is not a valid URL: {}", var, e)))?;
        if !url.path().ends_with('/') {
            return Err(SentryError::Config(format!(
                "{} must end with '/' so model files resolve against it",
                var
            )));
        }
        Ok(url)
    }

    fn load_dir(var: &str, default: &str) -> PathBuf {
        PathBuf::from(env::var(var).unwrap_or_else(|_| default.to_string()))
    }
}

/// Load configuration with actionable messages for development.
pub fn load_config() -> Result<SentryConfig> {
    match SentryConfig::load() {
        Ok(config) => {
            log::info!("Configuration loaded (port {})", config.port);
            Ok(config)
        }
        Err(e) => {
            log::error!("Configuration error: {}", e);
            log::error!(
                "Set SENTRY_PORT / SENTRY_WATER_MODEL_URL / SENTRY_DOOR_MODEL_URL in the environment or a .env file"
            );
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_parsing() {
        assert_eq!(SentryConfig::parse_port("3000").unwrap(), 3000);
        assert_eq!(SentryConfig::parse_port("8080").unwrap(), 8080);
        assert!(SentryConfig::parse_port("not-a-port").is_err());
        assert!(SentryConfig::parse_port("70000").is_err());
    }

    #[test]
    fn test_model_url_validation() {
        assert!(SentryConfig::parse_model_url("X", "https://example.com/models/abc/").is_ok());
        assert!(SentryConfig::parse_model_url("X", "https://example.com/models/abc").is_err());
        assert!(SentryConfig::parse_model_url("X", "not a url").is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_env_override() {
        env::set_var("SENTRY_PORT", "8080");
        let config = SentryConfig::load().unwrap();
        assert_eq!(config.port, 8080);
        env::remove_var("SENTRY_PORT");
    }

    #[test]
    #[serial_test::serial]
    fn test_defaults() {
        env::remove_var("SENTRY_PORT");
        let config = SentryConfig::load().unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.water_model_url.path().ends_with('/'));
        assert_eq!(config.site_root, PathBuf::from(DEFAULT_SITE_ROOT));
        assert_eq!(config.public_root, PathBuf::from(DEFAULT_PUBLIC_ROOT));
    }
}
