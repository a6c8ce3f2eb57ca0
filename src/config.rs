//! Application configuration from environment variables.
//!
//! Preconditions are checked once at startup; any failure is fatal and the
//! process exits before binding the listener.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::llm::DEFAULT_MODEL;

pub const APP_NAME: &str = "medcompanion";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Value shipped in .env templates. Treated the same as unset.
const API_KEY_PLACEHOLDER: &str = "your-api-key-here";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{APP_NAME}=info,tower_http=warn")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set. Add it to your environment or .env file")]
    MissingApiKey,
    #[error("GEMINI_API_KEY still holds the placeholder value. Set a real API key")]
    PlaceholderApiKey,
    #[error("Invalid MEDCOMPANION_ADDR '{0}': expected host:port")]
    InvalidBindAddr(String),
    #[error("MEDCOMPANION_SITE_DIR '{0}' does not exist or is not a directory")]
    MissingSiteDir(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub api_key: String,
    pub chat_model: String,
    /// Static site to serve as a fallback, when configured.
    pub site_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Seam for tests.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = match lookup("GEMINI_API_KEY") {
            None => return Err(ConfigError::MissingApiKey),
            Some(key) if key.trim().is_empty() => return Err(ConfigError::MissingApiKey),
            Some(key) if key == API_KEY_PLACEHOLDER => {
                return Err(ConfigError::PlaceholderApiKey)
            }
            Some(key) => key,
        };

        let addr_raw =
            lookup("MEDCOMPANION_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = addr_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(addr_raw.clone()))?;

        let chat_model =
            lookup("MEDCOMPANION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let site_dir = match lookup("MEDCOMPANION_SITE_DIR") {
            Some(dir) => {
                let path = PathBuf::from(&dir);
                if !path.is_dir() {
                    return Err(ConfigError::MissingSiteDir(dir));
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            bind_addr,
            api_key,
            chat_model,
            site_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        AppConfig::from_lookup(|key| map.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = config_from(&[("GEMINI_API_KEY", "real-key")]).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8000");
        assert_eq!(config.chat_model, DEFAULT_MODEL);
        assert!(config.site_dir.is_none());
    }

    #[test]
    fn missing_api_key_is_fatal() {
        assert!(matches!(config_from(&[]), Err(ConfigError::MissingApiKey)));
        assert!(matches!(
            config_from(&[("GEMINI_API_KEY", "   ")]),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn placeholder_api_key_is_fatal() {
        assert!(matches!(
            config_from(&[("GEMINI_API_KEY", "your-api-key-here")]),
            Err(ConfigError::PlaceholderApiKey)
        ));
    }

    #[test]
    fn bind_addr_and_model_overridable() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "real-key"),
            ("MEDCOMPANION_ADDR", "0.0.0.0:9100"),
            ("MEDCOMPANION_MODEL", "gemini-2.5-pro"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:9100");
        assert_eq!(config.chat_model, "gemini-2.5-pro");
    }

    #[test]
    fn invalid_bind_addr_rejected() {
        let err = config_from(&[
            ("GEMINI_API_KEY", "real-key"),
            ("MEDCOMPANION_ADDR", "not-an-addr"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr(_)));
    }

    #[test]
    fn site_dir_must_exist() {
        let err = config_from(&[
            ("GEMINI_API_KEY", "real-key"),
            ("MEDCOMPANION_SITE_DIR", "/no/such/dir"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingSiteDir(_)));

        let dir = tempfile::tempdir().unwrap();
        let config = config_from(&[
            ("GEMINI_API_KEY", "real-key"),
            ("MEDCOMPANION_SITE_DIR", dir.path().to_str().unwrap()),
        ])
        .unwrap();
        assert_eq!(config.site_dir.unwrap(), dir.path());
    }
}
