use std::fmt;
use std::net::SocketAddr;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "MediLens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;

/// Credential variable names, in lookup order. The second is the name the
/// browser build used; accepted so existing `.env` files keep working.
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "VITE_GEMINI_API_KEY"];

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "medilens=info,medilens_lib=info,tower_http=warn"
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is missing")]
    MissingApiKey,

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Model service credential. Never printed.
#[derive(Clone, PartialEq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Everything the model client needs, injected at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub api_key: ApiKey,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub analyzer: AnalyzerConfig,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = API_KEY_VARS
            .iter()
            .find_map(|&name| non_blank(name))
            .map(|key| ApiKey::new(key.trim()))
            .ok_or(ConfigError::MissingApiKey)?;

        let model = non_blank("MEDILENS_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());
        let api_base = non_blank("MEDILENS_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into());

        let bind = non_blank("MEDILENS_BIND").unwrap_or_else(|| DEFAULT_BIND.into());
        let bind_addr = bind.trim().parse().map_err(|_| ConfigError::Invalid {
            name: "MEDILENS_BIND",
            value: bind.clone(),
        })?;

        let max_upload_mb = match non_blank("MEDILENS_MAX_UPLOAD_MB") {
            None => DEFAULT_MAX_UPLOAD_MB,
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|mb| *mb > 0)
                .ok_or(ConfigError::Invalid {
                    name: "MEDILENS_MAX_UPLOAD_MB",
                    value: raw,
                })?,
        };

        Ok(Self {
            analyzer: AnalyzerConfig {
                api_key,
                model,
                api_base,
            },
            bind_addr,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_applied() {
        let config = AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "abc")])).unwrap();
        assert_eq!(config.analyzer.api_key.expose(), "abc");
        assert_eq!(config.analyzer.model, DEFAULT_MODEL);
        assert_eq!(config.analyzer.api_base, DEFAULT_API_BASE);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn missing_key_is_fatal() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::MissingApiKey
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap_err(),
            ConfigError::MissingApiKey
        );
    }

    #[test]
    fn legacy_key_name_accepted() {
        let config = AppConfig::from_lookup(lookup(&[("VITE_GEMINI_API_KEY", "legacy")])).unwrap();
        assert_eq!(config.analyzer.api_key.expose(), "legacy");
    }

    #[test]
    fn primary_key_name_wins() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "primary"),
            ("VITE_GEMINI_API_KEY", "legacy"),
        ]))
        .unwrap();
        assert_eq!(config.analyzer.api_key.expose(), "primary");
    }

    #[test]
    fn overrides_read() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("MEDILENS_MODEL", "gemini-2.0-flash"),
            ("MEDILENS_BIND", "0.0.0.0:9000"),
            ("MEDILENS_MAX_UPLOAD_MB", "25"),
        ]))
        .unwrap();
        assert_eq!(config.analyzer.model, "gemini-2.0-flash");
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
    }

    #[test]
    fn invalid_values_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("MEDILENS_BIND", "not-an-address"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "MEDILENS_BIND", .. }));

        let err = AppConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("MEDILENS_MAX_UPLOAD_MB", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "MEDILENS_MAX_UPLOAD_MB", .. }));
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret");
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
    }

    #[test]
    fn app_name_is_medilens() {
        assert_eq!(APP_NAME, "MediLens");
    }
}
