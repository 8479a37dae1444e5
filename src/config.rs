//! API configuration: base URL resolution and request timeouts.
//!
//! Base URL resolution order:
//! 1. `CRMKIT_API_BASE_URL` environment variable
//! 2. `apiBaseUrl` in `~/.crmkit/config.json`
//! 3. Deployed default (`http://localhost:8000/api`)

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Environment variable that overrides every other base URL source.
pub const BASE_URL_ENV: &str = "CRMKIT_API_BASE_URL";

/// Fallback when neither the env var nor the config file is set.
const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default per-request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// AI agent queries run a server-side model call and need a longer budget.
const AI_TIMEOUT_SECS: u64 = 30;

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub ai_timeout: Duration,
}

/// On-disk config file shape (`~/.crmkit/config.json`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    api_base_url: Option<String>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            ai_timeout: Duration::from_secs(AI_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Build a config from env var, config file, and defaults, in that order.
    pub fn from_env() -> Self {
        let file = load_config_file().unwrap_or_default();

        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or(file.api_base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout = Duration::from_secs(
            file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        );

        Self {
            base_url: normalize_base_url(&base_url),
            request_timeout,
            ai_timeout: Duration::from_secs(AI_TIMEOUT_SECS),
        }
    }

    /// Build a config pointing at an explicit base URL (tests, tools).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    /// Join a resource path onto the base URL.
    ///
    /// Paths are Django-style: leading and trailing slash (`/leads/`,
    /// `/leads/5/convert/`). The base never carries a trailing slash.
    pub fn endpoint(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }
}

/// Canonical config file path (`~/.crmkit/config.json`).
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".crmkit")
        .join("config.json")
}

fn load_config_file() -> Option<ConfigFile> {
    let path = config_path();
    if !path.exists() {
        return None;
    }
    let content = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("Ignoring malformed config at {}: {}", path.display(), e);
            None
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let cfg = ApiConfig::with_base_url("https://crm.example.com/api/");
        assert_eq!(
            cfg.endpoint("/leads/"),
            "https://crm.example.com/api/leads/"
        );
        assert_eq!(
            cfg.endpoint("leads/5/convert/"),
            "https://crm.example.com/api/leads/5/convert/"
        );
    }

    #[test]
    fn default_base_url_is_local_backend() {
        let cfg = ApiConfig::default();
        assert_eq!(cfg.base_url, "http://localhost:8000/api");
    }

    #[test]
    fn config_file_shape_parses() {
        let json = r#"{ "apiBaseUrl": "https://crm.example.com/api", "requestTimeoutSecs": 30 }"#;
        let file: ConfigFile = serde_json::from_str(json).unwrap();
        assert_eq!(
            file.api_base_url.as_deref(),
            Some("https://crm.example.com/api")
        );
        assert_eq!(file.request_timeout_secs, Some(30));
    }
}
