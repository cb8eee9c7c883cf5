//! Configuration types.

use std::time::Duration;

use reqwest::Url;
use secrecy::SecretString;

use crate::error::ConfigError;
use crate::session::DEFAULT_TOKEN_COOKIE;

/// Environment variable names.
pub mod env_keys {
    pub const API_URL: &str = "REFLECT_API_URL";
    pub const TOKEN_COOKIE: &str = "REFLECT_TOKEN_COOKIE";
    pub const HTTP_TIMEOUT_SECS: &str = "REFLECT_HTTP_TIMEOUT_SECS";
    pub const AUTH_TOKEN: &str = "REFLECT_AUTH_TOKEN";
}

/// Backend client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the reflection backend. `None` means offline.
    pub api_url: Option<Url>,
    /// Cookie that carries the auth token.
    pub token_cookie: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Token to seed the session with (e.g. from a previous sign-in).
    pub auth_token: Option<SecretString>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            token_cookie: DEFAULT_TOKEN_COOKIE.to_string(),
            timeout: Duration::from_secs(30),
            auth_token: None,
        }
    }
}

impl ClientConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(env_keys::API_URL) {
            let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
                key: env_keys::API_URL.to_string(),
                message: e.to_string(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidValue {
                    key: env_keys::API_URL.to_string(),
                    message: format!("unsupported scheme {}", url.scheme()),
                });
            }
            config.api_url = Some(url);
        }

        if let Some(name) = get(env_keys::TOKEN_COOKIE) {
            config.token_cookie = name.trim().to_string();
        }

        if let Some(raw) = get(env_keys::HTTP_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: env_keys::HTTP_TIMEOUT_SECS.to_string(),
                message: format!("expected whole seconds, got {raw:?}"),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: env_keys::HTTP_TIMEOUT_SECS.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
            config.timeout = Duration::from_secs(secs);
        }

        config.auth_token = get(env_keys::AUTH_TOKEN).map(SecretString::from);
        Ok(config)
    }

    /// The backend URL, or an error naming the variable to set.
    pub fn require_api_url(&self) -> Result<&Url, ConfigError> {
        self.api_url
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar(env_keys::API_URL.to_string()))
    }
}
