use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TOKEN_FILE: &str = ".puk360/token";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub form: FormConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Origin of the events backend, without the `/api/events` path.
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// File holding the bearer token written by `login`.
    pub token_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    /// Delay between a confirmed creation and the `created` callback.
    pub created_delay_ms: u64,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl FormConfig {
    pub fn created_delay(&self) -> Duration {
        Duration::from_millis(self.created_delay_ms)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds the config from a variable lookup, applying defaults for unset names.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = var("EVENTS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        validate_base_url(&base_url)?;

        Ok(Config {
            api: ApiConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                request_timeout_seconds: var("EVENTS_REQUEST_TIMEOUT_SECONDS")
                    .unwrap_or_else(|| "30".to_string())
                    .parse()
                    .map_err(|_| {
                        ConfigError::InvalidValue("EVENTS_REQUEST_TIMEOUT_SECONDS".to_string())
                    })?,
            },
            auth: AuthConfig {
                token_file: var("EVENTS_TOKEN_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE)),
            },
            form: FormConfig {
                created_delay_ms: var("EVENTS_CREATED_DELAY_MS")
                    .unwrap_or_else(|| "1500".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("EVENTS_CREATED_DELAY_MS".to_string()))?,
            },
        })
    }
}

/// The backend origin must be an absolute http(s) URL with a host.
fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidValue("EVENTS_API_URL".to_string());
    let url = Url::parse(base_url).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                request_timeout_seconds: 30,
            },
            auth: AuthConfig {
                token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            },
            form: FormConfig {
                created_delay_ms: 1500,
            },
        }
    }
}
