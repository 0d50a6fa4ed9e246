//! Console configuration, read once from the environment.

use std::time::Duration;

use thiserror::Error;

use midplat_auth::Platform;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Backend origin, without the `/api/v1` prefix and without trailing slash.
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub login_path: String,
    /// Where unauthorized (but authenticated) navigation lands.
    pub default_path: String,
    pub platform: Platform,
    /// Token to seed the store with, for non-interactive runs.
    pub token: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".to_string(),
            http_timeout: Duration::from_secs(15),
            login_path: "/login".to_string(),
            default_path: "/dashboard".to_string(),
            platform: Platform::Admin,
            token: None,
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source; unset variables
    /// fall back to [`ConsoleConfig::default`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = match get("MIDPLAT_API_BASE_URL") {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.trim_end_matches('/').to_string()
            }
            Some(url) => {
                return Err(ConfigError::Invalid {
                    var: "MIDPLAT_API_BASE_URL",
                    reason: format!("expected an http(s) URL, got '{url}'"),
                });
            }
            None => defaults.api_base_url,
        };

        let http_timeout = match get("MIDPLAT_HTTP_TIMEOUT_SECS") {
            Some(secs) => {
                let secs: u64 = secs.parse().map_err(|e| ConfigError::Invalid {
                    var: "MIDPLAT_HTTP_TIMEOUT_SECS",
                    reason: format!("{e}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        var: "MIDPLAT_HTTP_TIMEOUT_SECS",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.http_timeout,
        };

        let login_path = route_path(get("MIDPLAT_LOGIN_PATH"), "MIDPLAT_LOGIN_PATH")?
            .unwrap_or(defaults.login_path);
        let default_path = route_path(get("MIDPLAT_DEFAULT_PATH"), "MIDPLAT_DEFAULT_PATH")?
            .unwrap_or(defaults.default_path);

        let platform = match get("MIDPLAT_PLATFORM") {
            Some(p) => p.parse::<Platform>().map_err(|e| ConfigError::Invalid {
                var: "MIDPLAT_PLATFORM",
                reason: e.to_string(),
            })?,
            None => defaults.platform,
        };

        Ok(Self {
            api_base_url,
            http_timeout,
            login_path,
            default_path,
            platform,
            token: get("MIDPLAT_TOKEN"),
        })
    }
}

fn route_path(value: Option<String>, var: &'static str) -> Result<Option<String>, ConfigError> {
    match value {
        Some(path) if !path.starts_with('/') => Err(ConfigError::Invalid {
            var,
            reason: format!("route paths start with '/', got '{path}'"),
        }),
        other => Ok(other),
    }
}
