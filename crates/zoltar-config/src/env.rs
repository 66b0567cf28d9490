//! Environment variable resolution.
//!
//! # Environment Variables
//!
//! - `KICK_CLIENT_ID`, `KICK_CLIENT_SECRET`, `REDIRECT_URI` - required
//! - `KICK_OAUTH_SCOPE` - requested scope (default `events:subscribe`)
//! - `AUTH_PORT` - listen port (default `3030`)
//! - `ZOLTAR_TRIGGER` - chat trigger phrase
//! - `ZOLTAR_DATA_DIR` - where `pkce.json` and `tokens.json` live (default `.`)
//! - `ZOLTAR_HTTP_TIMEOUT_SECS` - outbound timeout (default `10`)
//! - `KICK_AUTHORIZE_URL`, `KICK_TOKEN_URL`, `KICK_PUBLIC_KEY_URL` - endpoint overrides

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::types::{KickConfig, RelayConfig};

pub const CLIENT_ID_ENV: &str = "KICK_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "KICK_CLIENT_SECRET";
pub const REDIRECT_URI_ENV: &str = "REDIRECT_URI";
pub const SCOPE_ENV: &str = "KICK_OAUTH_SCOPE";
pub const PORT_ENV: &str = "AUTH_PORT";
pub const TRIGGER_ENV: &str = "ZOLTAR_TRIGGER";
pub const DATA_DIR_ENV: &str = "ZOLTAR_DATA_DIR";
pub const HTTP_TIMEOUT_ENV: &str = "ZOLTAR_HTTP_TIMEOUT_SECS";
pub const AUTHORIZE_URL_ENV: &str = "KICK_AUTHORIZE_URL";
pub const TOKEN_URL_ENV: &str = "KICK_TOKEN_URL";
pub const PUBLIC_KEY_URL_ENV: &str = "KICK_PUBLIC_KEY_URL";

impl RelayConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let require = |var: &'static str| get(var).ok_or(ConfigError::MissingVar { var });

        let mut kick = KickConfig::new(
            require(CLIENT_ID_ENV)?,
            require(CLIENT_SECRET_ENV)?,
            require(REDIRECT_URI_ENV)?,
        );
        if let Some(scope) = get(SCOPE_ENV) {
            kick.scope = scope;
        }
        if let Some(url) = get(AUTHORIZE_URL_ENV) {
            kick.authorize_url = url;
        }
        if let Some(url) = get(TOKEN_URL_ENV) {
            kick.token_url = url;
        }
        if let Some(url) = get(PUBLIC_KEY_URL_ENV) {
            kick.public_key_url = url;
        }

        let mut config = RelayConfig::new(kick);
        if let Some(port) = get(PORT_ENV) {
            config.port = parse_number(PORT_ENV, &port)?;
        }
        if let Some(trigger) = get(TRIGGER_ENV) {
            config.trigger = trigger;
        }
        if let Some(dir) = get(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(secs) = get(HTTP_TIMEOUT_ENV) {
            let secs: u64 = parse_number(HTTP_TIMEOUT_ENV, &secs)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    var: HTTP_TIMEOUT_ENV,
                    value: "0".to_string(),
                    reason: "timeout must be at least one second".to_string(),
                });
            }
            config.http_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_number<T>(var: &'static str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
