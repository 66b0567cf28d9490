//! Configuration types.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Kick authorization endpoint.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://id.kick.com/oauth/authorize";

/// Kick token endpoint (also used for refresh by other tooling).
pub const DEFAULT_TOKEN_URL: &str = "https://id.kick.com/oauth/token";

/// Kick webhook-signing public key endpoint.
pub const DEFAULT_PUBLIC_KEY_URL: &str = "https://api.kick.com/public/v1/public-key";

/// Scope requested when `KICK_OAUTH_SCOPE` is unset.
pub const DEFAULT_SCOPE: &str = "events:subscribe";

/// Listen port when `AUTH_PORT` is unset.
pub const DEFAULT_PORT: u16 = 3030;

/// Chat phrase that asks Zoltar for a prediction.
pub const DEFAULT_TRIGGER: &str = "!zoltar give me a prediction";

/// Bound applied to every outbound provider call.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// OAuth client registration and provider endpoints.
#[derive(Clone)]
pub struct KickConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub authorize_url: String,
    pub token_url: String,
    pub public_key_url: String,
}

impl KickConfig {
    /// Create a config with the given credentials and Kick's public endpoints.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scope: DEFAULT_SCOPE.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            public_key_url: DEFAULT_PUBLIC_KEY_URL.to_string(),
        }
    }
}

impl fmt::Debug for KickConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KickConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("public_key_url", &self.public_key_url)
            .finish()
    }
}

/// Full relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// OAuth client and provider endpoints.
    pub kick: KickConfig,

    /// HTTP listen port.
    pub port: u16,

    /// Directory holding `pkce.json`, `tokens.json` and `logs/`.
    pub data_dir: PathBuf,

    /// Chat phrase that triggers a prediction.
    pub trigger: String,

    /// Timeout for token exchange and public key fetch.
    pub http_timeout: Duration,
}

impl RelayConfig {
    /// Create a config around `kick` with every other option defaulted.
    pub fn new(kick: KickConfig) -> Self {
        Self {
            kick,
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("."),
            trigger: DEFAULT_TRIGGER.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Override the listen port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Override the trigger phrase.
    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = trigger.into();
        self
    }

    /// Override the outbound HTTP timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}
