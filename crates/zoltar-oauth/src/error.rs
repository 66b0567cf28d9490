//! Error types for the OAuth flow.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, OAuthError>;

/// Errors that can occur during authorization and token exchange.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// Callback state did not match a pending authorization.
    ///
    /// Carries no detail so callers cannot learn whether a request was pending.
    #[error("State mismatch")]
    StateMismatch,

    /// Transport failure or timeout talking to the provider.
    #[error("Network error: {0}")]
    Network(String),

    /// Token endpoint answered with a non-success status.
    #[error("Provider error ({status}): {body}")]
    Provider { status: u16, body: String },

    /// Token endpoint answered 2xx without a usable token set.
    #[error("Malformed token response: {0}")]
    MalformedResponse(String),

    /// Persisting or reading local state failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl OAuthError {
    /// Whether the caller may reasonably retry the same operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OAuthError::Network(_))
    }
}

impl From<reqwest::Error> for OAuthError {
    fn from(e: reqwest::Error) -> Self {
        OAuthError::Network(e.to_string())
    }
}
