//! Error types for webhook handling.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, WebhookError>;

/// Errors raised while handling an authenticated webhook.
///
/// Signature failure is not an error: verification yields a plain `bool`
/// and rejection is a terminal outcome of its own.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// Fetching the provider's signing key failed.
    #[error("Public key fetch failed: {0}")]
    KeyFetch(String),

    /// A verified payload could not be interpreted.
    #[error("Invalid payload: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for WebhookError {
    fn from(e: reqwest::Error) -> Self {
        WebhookError::KeyFetch(e.to_string())
    }
}
