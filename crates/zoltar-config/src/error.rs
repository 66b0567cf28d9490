//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while assembling the relay configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("missing required environment variable '{var}'")]
    MissingVar { var: &'static str },

    /// An environment variable is set but cannot be parsed.
    #[error("invalid value '{value}' for '{var}': {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}
