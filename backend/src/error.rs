//! Error types for the estimation engine and its configuration boundary.
//!
//! The estimation pipeline itself is infallible. Errors only surface where
//! outside data enters the crate: parameter overrides, configuration files,
//! raw timestamps and playlist records.

/// Result type for estimation operations
pub type Result<T> = std::result::Result<T, EstimationError>;

/// Error type for estimation operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimationError {
    /// A parameter is missing, unparseable, or violates its invariant.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Epoch milliseconds outside the representable range.
    #[error("Invalid timestamp: {0} ms")]
    InvalidTimestamp(i64),

    /// Civil date/time that does not map to an instant in the reference zone.
    #[error("Invalid civil time: {0}")]
    InvalidCivilTime(String),

    /// Playlist record that cannot be turned into an estimation input.
    #[error("Invalid record '{key}': {message}")]
    InvalidRecord { key: String, message: String },
}

impl EstimationError {
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether the error was caused by caller-supplied input rather than
    /// process configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimestamp(_) | Self::InvalidCivilTime(_) | Self::InvalidRecord { .. }
        )
    }
}
