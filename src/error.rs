/// Result type alias for chord operations.
pub type Result<T> = std::result::Result<T, ChordError>;

/// Errors raised while building chord trees or running them.
#[derive(Debug, thiserror::Error)]
pub enum ChordError {
    /// A dynamic command value is not a string, number, boolean or chord.
    #[error("invalid command for key '{key}': {message}")]
    InvalidCommand { key: String, message: String },

    /// A dynamic condition value is not a boolean, string, number or predicate.
    #[error("invalid condition for key '{key}': {message}")]
    InvalidCondition { key: String, message: String },

    /// A dynamic description value is not a string.
    #[error("invalid description for key '{key}': {message}")]
    InvalidDescription { key: String, message: String },

    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Raised by the strict add entry points only. `set` upserts instead.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("transform produced an invalid action: {0}")]
    TransformContractViolation(String),

    #[error("no input received ({0})")]
    NoInputReceived(String),

    /// A callback command failed. The original cause is kept as the source.
    #[error("action '{key}' failed: {source}")]
    ActionExecutionFailed {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Timeout in seconds that is zero, negative or not finite.
    #[error("invalid timeout {0}s: must be greater than zero")]
    InvalidTimeout(f64),
}

impl ChordError {
    pub fn invalid_command(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCommand {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn invalid_condition(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCondition {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn invalid_description(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDescription {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Soft misses are surfaced to the user through notifications and never
    /// take the host down.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::KeyNotFound(_) | Self::NoInputReceived(_))
    }
}
