//! Error types for newsclf

/// Result type alias using newsclf's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for newsclf operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request body did not match the expected shape
    #[error("validation error: {0}")]
    Validation(String),

    /// Model artifact missing, unreadable or incompatible
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Classifier failed on a well-formed record
    #[error("inference error: {0}")]
    Inference(String),

    /// Request log could not be written
    #[error("logging error: {0}")]
    Logging(String),

    /// Filesystem/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new logging error
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error was caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            Error::artifact("missing file").to_string(),
            "artifact error: missing file"
        );
        assert_eq!(
            Error::logging("sink closed").to_string(),
            "logging error: sink closed"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::validation("missing field `title`").is_client_error());
        assert!(!Error::inference("bad input").is_client_error());
        assert!(!Error::Io(std::io::Error::other("disk full")).is_client_error());
    }
}
