//! Error types for the evaluation harness

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, EvalError>;

/// Evaluation errors
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Document type {0} not supported.")]
    UnknownDocumentType(String),

    #[error("Provider {0} not supported.")]
    UnsupportedProvider(String),

    /// The provider returned a different number of answers than questions asked
    #[error("Answer count mismatch: expected {expected}, found {found}")]
    AnswerCountMismatch { expected: usize, found: usize },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Upstream error: status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<config::ConfigError> for EvalError {
    fn from(e: config::ConfigError) -> Self {
        EvalError::Configuration(e.to_string())
    }
}

impl From<reqwest::Error> for EvalError {
    fn from(e: reqwest::Error) -> Self {
        EvalError::RequestFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_provider_message() {
        let err = EvalError::UnsupportedProvider("azure".to_string());
        assert_eq!(err.to_string(), "Provider azure not supported.");
    }

    #[test]
    fn test_count_mismatch_message() {
        let err = EvalError::AnswerCountMismatch { expected: 3, found: 2 };
        assert_eq!(err.to_string(), "Answer count mismatch: expected 3, found 2");
    }
}
