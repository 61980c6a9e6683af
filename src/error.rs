//! Error handling for the interviewer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterviewerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, InterviewerError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for InterviewerError {
    fn from(err: anyhow::Error) -> Self {
        InterviewerError::Processing(err.to_string())
    }
}

impl InterviewerError {
    /// Whether the caller sent a bad request (as opposed to a server-side failure)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            InterviewerError::MissingField(_)
                | InterviewerError::InvalidInput(_)
                | InterviewerError::UnsupportedFormat(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(InterviewerError::MissingField("message").is_client_error());
        assert!(InterviewerError::InvalidInput("empty".to_string()).is_client_error());
        assert!(!InterviewerError::Processing("failed".to_string()).is_client_error());
    }

    #[test]
    fn test_missing_field_message() {
        let err = InterviewerError::MissingField("sessionId");
        assert_eq!(err.to_string(), "Missing required field: sessionId");
    }
}
