//! Transcription client error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for transcription operations.
pub type AsrResult<T> = Result<T, AsrError>;

/// Errors that can occur while talking to the transcription service.
#[derive(Debug, Error)]
pub enum AsrError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service error {code}: {description}")]
    Service { code: String, description: String },

    #[error("Unexpected response: {0}")]
    Protocol(String),

    #[error("Malformed transcript payload: {0}")]
    MalformedPayload(String),

    #[error("Transcription job {order_id} ended with status {status}{}", fail_suffix(.fail_type))]
    JobFailed {
        order_id: String,
        status: i64,
        fail_type: Option<i64>,
    },

    #[error("Gave up after {attempts} status checks")]
    PollTimeout { attempts: u32 },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn fail_suffix(fail_type: &Option<i64>) -> String {
    fail_type
        .map(|t| format!(" (failType {})", t))
        .unwrap_or_default()
}

impl AsrError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }

    pub fn service(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            description: description.into(),
        }
    }

    /// True when the failure came from the network rather than the service.
    pub fn is_transport(&self) -> bool {
        matches!(self, AsrError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_failed_message() {
        let err = AsrError::JobFailed {
            order_id: "DKHJQ2022".into(),
            status: -1,
            fail_type: Some(6),
        };
        assert_eq!(
            err.to_string(),
            "Transcription job DKHJQ2022 ended with status -1 (failType 6)"
        );

        let err = AsrError::JobFailed {
            order_id: "x".into(),
            status: 0,
            fail_type: None,
        };
        assert_eq!(err.to_string(), "Transcription job x ended with status 0");
    }

    #[test]
    fn test_service_error_keeps_description() {
        let err = AsrError::service("26601", "signature mismatch");
        assert_eq!(err.to_string(), "Service error 26601: signature mismatch");
        assert!(!err.is_transport());
    }
}
