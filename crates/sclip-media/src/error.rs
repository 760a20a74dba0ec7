//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

use sclip_models::ValidationError;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during probing and clip rendering.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFprobe failed: {message}")]
    ProbeExecution {
        message: String,
        stderr: Option<String>,
    },

    #[error("No video stream found in {0}")]
    NoVideoStream(PathBuf),

    #[error("Missing metadata: {0}")]
    MissingMetadata(String),

    #[error("Invalid clip plan: {0}")]
    Validation(#[from] ValidationError),

    #[error("FFmpeg failed: {message}")]
    ExternalTool {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create a probe failure error.
    pub fn probe_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ProbeExecution {
            message: message.into(),
            stderr,
        }
    }

    /// Create a missing-metadata error naming the absent field.
    pub fn missing_metadata(field: impl Into<String>) -> Self {
        Self::MissingMetadata(field.into())
    }

    /// Create an FFmpeg failure error.
    pub fn external_tool(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::ExternalTool {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Diagnostic output captured from the external tool, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            MediaError::ProbeExecution { stderr, .. } | MediaError::ExternalTool { stderr, .. } => {
                stderr.as_deref()
            }
            _ => None,
        }
    }
}
