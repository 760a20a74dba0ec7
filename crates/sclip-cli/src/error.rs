//! CLI error types.

use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Transcription error: {0}")]
    Asr(#[from] sclip_asr::AsrError),

    #[error("Media error: {0}")]
    Media(#[from] sclip_media::MediaError),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Output captured from FFmpeg or FFprobe for a failed run.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            CliError::Media(e) => e.stderr(),
            _ => None,
        }
    }

    /// Whether the failure came from an interrupted run rather than bad input.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            CliError::Asr(sclip_asr::AsrError::Cancelled)
                | CliError::Media(sclip_media::MediaError::Cancelled)
        )
    }
}
