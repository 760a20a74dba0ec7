//! Clip rendering configuration.

use std::path::PathBuf;

use tokio::sync::watch;

use sclip_media::ClipOptions;

/// Clip rendering configuration.
#[derive(Debug, Clone)]
pub struct ClipConfig {
    /// Parent directory for rendered clips
    pub work_dir: PathBuf,
    /// FFmpeg timeout in seconds; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir(),
            timeout_secs: None,
        }
    }
}

impl ClipConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("CLIP_WORK_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            timeout_secs: std::env::var("CLIP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0),
        }
    }

    /// Rendering options for one run.
    pub fn clip_options(&self, cancel_rx: Option<watch::Receiver<bool>>) -> ClipOptions {
        ClipOptions {
            work_dir: self.work_dir.clone(),
            timeout_secs: self.timeout_secs,
            cancel_rx,
        }
    }
}
