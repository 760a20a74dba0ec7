//! Coarse progress reporting.
//!
//! Neither the transcription service nor the transcoder stream usable
//! progress, so operations report fixed milestones instead.

use serde::{Deserialize, Serialize};

/// A progress milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Completed fraction in `[0.0, 1.0]`
    pub fraction: f64,
    /// Human-readable step description
    pub description: String,
}

impl ProgressUpdate {
    pub fn new(fraction: f64, description: impl Into<String>) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
            description: description.into(),
        }
    }
}

/// Callback type for progress updates.
pub type ProgressCallback = Box<dyn Fn(ProgressUpdate) + Send + Sync + 'static>;

/// A callback that discards updates.
pub fn no_progress() -> ProgressCallback {
    Box::new(|_| {})
}
