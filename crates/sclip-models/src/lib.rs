//! Shared data models for ScribeClip.
//!
//! This crate provides Serde-serializable types for:
//! - Probed media metadata and frame-rate parsing
//! - Clip plans, output containers and validation errors
//! - Encoding configuration
//! - Progress milestones

pub mod clip_plan;
pub mod encoding;
pub mod media;
pub mod progress;

// Re-export common types
pub use clip_plan::{
    ClipPlan, ContainerFormat, Range, SliderBounds, ValidationError, DURATION_EPSILON,
    MAX_FRAME_RATE, MIN_DIMENSION,
};
pub use encoding::EncodingConfig;
pub use media::{parse_frame_rate, MediaMetadata};
pub use progress::{no_progress, ProgressCallback, ProgressUpdate};
