//! FFmpeg CLI wrapper for clip planning and rendering.
//!
//! This crate provides:
//! - FFprobe metadata extraction (duration, size, rational frame rate)
//! - Clip plan defaults, advisory slider bounds and validation
//! - Type-safe FFmpeg command building
//! - Clip rendering with cancellation and timeout support

pub mod clip;
pub mod command;
pub mod error;
pub mod planner;
pub mod probe;

pub use clip::{apply_plan, ClipOptions};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use planner::{
    build_transform_spec, build_transform_spec_in, build_transform_spec_to, derive_defaults,
    slider_bounds, validate, TransformSpec,
};
pub use probe::probe;
