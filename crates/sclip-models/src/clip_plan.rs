//! Clip plan: the parameters that fully determine one output clip.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Smallest output width/height accepted for a clip.
pub const MIN_DIMENSION: u32 = 100;

/// Upper bound offered for frame-rate sliders.
pub const MAX_FRAME_RATE: f64 = 120.0;

/// Tolerance when comparing a clip end against the probed duration.
pub const DURATION_EPSILON: f64 = 1e-3;

/// Output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContainerFormat {
    #[default]
    Mp4,
    Mov,
}

impl ContainerFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ContainerFormat::Mp4 => "mp4",
            ContainerFormat::Mov => "mov",
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ContainerFormat {
    type Err = ContainerFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "mp4" => Ok(ContainerFormat::Mp4),
            "mov" => Ok(ContainerFormat::Mov),
            _ => Err(ContainerFormatParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown container format: {0}")]
pub struct ContainerFormatParseError(String);

/// Time range, output size, frame rate and container for one clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipPlan {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Output frame rate
    pub fps: f64,
    /// Output container
    #[serde(default)]
    pub container: ContainerFormat,
}

impl ClipPlan {
    /// Clip length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

/// Advisory ranges for interactive controls.
///
/// These guide a UI; they are not enforced by plan validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderBounds {
    pub time: Range<f64>,
    pub width: Range<u32>,
    pub height: Range<u32>,
    pub fps: Range<f64>,
}

/// A plan constraint that was violated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("start time {start:.3}s is negative")]
    NegativeStart { start: f64 },

    #[error("start time {start:.3}s is after end time {end:.3}s")]
    StartAfterEnd { start: f64, end: f64 },

    #[error("end time {end:.3}s exceeds media duration {duration:.3}s")]
    EndBeyondDuration { end: f64, duration: f64 },

    #[error("{dimension} {value}px is below the minimum of {min}px")]
    DimensionTooSmall {
        dimension: &'static str,
        value: u32,
        min: u32,
    },

    #[error("frame rate {fps} must be positive")]
    NonPositiveFrameRate { fps: f64 },

    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_parse_and_display() {
        assert_eq!("mp4".parse::<ContainerFormat>().unwrap(), ContainerFormat::Mp4);
        assert_eq!(".MOV".parse::<ContainerFormat>().unwrap(), ContainerFormat::Mov);
        assert!("avi".parse::<ContainerFormat>().is_err());
        assert_eq!(ContainerFormat::Mov.to_string(), "mov");
        assert_eq!(ContainerFormat::default(), ContainerFormat::Mp4);
    }

    #[test]
    fn test_plan_serde_defaults_container() {
        let plan: ClipPlan = serde_json::from_str(
            r#"{"start":1.0,"end":4.5,"width":640,"height":480,"fps":30.0}"#,
        )
        .unwrap();
        assert_eq!(plan.container, ContainerFormat::Mp4);
        assert!((plan.duration() - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validation_error_names_constraint() {
        let err = ValidationError::DimensionTooSmall {
            dimension: "width",
            value: 50,
            min: MIN_DIMENSION,
        };
        assert_eq!(err.to_string(), "width 50px is below the minimum of 100px");
    }
}
