//! Clip planning: default parameters, validation and FFmpeg argument layout.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use sclip_models::{
    ClipPlan, ContainerFormat, EncodingConfig, MediaMetadata, Range, SliderBounds,
    ValidationError, DURATION_EPSILON, MAX_FRAME_RATE, MIN_DIMENSION,
};

use crate::command::FfmpegCommand;

/// File name of rendered clips inside their per-run directory.
pub const OUTPUT_STEM: &str = "processed_video";

/// A fully-determined transcoder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSpec {
    command: FfmpegCommand,
}

impl TransformSpec {
    /// Ordered FFmpeg arguments.
    pub fn args(&self) -> Vec<String> {
        self.command.build_args()
    }

    /// Where the clip will be written.
    pub fn output_path(&self) -> &Path {
        self.command.output()
    }

    pub fn command(&self) -> &FfmpegCommand {
        &self.command
    }
}

/// Default plan for a probed input: the whole clip at its native size and rate.
///
/// Dimensions below [`MIN_DIMENSION`] are raised to it so the defaults always
/// pass [`validate`], and odd dimensions are rounded down since libx264 with
/// 4:2:0 chroma only accepts even sizes.
pub fn derive_defaults(metadata: &MediaMetadata) -> ClipPlan {
    ClipPlan {
        start: 0.0,
        end: metadata.duration,
        width: default_dimension(metadata.width),
        height: default_dimension(metadata.height),
        fps: metadata.frame_rate,
        container: ContainerFormat::default(),
    }
}

fn default_dimension(probed: u32) -> u32 {
    // MIN_DIMENSION is even, so rounding down never drops below it.
    probed.max(MIN_DIMENSION) & !1
}

/// Advisory control ranges for a probed input.
pub fn slider_bounds(metadata: &MediaMetadata) -> SliderBounds {
    SliderBounds {
        time: Range {
            min: 0.0,
            max: metadata.duration,
        },
        width: Range {
            min: MIN_DIMENSION,
            max: metadata.width.saturating_mul(2).max(MIN_DIMENSION),
        },
        height: Range {
            min: MIN_DIMENSION,
            max: metadata.height.saturating_mul(2).max(MIN_DIMENSION),
        },
        fps: Range {
            min: 1.0,
            max: MAX_FRAME_RATE.max(metadata.frame_rate),
        },
    }
}

/// Check a plan against the metadata of its input. Returns the plan unchanged.
pub fn validate(plan: ClipPlan, metadata: &MediaMetadata) -> Result<ClipPlan, ValidationError> {
    for (field, value) in [("start", plan.start), ("end", plan.end), ("fps", plan.fps)] {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }
    }

    if plan.start < 0.0 {
        return Err(ValidationError::NegativeStart { start: plan.start });
    }
    if plan.start > plan.end {
        return Err(ValidationError::StartAfterEnd {
            start: plan.start,
            end: plan.end,
        });
    }
    if plan.end > metadata.duration + DURATION_EPSILON {
        return Err(ValidationError::EndBeyondDuration {
            end: plan.end,
            duration: metadata.duration,
        });
    }
    for (dimension, value) in [("width", plan.width), ("height", plan.height)] {
        if value < MIN_DIMENSION {
            return Err(ValidationError::DimensionTooSmall {
                dimension,
                value,
                min: MIN_DIMENSION,
            });
        }
    }
    if plan.fps <= 0.0 {
        return Err(ValidationError::NonPositiveFrameRate { fps: plan.fps });
    }

    Ok(plan)
}

/// Build the transform for `plan`, writing into a fresh directory under the
/// system temp dir.
pub fn build_transform_spec(plan: &ClipPlan, input: impl AsRef<Path>) -> TransformSpec {
    build_transform_spec_in(plan, input, std::env::temp_dir())
}

/// Build the transform for `plan`, writing into a fresh directory under `work_dir`.
pub fn build_transform_spec_in(
    plan: &ClipPlan,
    input: impl AsRef<Path>,
    work_dir: impl AsRef<Path>,
) -> TransformSpec {
    let output = fresh_output_path(work_dir.as_ref(), plan.container);
    build_transform_spec_to(plan, input, output)
}

/// Build the transform for `plan` with an explicit output path.
pub fn build_transform_spec_to(
    plan: &ClipPlan,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> TransformSpec {
    let command = FfmpegCommand::new(input, output)
        .seek(plan.start)
        .until(plan.end)
        .video_filter(format!("scale={}:{},fps={}", plan.width, plan.height, plan.fps))
        .encoding(&EncodingConfig::default());

    TransformSpec { command }
}

fn fresh_output_path(work_dir: &Path, container: ContainerFormat) -> PathBuf {
    work_dir
        .join(format!("sclip-{}", Uuid::new_v4()))
        .join(format!("{}.{}", OUTPUT_STEM, container.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> MediaMetadata {
        MediaMetadata {
            duration: 12.5,
            width: 1280,
            height: 720,
            frame_rate: 30000.0 / 1001.0,
        }
    }

    #[test]
    fn test_defaults_cover_whole_input() {
        let plan = derive_defaults(&metadata());
        assert_eq!(plan.start, 0.0);
        assert_eq!(plan.end, 12.5);
        assert_eq!((plan.width, plan.height), (1280, 720));
        assert!((plan.fps - 29.97).abs() < 0.01);
        assert_eq!(plan.container, ContainerFormat::Mp4);
    }

    #[test]
    fn test_defaults_always_validate() {
        let samples = [
            (0.04, 1, 1, 1.0),
            (1.0, 64, 48, 8.0),
            (12.5, 1280, 720, 29.97),
            (3600.0, 3840, 2160, 60.0),
            (7.123456, 99, 101, 0.5),
        ];
        for (duration, width, height, frame_rate) in samples {
            let meta = MediaMetadata {
                duration,
                width,
                height,
                frame_rate,
            };
            let plan = derive_defaults(&meta);
            assert_eq!(validate(plan.clone(), &meta), Ok(plan));
        }
    }

    #[test]
    fn test_defaults_use_even_dimensions() {
        let meta = MediaMetadata {
            duration: 4.0,
            width: 1281,
            height: 101,
            frame_rate: 25.0,
        };
        let plan = derive_defaults(&meta);
        assert_eq!((plan.width, plan.height), (1280, 100));
        assert_eq!(validate(plan.clone(), &meta), Ok(plan));
    }

    #[test]
    fn test_slider_bounds() {
        let bounds = slider_bounds(&metadata());
        assert_eq!(bounds.time.max, 12.5);
        assert_eq!(bounds.width, Range { min: 100, max: 2560 });
        assert_eq!(bounds.height, Range { min: 100, max: 1440 });
        assert_eq!(bounds.fps.max, MAX_FRAME_RATE);
    }

    #[test]
    fn test_validate_rejects_start_after_end() {
        let plan = ClipPlan {
            start: 5.0,
            end: 4.0,
            ..derive_defaults(&metadata())
        };
        assert!(matches!(
            validate(plan, &metadata()),
            Err(ValidationError::StartAfterEnd { .. })
        ));
    }

    #[test]
    fn test_validate_end_against_duration() {
        let within = ClipPlan {
            end: 12.5 + DURATION_EPSILON / 2.0,
            ..derive_defaults(&metadata())
        };
        assert!(validate(within, &metadata()).is_ok());

        let beyond = ClipPlan {
            end: 13.0,
            ..derive_defaults(&metadata())
        };
        assert!(matches!(
            validate(beyond, &metadata()),
            Err(ValidationError::EndBeyondDuration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = derive_defaults(&metadata());

        let negative = ClipPlan { start: -0.5, ..base.clone() };
        assert!(matches!(
            validate(negative, &metadata()),
            Err(ValidationError::NegativeStart { .. })
        ));

        let narrow = ClipPlan { width: 99, ..base.clone() };
        assert!(matches!(
            validate(narrow, &metadata()),
            Err(ValidationError::DimensionTooSmall { dimension: "width", .. })
        ));

        let short = ClipPlan { height: 10, ..base.clone() };
        assert!(matches!(
            validate(short, &metadata()),
            Err(ValidationError::DimensionTooSmall { dimension: "height", .. })
        ));

        let still = ClipPlan { fps: 0.0, ..base.clone() };
        assert!(matches!(
            validate(still, &metadata()),
            Err(ValidationError::NonPositiveFrameRate { .. })
        ));

        let nan = ClipPlan { end: f64::NAN, ..base };
        assert!(matches!(
            validate(nan, &metadata()),
            Err(ValidationError::NotFinite { field: "end" })
        ));
    }

    #[test]
    fn test_transform_args() {
        let plan = ClipPlan {
            start: 1.5,
            end: 4.0,
            width: 640,
            height: 360,
            fps: 24.0,
            container: ContainerFormat::Mov,
        };
        let spec = build_transform_spec_to(&plan, "in.mp4", "/tmp/out/processed_video.mov");

        assert_eq!(
            spec.args(),
            vec![
                "-y", "-v", "error", "-ss", "1.500", "-to", "4.000", "-i", "in.mp4", "-vf",
                "scale=640:360,fps=24", "-c:v", "libx264", "-preset", "medium", "-crf", "23",
                "-c:a", "aac", "-threads", "0", "/tmp/out/processed_video.mov",
            ]
        );
    }

    #[test]
    fn test_transform_is_pure_apart_from_output() {
        let plan = ClipPlan {
            container: ContainerFormat::Mov,
            ..derive_defaults(&metadata())
        };
        let a = build_transform_spec(&plan, "clip.mp4");
        let b = build_transform_spec(&plan, "clip.mp4");

        assert_ne!(a.output_path(), b.output_path());
        assert_eq!(a.output_path().extension().unwrap(), "mov");
        assert_eq!(a.output_path().file_stem().unwrap(), OUTPUT_STEM);

        let (mut args_a, mut args_b) = (a.args(), b.args());
        args_a.pop();
        args_b.pop();
        assert_eq!(args_a, args_b);
    }
}
