//! Command-line interface for sclip
//!
//! Provides argument parsing using clap derive macros.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use sclip_models::{ClipPlan, ContainerFormat};

/// Transcribe audio and cut clips with FFmpeg
#[derive(Parser, Debug)]
#[command(name = "sclip", version, about = "Transcribe audio and cut clips with FFmpeg")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe an audio file and print the text
    Transcribe {
        /// Audio file to upload
        file: PathBuf,
    },

    /// Print probed metadata, default clip plan and slider bounds as JSON
    Probe {
        /// Video file to inspect
        file: PathBuf,
    },

    /// Render a clip; unset parameters fall back to the probed defaults
    Clip(ClipArgs),
}

/// Clip parameters.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ClipArgs {
    /// Video file to cut
    pub file: PathBuf,

    /// Start time in seconds
    #[arg(long, value_name = "SECONDS")]
    pub start: Option<f64>,

    /// End time in seconds
    #[arg(long, value_name = "SECONDS")]
    pub end: Option<f64>,

    /// Output width in pixels
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Output height in pixels
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Output frame rate
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f64>,

    /// Output container (mp4, mov)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ContainerFormat>,

    /// Directory for rendered clips (overrides CLIP_WORK_DIR)
    #[arg(long, value_name = "PATH")]
    pub work_dir: Option<PathBuf>,
}

impl ClipArgs {
    /// Overlay the given flags on a default plan.
    pub fn plan_over(&self, defaults: ClipPlan) -> ClipPlan {
        ClipPlan {
            start: self.start.unwrap_or(defaults.start),
            end: self.end.unwrap_or(defaults.end),
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            fps: self.fps.unwrap_or(defaults.fps),
            container: self.format.unwrap_or(defaults.container),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> ClipPlan {
        ClipPlan {
            start: 0.0,
            end: 42.0,
            width: 1920,
            height: 1080,
            fps: 29.97,
            container: ContainerFormat::Mp4,
        }
    }

    #[test]
    fn test_parse_transcribe() {
        let cli = Cli::try_parse_from(["sclip", "transcribe", "talk.wav"]).unwrap();
        match cli.command {
            Commands::Transcribe { file } => assert_eq!(file, PathBuf::from("talk.wav")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_clip_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "sclip", "clip", "in.mp4", "--start", "2.5", "--end", "10", "--width", "640",
            "--format", "mov",
        ])
        .unwrap();
        let Commands::Clip(args) = cli.command else {
            panic!("expected clip command");
        };

        let plan = args.plan_over(defaults());
        assert_eq!(plan.start, 2.5);
        assert_eq!(plan.end, 10.0);
        assert_eq!(plan.width, 640);
        assert_eq!(plan.height, 1080);
        assert_eq!(plan.fps, 29.97);
        assert_eq!(plan.container, ContainerFormat::Mov);
    }

    #[test]
    fn test_clip_without_flags_keeps_defaults() {
        let cli = Cli::try_parse_from(["sclip", "clip", "in.mp4"]).unwrap();
        let Commands::Clip(args) = cli.command else {
            panic!("expected clip command");
        };
        assert_eq!(args.plan_over(defaults()), defaults());
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["sclip", "clip", "in.mp4", "--format", "avi"]).is_err());
    }
}
