//! Caller-facing operations and command-line plumbing for ScribeClip.
//!
//! Wires the transcription client and the clip planner behind three
//! operations: `transcribe`, `probe_and_plan_defaults` and `apply_plan`.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod ops;

pub use config::ClipConfig;
pub use error::{CliError, CliResult};
pub use logging::{init_tracing, OperationLogger};
pub use ops::{apply_plan, probe_and_plan_defaults, transcribe, PlanDefaults};
