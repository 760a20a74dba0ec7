//! Clip rendering.
//!
//! `apply_plan` is the single entry point: probe the input, check the plan
//! against it, lay out the FFmpeg invocation and run it.

use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::{info, warn};

use sclip_models::{ClipPlan, ProgressCallback, ProgressUpdate};

use crate::command::FfmpegRunner;
use crate::error::{MediaError, MediaResult};
use crate::planner::{build_transform_spec_in, validate, TransformSpec};
use crate::probe::probe;

/// Where and how clips are rendered.
#[derive(Debug, Clone)]
pub struct ClipOptions {
    /// Parent directory for per-run output directories
    pub work_dir: PathBuf,
    /// Kill FFmpeg after this many seconds
    pub timeout_secs: Option<u64>,
    /// Cancellation signal
    pub cancel_rx: Option<watch::Receiver<bool>>,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir(),
            timeout_secs: None,
            cancel_rx: None,
        }
    }
}

impl ClipOptions {
    fn runner(&self) -> FfmpegRunner {
        let mut runner = FfmpegRunner::new();
        if let Some(secs) = self.timeout_secs {
            runner = runner.with_timeout(secs);
        }
        if let Some(rx) = &self.cancel_rx {
            runner = runner.with_cancel(rx.clone());
        }
        runner
    }
}

/// Render `plan` from `input`, returning the path of the new clip.
///
/// The output lives in a fresh directory under `options.work_dir`. On any
/// failure that directory is removed so no partial clip is left behind.
pub async fn apply_plan(
    input: impl AsRef<Path>,
    plan: &ClipPlan,
    options: &ClipOptions,
    progress: &ProgressCallback,
) -> MediaResult<PathBuf> {
    let input = input.as_ref();

    progress(ProgressUpdate::new(0.1, "Probing input"));
    let metadata = probe(input).await?;
    let plan = validate(plan.clone(), &metadata)?;

    let spec = build_transform_spec_in(&plan, input, &options.work_dir);
    let output = spec.output_path().to_path_buf();
    let output_dir = output
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| MediaError::external_tool("output path has no parent directory", None, None))?;

    info!(
        "Rendering clip: {} -> {} ({:.2}s-{:.2}s, {}x{} @ {}fps)",
        input.display(),
        output.display(),
        plan.start,
        plan.end,
        plan.width,
        plan.height,
        plan.fps
    );

    tokio::fs::create_dir_all(&output_dir).await?;
    progress(ProgressUpdate::new(0.3, "Encoding"));

    if let Err(e) = run_and_check(options, &spec, &output).await {
        warn!("Clip rendering failed: {}", e);
        if let Err(cleanup) = tokio::fs::remove_dir_all(&output_dir).await {
            warn!("Failed to remove {}: {}", output_dir.display(), cleanup);
        }
        return Err(e);
    }

    progress(ProgressUpdate::new(1.0, "Done"));
    info!("Clip rendered: {}", output.display());
    Ok(output)
}

async fn run_and_check(
    options: &ClipOptions,
    spec: &TransformSpec,
    output: &Path,
) -> MediaResult<()> {
    let stderr = options.runner().run(spec.command()).await?;

    match tokio::fs::metadata(output).await {
        Ok(meta) if meta.len() > 0 => Ok(()),
        _ => Err(MediaError::external_tool(
            format!("FFmpeg exited successfully but wrote no output to {}", output.display()),
            Some(stderr),
            Some(0),
        )),
    }
}
