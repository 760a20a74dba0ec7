//! Caller-facing operations.
//!
//! Each operation wraps one library call with structured logging and
//! coarse progress milestones. Errors are returned, never swallowed.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;
use tracing::Instrument;

use sclip_asr::{AsrConfig, JobClient, Sleeper, TokioSleeper};
use sclip_models::{ClipPlan, MediaMetadata, ProgressCallback, ProgressUpdate, SliderBounds};

use crate::config::ClipConfig;
use crate::error::{CliError, CliResult};
use crate::logging::OperationLogger;

/// Upload progress milestone.
const UPLOAD_FRACTION: f64 = 0.2;
/// Progress never passes this while the job is still processing.
const POLL_CEILING: f64 = 0.9;
/// Progress added per status check.
const POLL_STEP: f64 = 0.05;

/// Probed media together with its editable defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanDefaults {
    pub metadata: MediaMetadata,
    pub plan: ClipPlan,
    pub bounds: SliderBounds,
}

/// Transcribe an audio file.
///
/// A fresh client (and signature) is created for every call.
pub async fn transcribe(
    config: AsrConfig,
    path: impl AsRef<Path>,
    cancel_rx: Option<watch::Receiver<bool>>,
    progress: ProgressCallback,
) -> CliResult<String> {
    transcribe_with_sleeper(config, path, cancel_rx, progress, Arc::new(TokioSleeper)).await
}

pub(crate) async fn transcribe_with_sleeper(
    config: AsrConfig,
    path: impl AsRef<Path>,
    cancel_rx: Option<watch::Receiver<bool>>,
    progress: ProgressCallback,
    sleeper: Arc<dyn Sleeper>,
) -> CliResult<String> {
    let path = path.as_ref();
    let logger = OperationLogger::new("transcribe", path.display());
    logger.log_start("uploading audio");

    let progress = Arc::new(progress);
    let ticker = Arc::new(ProgressSleeper::new(sleeper, Arc::clone(&progress)));
    let client = JobClient::with_sleeper(config, ticker)?;

    report(&progress, &logger, UPLOAD_FRACTION, "Uploading audio");
    let result = client
        .transcribe(path, cancel_rx)
        .instrument(logger.create_span())
        .await;
    match result {
        Ok(text) => {
            report(&progress, &logger, 1.0, "Transcript ready");
            logger.log_completion(&format!("{} characters", text.chars().count()));
            Ok(text)
        }
        Err(e) => Err(failed(&logger, e.into())),
    }
}

/// Probe a video and derive its default clip plan and slider bounds.
pub async fn probe_and_plan_defaults(path: impl AsRef<Path>) -> CliResult<PlanDefaults> {
    let path = path.as_ref();
    let logger = OperationLogger::new("probe", path.display());
    logger.log_start("reading stream metadata");

    let metadata = match sclip_media::probe(path)
        .instrument(logger.create_span())
        .await
    {
        Ok(metadata) => metadata,
        Err(e) => return Err(failed(&logger, e.into())),
    };

    let plan = sclip_media::derive_defaults(&metadata);
    let bounds = sclip_media::slider_bounds(&metadata);
    logger.log_completion(&format!(
        "{:.2}s {}x{} @ {:.3}fps",
        metadata.duration, metadata.width, metadata.height, metadata.frame_rate
    ));

    Ok(PlanDefaults {
        metadata,
        plan,
        bounds,
    })
}

/// Render `plan` from the video at `path`.
///
/// The plan is re-checked against freshly probed metadata before FFmpeg
/// runs. Returns the path of the rendered clip.
pub async fn apply_plan(
    path: impl AsRef<Path>,
    plan: &ClipPlan,
    config: &ClipConfig,
    cancel_rx: Option<watch::Receiver<bool>>,
    progress: &ProgressCallback,
) -> CliResult<PathBuf> {
    let path = path.as_ref();
    let logger = OperationLogger::new("clip", path.display());
    logger.log_start(&format!(
        "{:.2}s-{:.2}s {}x{} @ {}fps -> {}",
        plan.start, plan.end, plan.width, plan.height, plan.fps, plan.container
    ));

    let options = config.clip_options(cancel_rx);
    let result = sclip_media::apply_plan(path, plan, &options, progress)
        .instrument(logger.create_span())
        .await;
    match result {
        Ok(output) => {
            logger.log_completion(&output.display().to_string());
            Ok(output)
        }
        Err(e) => Err(failed(&logger, e.into())),
    }
}

/// Log a failed operation; interruptions are warnings, not errors.
fn failed(logger: &OperationLogger, err: CliError) -> CliError {
    if err.is_cancelled() {
        logger.log_warning("cancelled");
        return err;
    }
    match err.diagnostics() {
        Some(stderr) => logger.log_error(&format!("{}: {}", err, stderr.trim_end())),
        None => logger.log_error(&err.to_string()),
    }
    err
}

fn report(progress: &ProgressCallback, logger: &OperationLogger, fraction: f64, message: &str) {
    logger.log_progress(fraction, message);
    progress(ProgressUpdate::new(fraction, message));
}

fn poll_fraction(checks: u32) -> f64 {
    (UPLOAD_FRACTION + POLL_STEP * f64::from(checks)).min(POLL_CEILING)
}

/// Reports a progress tick before each wait between status checks.
struct ProgressSleeper {
    inner: Arc<dyn Sleeper>,
    progress: Arc<ProgressCallback>,
    checks: AtomicU32,
}

impl ProgressSleeper {
    fn new(inner: Arc<dyn Sleeper>, progress: Arc<ProgressCallback>) -> Self {
        Self {
            inner,
            progress,
            checks: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl Sleeper for ProgressSleeper {
    async fn sleep(&self, duration: Duration) {
        let checks = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        (self.progress)(ProgressUpdate::new(
            poll_fraction(checks),
            format!("Waiting for transcript (check {})", checks),
        ));
        self.inner.sleep(duration).await;
    }
}
