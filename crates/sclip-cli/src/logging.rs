//! Structured operation logging utilities.
//!
//! Provides subscriber setup for the binaries and consistent, structured
//! lifecycle events for each caller-facing operation.

use tracing::{error, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{CliError, CliResult};

/// Install the global tracing subscriber.
///
/// Human-readable output by default; `LOG_FORMAT=json` switches to JSON
/// lines. `RUST_LOG` directives are honoured on top of `sclip=info`.
pub fn init_tracing() -> CliResult<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive(
        "sclip=info"
            .parse()
            .map_err(|e| CliError::config_error(format!("invalid log directive: {}", e)))?,
    );

    let result = if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .try_init()
    };

    result.map_err(|e| CliError::config_error(format!("tracing already initialised: {}", e)))
}

/// Operation logger for structured logging with consistent formatting.
///
/// Every event carries the operation name and its subject (an input file
/// or a job order id).
#[derive(Debug, Clone)]
pub struct OperationLogger {
    operation: String,
    subject: String,
}

impl OperationLogger {
    pub fn new(operation: &str, subject: impl std::fmt::Display) -> Self {
        Self {
            operation: operation.to_string(),
            subject: subject.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            operation = %self.operation,
            subject = %self.subject,
            "Operation started: {}", message
        );
    }

    pub fn log_progress(&self, fraction: f64, message: &str) {
        info!(
            operation = %self.operation,
            subject = %self.subject,
            progress = fraction,
            "Operation progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            operation = %self.operation,
            subject = %self.subject,
            "Operation warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            operation = %self.operation,
            subject = %self.subject,
            "Operation failed: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            operation = %self.operation,
            subject = %self.subject,
            "Operation completed: {}", message
        );
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Create a tracing span for this operation.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "operation",
            operation = %self.operation,
            subject = %self.subject
        )
    }
}
