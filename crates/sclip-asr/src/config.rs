//! Transcription client configuration.

use std::time::Duration;

use crate::error::{AsrError, AsrResult};
use crate::signing::Credentials;

/// Default service endpoint.
pub const DEFAULT_BASE_URL: &str = "https://raasr.xfyun.cn/v2/api";

/// Default delay between status checks. The status endpoint is rate limited.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default cap on status checks (one hour at the default interval).
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 720;

/// Result kinds requested from `getResult`.
pub const DEFAULT_RESULT_TYPE: &str = "transfer,predict";

/// Duration declared on upload; the client does not probe audio length.
pub const DEFAULT_DECLARED_DURATION: &str = "200";

/// How the client waits for a job to finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between status checks
    pub interval: Duration,
    /// Maximum status checks; `None` polls until a terminal status
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_attempts: Some(DEFAULT_POLL_MAX_ATTEMPTS),
        }
    }
}

/// Transcription client configuration.
#[derive(Debug, Clone)]
pub struct AsrConfig {
    /// Base URL; endpoints are `{base_url}/upload` and `{base_url}/getResult`
    pub base_url: String,
    /// Application credentials
    pub credentials: Credentials,
    /// Status polling policy
    pub poll: PollPolicy,
    /// `resultType` selector sent with status checks
    pub result_type: String,
    /// `duration` placeholder sent with uploads
    pub declared_duration: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl AsrConfig {
    /// Configuration with default endpoint and policy.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            poll: PollPolicy::default(),
            result_type: DEFAULT_RESULT_TYPE.to_string(),
            declared_duration: DEFAULT_DECLARED_DURATION.to_string(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> AsrResult<Self> {
        let app_id = required_env("ASR_APP_ID")?;
        let secret_key = required_env("ASR_SECRET_KEY")?;

        let mut config = Self::new(Credentials::new(app_id, secret_key));

        if let Ok(url) = std::env::var("ASR_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(result_type) = std::env::var("ASR_RESULT_TYPE") {
            config.result_type = result_type;
        }
        if let Ok(duration) = std::env::var("ASR_DECLARED_DURATION") {
            config.declared_duration = duration;
        }

        config.poll.interval = Duration::from_secs(
            parsed_env("ASR_POLL_INTERVAL_SECS").unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        );
        config.poll.max_attempts = match parsed_env::<u32>("ASR_POLL_MAX_ATTEMPTS") {
            Some(0) => None,
            Some(n) => Some(n),
            None => Some(DEFAULT_POLL_MAX_ATTEMPTS),
        };
        config.timeout = Duration::from_secs(parsed_env("ASR_TIMEOUT_SECS").unwrap_or(60));
        config.connect_timeout =
            Duration::from_secs(parsed_env("ASR_CONNECT_TIMEOUT_SECS").unwrap_or(10));

        Ok(config)
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the polling policy.
    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub(crate) fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }
}

fn required_env(name: &str) -> AsrResult<String> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(AsrError::config_error(format!("{} must be set", name))),
    }
}

fn parsed_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}
