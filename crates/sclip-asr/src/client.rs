//! Signed job client for the transcription service.
//!
//! One client instance drives exactly one job: its timestamp and signature
//! are fixed at construction and reused for the upload and every status
//! check. Start a new client for each file.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::AsrConfig;
use crate::error::{AsrError, AsrResult};
use crate::signing::SignedRequest;
use crate::sleeper::{Sleeper, TokioSleeper};
use crate::transcript::assemble_content;
use crate::types::{
    JobHandle, JobStatus, PollOutcome, ResultContent, ServiceResponse, UploadContent,
    UploadDescriptor,
};

/// Client for one upload-then-poll transcription job.
pub struct JobClient {
    http: Client,
    config: AsrConfig,
    signed: SignedRequest,
    sleeper: Arc<dyn Sleeper>,
}

impl JobClient {
    /// Create a client signed for the current time.
    pub fn new(config: AsrConfig) -> AsrResult<Self> {
        Self::with_sleeper(config, Arc::new(TokioSleeper))
    }

    /// Create a client with a custom sleeper between status checks.
    pub fn with_sleeper(config: AsrConfig, sleeper: Arc<dyn Sleeper>) -> AsrResult<Self> {
        let signed = SignedRequest::now(&config.credentials)?;
        Self::with_signed_request(config, signed, sleeper)
    }

    /// Create a client from an already computed signature.
    pub fn with_signed_request(
        config: AsrConfig,
        signed: SignedRequest,
        sleeper: Arc<dyn Sleeper>,
    ) -> AsrResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("sclip-asr/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config,
            signed,
            sleeper,
        })
    }

    pub fn signed_request(&self) -> &SignedRequest {
        &self.signed
    }

    /// Upload, wait for completion and assemble the transcript.
    ///
    /// Consumes the client; a second file needs a fresh signature.
    pub async fn transcribe(
        self,
        path: impl AsRef<Path>,
        cancel_rx: Option<watch::Receiver<bool>>,
    ) -> AsrResult<String> {
        let handle = self.upload(path).await?;
        let outcome = self.poll_until_done(&handle, cancel_rx).await?;

        if !outcome.is_complete() {
            return Err(AsrError::JobFailed {
                order_id: handle.order_id().to_string(),
                status: outcome.status.code(),
                fail_type: outcome.fail_type(),
            });
        }

        let text = assemble_content(&outcome.content)?;
        info!(
            order_id = %handle,
            attempts = outcome.attempts,
            chars = text.chars().count(),
            "Transcript assembled"
        );
        Ok(text)
    }

    /// Upload a file and return the handle of the created job.
    pub async fn upload(&self, path: impl AsRef<Path>) -> AsrResult<JobHandle> {
        let path = path.as_ref();
        let (descriptor, data) = self.read_upload(path).await?;

        let mut query = self.auth_params();
        query.push(("fileSize", descriptor.file_size.to_string()));
        query.push(("fileName", descriptor.file_name.clone()));
        query.push(("duration", descriptor.duration.clone()));
        debug!(
            file_name = %descriptor.file_name,
            file_size = descriptor.file_size,
            ts = self.signed.ts(),
            "Uploading audio"
        );

        // The service expects this header even though the body is raw audio.
        let response = self
            .http
            .post(self.config.endpoint("upload"))
            .query(&query)
            .header(CONTENT_TYPE, "application/json")
            .body(data)
            .send()
            .await?;

        let content: UploadContent = read_envelope(response, "upload").await?.into_content()?;
        let order_id = content
            .order_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AsrError::protocol("upload response has no orderId"))?;

        info!(
            order_id = %order_id,
            file_name = %descriptor.file_name,
            estimate_ms = content.task_estimate_time.unwrap_or_default(),
            "Audio uploaded"
        );
        Ok(JobHandle::new(order_id))
    }

    /// Issue one status request.
    pub async fn query_status(&self, handle: &JobHandle) -> AsrResult<ResultContent> {
        let mut query = self.auth_params();
        query.push(("orderId", handle.order_id().to_string()));
        query.push(("resultType", self.config.result_type.clone()));

        let response = self
            .http
            .post(self.config.endpoint("getResult"))
            .query(&query)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        read_envelope(response, "getResult").await?.into_content()
    }

    /// Check the job until it leaves the processing state.
    ///
    /// Returns the first response whose status is not "processing"; no
    /// request is issued after that. A non-complete terminal status is
    /// returned as-is for the caller to inspect. The loop stops early on the
    /// attempt cap or when `cancel_rx` is raised; cancellation is only
    /// observed between requests.
    pub async fn poll_until_done(
        &self,
        handle: &JobHandle,
        mut cancel_rx: Option<watch::Receiver<bool>>,
    ) -> AsrResult<PollOutcome> {
        let mut attempts = 0u32;

        loop {
            if is_cancelled(&cancel_rx) {
                return Err(AsrError::Cancelled);
            }

            attempts += 1;
            let content = self.query_status(handle).await?;
            let status = content
                .order_info
                .as_ref()
                .map(|info| JobStatus::from(info.status))
                .ok_or_else(|| AsrError::protocol("getResult response has no orderInfo"))?;

            debug!(order_id = %handle, attempt = attempts, status = status.code(), "Job status");

            match status {
                JobStatus::Processing => {}
                JobStatus::Complete => {
                    return Ok(PollOutcome {
                        status,
                        content,
                        attempts,
                    })
                }
                JobStatus::Other(code) => {
                    warn!(order_id = %handle, status = code, "Job ended without a transcript");
                    return Ok(PollOutcome {
                        status,
                        content,
                        attempts,
                    });
                }
            }

            if let Some(max) = self.config.poll.max_attempts {
                if attempts >= max {
                    warn!(order_id = %handle, attempts, "Job still processing, giving up");
                    return Err(AsrError::PollTimeout { attempts });
                }
            }

            self.pause(&mut cancel_rx).await?;
        }
    }

    async fn pause(&self, cancel_rx: &mut Option<watch::Receiver<bool>>) -> AsrResult<()> {
        let interval = self.config.poll.interval;
        match cancel_rx {
            None => {
                self.sleeper.sleep(interval).await;
                Ok(())
            }
            Some(rx) => tokio::select! {
                _ = self.sleeper.sleep(interval) => Ok(()),
                _ = wait_cancelled(rx) => Err(AsrError::Cancelled),
            },
        }
    }

    async fn read_upload(&self, path: &Path) -> AsrResult<(UploadDescriptor, Vec<u8>)> {
        let data = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AsrError::FileNotFound(path.to_path_buf()),
            _ => AsrError::Io(e),
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AsrError::FileNotFound(path.to_path_buf()))?;

        let descriptor = UploadDescriptor {
            file_size: data.len() as u64,
            file_name,
            duration: self.config.declared_duration.clone(),
        };
        Ok((descriptor, data))
    }

    fn auth_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("appId", self.config.credentials.app_id.clone()),
            ("signa", self.signed.signature().to_string()),
            ("ts", self.signed.ts().to_string()),
        ]
    }
}

async fn read_envelope<T: DeserializeOwned>(
    response: Response,
    endpoint: &str,
) -> AsrResult<ServiceResponse<T>> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(AsrError::protocol(format!(
            "{} returned HTTP {}: {}",
            endpoint,
            status,
            String::from_utf8_lossy(&body)
        )));
    }

    serde_json::from_slice(&body)
        .map_err(|e| AsrError::protocol(format!("{} response could not be parsed: {}", endpoint, e)))
}

fn is_cancelled(cancel_rx: &Option<watch::Receiver<bool>>) -> bool {
    cancel_rx.as_ref().is_some_and(|rx| *rx.borrow())
}

async fn wait_cancelled(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return std::future::pending().await;
        }
    }
}
