//! Wire types for the transcription service.

use std::fmt;

use serde::Deserialize;

use crate::error::{AsrError, AsrResult};

/// `code` value of a successful response.
pub const SUCCESS_CODE: &str = "000000";

/// Envelope shared by every endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse<T> {
    pub code: String,
    #[serde(default)]
    pub desc_info: Option<String>,
    pub content: Option<T>,
}

impl<T> ServiceResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Unwrap the content, turning a non-success code into a service error.
    pub fn into_content(self) -> AsrResult<T> {
        if !self.is_success() {
            return Err(AsrError::service(
                self.code,
                self.desc_info.unwrap_or_default(),
            ));
        }
        self.content
            .ok_or_else(|| AsrError::protocol("successful response has no content"))
    }
}

/// `content` of an upload response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadContent {
    pub order_id: Option<String>,
    #[serde(default)]
    pub task_estimate_time: Option<i64>,
}

/// `content` of a status query response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultContent {
    pub order_info: Option<OrderInfo>,
    /// JSON-encoded transcript, present once the job is complete
    #[serde(default)]
    pub order_result: Option<String>,
    #[serde(default)]
    pub task_estimate_time: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInfo {
    #[serde(default)]
    pub order_id: Option<String>,
    pub status: i64,
    #[serde(default)]
    pub fail_type: Option<i64>,
    #[serde(default)]
    pub original_duration: Option<i64>,
    #[serde(default)]
    pub real_duration: Option<i64>,
}

/// Job state as reported in `orderInfo.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Still being transcribed (3)
    Processing,
    /// Transcript ready (4)
    Complete,
    /// Any other value: terminal, unsuccessful
    Other(i64),
}

impl From<i64> for JobStatus {
    fn from(value: i64) -> Self {
        match value {
            3 => JobStatus::Processing,
            4 => JobStatus::Complete,
            n => JobStatus::Other(n),
        }
    }
}

impl JobStatus {
    pub fn code(&self) -> i64 {
        match self {
            JobStatus::Processing => 3,
            JobStatus::Complete => 4,
            JobStatus::Other(n) => *n,
        }
    }
}

/// Handle to one submitted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    order_id: String,
}

impl JobHandle {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.order_id)
    }
}

/// File facts sent with an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDescriptor {
    pub file_size: u64,
    /// Base name only, never the full path
    pub file_name: String,
    pub duration: String,
}

/// Result of a finished poll loop.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub status: JobStatus,
    pub content: ResultContent,
    /// Status requests issued, including the final one
    pub attempts: u32,
}

impl PollOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == JobStatus::Complete
    }

    pub fn fail_type(&self) -> Option<i64> {
        self.content.order_info.as_ref().and_then(|i| i.fail_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(JobStatus::from(3), JobStatus::Processing);
        assert_eq!(JobStatus::from(4), JobStatus::Complete);
        assert_eq!(JobStatus::from(-1), JobStatus::Other(-1));
        assert_eq!(JobStatus::Other(-1).code(), -1);
    }

    #[test]
    fn test_into_content_surfaces_service_error() {
        let resp: ServiceResponse<UploadContent> = serde_json::from_str(
            r#"{"code":"26600","descInfo":"appid invalid","content":null}"#,
        )
        .unwrap();
        match resp.into_content() {
            Err(AsrError::Service { code, description }) => {
                assert_eq!(code, "26600");
                assert_eq!(description, "appid invalid");
            }
            other => panic!("expected service error, got {:?}", other),
        }
    }

    fn parse_envelope<T: serde::de::DeserializeOwned>(raw: &str) -> ServiceResponse<T> {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_envelope_parses_for_any_content_type() {
        let resp: ServiceResponse<ResultContent> =
            parse_envelope(r#"{"code":"000000","descInfo":"success"}"#);
        assert!(resp.content.is_none());

        let resp: ServiceResponse<UploadContent> =
            parse_envelope(r#"{"code":"000000","content":{"orderId":"DKHJ"}}"#);
        assert_eq!(resp.into_content().unwrap().order_id.as_deref(), Some("DKHJ"));
    }

    #[test]
    fn test_into_content_requires_content() {
        let resp: ServiceResponse<UploadContent> =
            serde_json::from_str(r#"{"code":"000000","descInfo":"success"}"#).unwrap();
        assert!(matches!(resp.into_content(), Err(AsrError::Protocol(_))));
    }

    #[test]
    fn test_result_content_parses() {
        let resp: ServiceResponse<ResultContent> = serde_json::from_str(
            r#"{"code":"000000","descInfo":"success","content":{
                "orderInfo":{"orderId":"DKHJQ2022","status":-1,"failType":6,"originalDuration":200},
                "orderResult":"","taskEstimateTime":0}}"#,
        )
        .unwrap();
        let content = resp.into_content().unwrap();
        let info = content.order_info.unwrap();
        assert_eq!(info.status, -1);
        assert_eq!(info.fail_type, Some(6));
    }
}
