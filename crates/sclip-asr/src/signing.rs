//! Request signing.
//!
//! Every call carries `appId`, `ts` and `signa`, where
//! `signa = base64(HMAC-SHA1(secret, hex(MD5(appId + ts))))`.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha1::Sha1;

use crate::error::{AsrError, AsrResult};

type HmacSha1 = Hmac<Sha1>;

/// Application credentials issued by the transcription service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Timestamp and signature shared by every request of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    ts: i64,
    signature: String,
}

impl SignedRequest {
    /// Sign for an explicit timestamp.
    pub fn new(credentials: &Credentials, ts: i64) -> AsrResult<Self> {
        Ok(Self {
            ts,
            signature: compute_signature(credentials, ts)?,
        })
    }

    /// Sign for the current time.
    pub fn now(credentials: &Credentials) -> AsrResult<Self> {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        Self::new(credentials, ts)
    }

    pub fn ts(&self) -> i64 {
        self.ts
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }
}

/// Compute the `signa` value for `credentials` at `ts`.
pub fn compute_signature(credentials: &Credentials, ts: i64) -> AsrResult<String> {
    let digest = Md5::digest(format!("{}{}", credentials.app_id, ts).as_bytes());
    let digest_hex = format!("{:x}", digest);

    let mut mac = HmacSha1::new_from_slice(credentials.secret_key.as_bytes())
        .map_err(|e| AsrError::InvalidCredentials(format!("Invalid HMAC key: {}", e)))?;
    mac.update(digest_hex.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        let creds = Credentials::new("app", "secret");
        assert_eq!(compute_signature(&creds, 0).unwrap(), "ZCe/pRTFVDtK17r8cJ2raLtLP6E=");

        let creds = Credentials::new("demo-app", "demo-secret");
        assert_eq!(
            compute_signature(&creds, 1_700_000_000).unwrap(),
            "7ZKtq39c8qclwrJONfOLpiXjmUk="
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let creds = Credentials::new("demo-app", "demo-secret");
        let a = SignedRequest::new(&creds, 1_700_000_000).unwrap();
        let b = SignedRequest::new(&creds, 1_700_000_000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_each_input_changes_signature() {
        let base = compute_signature(&Credentials::new("demo-app", "demo-secret"), 1_700_000_000).unwrap();
        let variants = [
            compute_signature(&Credentials::new("demo-app2", "demo-secret"), 1_700_000_000).unwrap(),
            compute_signature(&Credentials::new("demo-app", "demo-secret2"), 1_700_000_000).unwrap(),
            compute_signature(&Credentials::new("demo-app", "demo-secret"), 1_700_000_001).unwrap(),
        ];
        for v in &variants {
            assert_ne!(v, &base);
        }
        assert_ne!(variants[0], variants[1]);
        assert_ne!(variants[1], variants[2]);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("demo-app", "demo-secret");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("demo-app"));
        assert!(!rendered.contains("demo-secret"));
    }
}
