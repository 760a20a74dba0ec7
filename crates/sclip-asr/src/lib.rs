//! Client for the asynchronous speech transcription service.
//!
//! This crate provides:
//! - Request signing (MD5 + HMAC-SHA1, base64)
//! - Binary upload with query-string metadata
//! - Cancellable status polling with an attempt cap
//! - Transcript assembly from the nested lattice payload

pub mod client;
pub mod config;
pub mod error;
pub mod signing;
pub mod sleeper;
pub mod transcript;
pub mod types;


pub use client::JobClient;
pub use config::{AsrConfig, PollPolicy};
pub use error::{AsrError, AsrResult};
pub use signing::{compute_signature, Credentials, SignedRequest};
pub use sleeper::{Sleeper, TokioSleeper};
pub use transcript::{assemble, assemble_content};
pub use types::{JobHandle, JobStatus, PollOutcome, UploadDescriptor};
