//! Analysis request and the model client seam.
//!
//! Precondition for every dispatch: the request carries a file, or a
//! non-blank symptom text, or both. The orchestrator enforces it before
//! calling a client; clients do not re-check.

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use super::ingest::{MediaType, UploadedPayload};
use super::prompt::build_instruction;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// Network or service failure. Carries the service's own message.
    #[error("{0}")]
    Upstream(String),
}

/// Encoded file content tagged with its media type.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub data: String,
    pub media_type: MediaType,
}

/// One analyze action. Built fresh each time, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub file: Option<FilePart>,
    pub symptoms: String,
    pub instruction: String,
}

impl AnalysisRequest {
    pub fn new(payload: Option<&UploadedPayload>, symptoms: &str) -> Self {
        let file = payload.map(|p| FilePart {
            data: p.encoded().to_string(),
            media_type: p.media_type(),
        });
        let instruction = build_instruction(file.is_some(), symptoms);
        Self {
            file,
            symptoms: symptoms.to_string(),
            instruction,
        }
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// True when there is nothing to analyze.
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.symptoms.trim().is_empty()
    }
}

/// Generative model abstraction (allows mocking).
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send one request, return the model's raw text reply.
    async fn generate(&self, request: &AnalysisRequest) -> Result<String, DispatchError>;

    /// Model identifier, for logs and the health endpoint.
    fn model_name(&self) -> &str;
}

/// Mock model client for testing: returns a configured reply and records
/// every request it receives.
pub struct MockModelClient {
    reply: Result<String, DispatchError>,
    received: Mutex<Vec<AnalysisRequest>>,
}

impl MockModelClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(DispatchError::Upstream(message.to_string())),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.received.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn last_request(&self) -> Option<AnalysisRequest> {
        self.received.lock().ok().and_then(|r| r.last().cloned())
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, request: &AnalysisRequest) -> Result<String, DispatchError> {
        if let Ok(mut received) = self.received.lock() {
            received.push(request.clone());
        }
        self.reply.clone()
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
