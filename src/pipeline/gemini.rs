//! Gemini `generateContent` client.
//!
//! One POST per analysis. The instruction travels as a text part; the file,
//! when present, as an `inline_data` part tagged with its MIME type. No
//! retries, no streaming, reqwest's default timeouts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::dispatch::{AnalysisRequest, DispatchError, ModelClient};
use crate::config::{AnalyzerConfig, ApiKey};

/// Header carrying the credential.
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: ApiKey,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            base_url: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

// ──────────────────────────────────────────────
// Wire types
// ──────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'static str,
    data: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn request_body(request: &AnalysisRequest) -> GenerateRequest<'_> {
    let mut parts = vec![Part::Text {
        text: &request.instruction,
    }];
    if let Some(file) = &request.file {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: file.media_type.as_mime(),
                data: &file.data,
            },
        });
    }
    GenerateRequest {
        contents: [Content {
            role: "user",
            parts,
        }],
    }
}

/// Concatenated text of the first candidate, if any.
fn reply_text(response: GenerateResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    (!text.is_empty()).then_some(text)
}

/// The service's own error message, or the raw body when it is not the
/// documented error envelope.
fn service_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => format!("Model service returned {status}"),
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, request: &AnalysisRequest) -> Result<String, DispatchError> {
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| DispatchError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Model service returned an error");
            return Err(DispatchError::Upstream(service_message(status, &body)));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DispatchError::Upstream(e.to_string()))?;

        reply_text(parsed)
            .ok_or_else(|| DispatchError::Upstream("Model returned an empty response".into()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
