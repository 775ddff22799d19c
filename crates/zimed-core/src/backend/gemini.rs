//! Google Gemini `generateContent` adapter.
//!
//! Sends the rendered prompt as a single user turn and asks for
//! `application/json` output. The response text is the concatenation of
//! the first candidate's text parts.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::trait_def::GenerationBackend;
use super::types::{BackendError, GenerationRequest, truncate_snippet};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Bytes of an error response body kept in [`BackendError::Status`].
const ERROR_BODY_LIMIT: usize = 512;

/// Connection settings for [`GeminiBackend`].
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Per-request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

// The API key must never reach logs.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

fn request_body(request: &GenerationRequest) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part {
                text: &request.prompt,
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: request.json_output.then_some("application/json"),
        },
    }
}

/// Pull the first candidate's text out of a response envelope.
fn extract_text(body: &str) -> Result<String, BackendError> {
    let envelope: GenerateContentResponse =
        serde_json::from_str(body).map_err(BackendError::Envelope)?;

    let text: String = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .concat()
        })
        .unwrap_or_default();

    if text.is_empty() {
        if let Some(reason) = envelope.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(BackendError::NoContent {
                block_reason: Some(reason),
            });
        }
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// [`GenerationBackend`] over the Gemini REST API.
pub struct GeminiBackend {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    pub fn new(config: GeminiConfig) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    /// Endpoint URL for `model`.
    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let url = self.endpoint(&request.model);
        tracing::debug!(
            kind = %request.kind,
            model = %request.model,
            prompt_bytes = request.prompt.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                kind = %request.kind,
                status = status.as_u16(),
                "generation service returned an error status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: truncate_snippet(&body, ERROR_BODY_LIMIT),
            });
        }

        let text = extract_text(&body)?;
        tracing::debug!(kind = %request.kind, response_bytes = text.len(), "received response");
        Ok(text)
    }
}
