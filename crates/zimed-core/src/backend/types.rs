use thiserror::Error;

use crate::prompt::ContentKind;

/// One generation request: "produce content of kind K for this prompt".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub kind: ContentKind,
    /// Model identifier, e.g. `gemini-3-flash-preview`.
    pub model: String,
    /// Fully rendered prompt text.
    pub prompt: String,
    /// Ask the service for `application/json` output.
    pub json_output: bool,
}

/// Failures talking to the generation service.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to generation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generation service returned an unreadable envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("generation service returned no content{}", blocked_suffix(.block_reason))]
    NoContent { block_reason: Option<String> },

    #[error("{0}")]
    Other(String),
}

fn blocked_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) => format!(" (blocked: {r})"),
        None => String::new(),
    }
}

/// Truncate a string to at most `max_bytes` bytes, appending "..." if
/// truncated.
pub(crate) fn truncate_snippet(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_owned();
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    let mut truncated = s[..end].to_owned();
    truncated.push_str("...");
    truncated
}
