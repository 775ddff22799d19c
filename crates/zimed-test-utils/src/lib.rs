//! Shared test utilities for zimed integration tests.
//!
//! Two doubles for the generation service:
//! - [`ScriptedBackend`]: an in-process [`GenerationBackend`] that replays a
//!   queue of canned replies and records every request.
//! - [`spawn_fake_gemini`]: an axum server on an ephemeral port that speaks
//!   enough of `generateContent` to exercise the real HTTP client.
//!
//! Canned response bodies live in [`fixtures`].

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};

use zimed_core::backend::{BackendError, GenerationBackend, GenerationRequest};

// ===========================================================================
// Scripted backend
// ===========================================================================

/// One canned reply from [`ScriptedBackend`].
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Status(u16),
}

impl Reply {
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text(body.into())
    }
}

/// In-memory backend that pops one reply per request.
///
/// When the queue runs dry every further request fails with
/// [`BackendError::Other`].
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Backend that answers every request with the same text, `n` times.
    pub fn repeating(body: &str, n: usize) -> Arc<Self> {
        Self::new(std::iter::repeat_n(Reply::text(body), n))
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock poisoned").len()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request.clone());
        let reply = self.replies.lock().expect("replies lock poisoned").pop_front();
        match reply {
            Some(Reply::Text(body)) => Ok(body),
            Some(Reply::Status(status)) => Err(BackendError::Status {
                status,
                body: "scripted failure".into(),
            }),
            None => Err(BackendError::Other("no scripted reply left".into())),
        }
    }
}

// ===========================================================================
// Fake Gemini server
// ===========================================================================

/// A request as seen by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct FakeState {
    replies: Mutex<VecDeque<FakeReply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// One canned response from the fake server.
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// 200 with the text wrapped in a `candidates` envelope.
    Text(String),
    /// 200 with a raw JSON body.
    Raw(Value),
    /// Non-2xx with a plain body.
    Status(u16, String),
}

/// Handle to a running fake server. The server stops when the test's
/// runtime shuts down.
pub struct FakeGemini {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeGemini {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().expect("calls lock poisoned").clone()
    }
}

async fn generate_content(
    State(state): State<Arc<FakeState>>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(model) = call.strip_suffix(":generateContent") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    state
        .calls
        .lock()
        .expect("calls lock poisoned")
        .push(RecordedCall {
            model: model.to_string(),
            api_key: headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });

    let reply = state.replies.lock().expect("replies lock poisoned").pop_front();
    match reply {
        Some(FakeReply::Text(text)) => Json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        }))
        .into_response(),
        Some(FakeReply::Raw(value)) => Json(value).into_response(),
        Some(FakeReply::Status(code, body)) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, body).into_response()
        }
        None => (StatusCode::SERVICE_UNAVAILABLE, "no reply scripted").into_response(),
    }
}

/// Start a fake `generateContent` server on `127.0.0.1` with an ephemeral
/// port. Replies are served in order.
pub async fn spawn_fake_gemini(replies: impl IntoIterator<Item = FakeReply>) -> FakeGemini {
    let state = Arc::new(FakeState {
        replies: Mutex::new(replies.into_iter().collect()),
        calls: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/v1beta/models/{call}", post(generate_content))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake gemini listener");
    let addr = listener.local_addr().expect("listener has no local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    FakeGemini {
        base_url: format!("http://{addr}"),
        state,
    }
}
