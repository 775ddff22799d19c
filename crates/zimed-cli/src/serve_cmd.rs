use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use zimed_core::batch::{BATCH_ERROR_MESSAGE, BatchConfig, BatchOutcome, run_scheme_batch};
use zimed_core::export::{self, ExportError, ExportedPdf};
use zimed_core::generator::{GenerationError, Generator};
use zimed_core::syllabus;
use zimed_model::{Assessment, ExamPaper, FlashcardSet, GradeLevel, LessonPlan, SchemeOfWork, Subject};

use crate::config::ProfileSection;
use crate::forms::{
    AssessmentForm, ExamForm, FlashcardForm, Form, FormError, LessonForm, SchemeForm,
};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    /// The generation service failed. The cause is logged, the client sees
    /// the per-screen message.
    pub fn upstream(err: GenerationError) -> Self {
        tracing::error!(kind = %err.kind(), error = %err, "generation failed");
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.user_message().to_string(),
        }
    }

    pub fn export(err: ExportError) -> Self {
        match err {
            ExportError::Empty => Self::bad_request(err.to_string()),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: other.to_string(),
            },
        }
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub generator: Generator,
    pub batch: BatchConfig,
    pub profile: ProfileSection,
}

impl AppState {
    pub fn new(generator: Generator, profile: ProfileSection) -> Self {
        Self {
            generator,
            batch: BatchConfig::default(),
            profile,
        }
    }

    fn scheme_form(&self) -> SchemeForm {
        let mut form = SchemeForm::default();
        if let Some(name) = &self.profile.teacher_name {
            form.teacher_name = name.clone();
        }
        form
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/syllabus", get(get_syllabus))
        .route("/api/schemes", post(create_schemes))
        .route("/api/lessons", post(create_lesson))
        .route("/api/flashcards", post(create_flashcards))
        .route("/api/assessments", post(create_assessment))
        .route("/api/exams", post(create_exam))
        .route("/api/export/{kind}", post(export_record))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("zimed serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("zimed serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Apply a JSON object of form fields to `form` and validate it.
///
/// Strings, numbers and booleans are passed through as text; `null` leaves
/// the field at its default.
fn fill<F: Form>(mut form: F, fields: &Map<String, Value>) -> Result<F::Input, AppError> {
    for (name, value) in fields {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => {
                return Err(AppError::bad_request(format!(
                    "field {name} must be a string, number or boolean"
                )));
            }
        };
        form.set_field(name, &text)?;
    }
    Ok(form.submit()?)
}

fn pdf_response(pdf: ExportedPdf) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", pdf.file_name);
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf.bytes,
    )
        .into_response()
}

fn record<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::bad_request(format!("invalid record: {e}")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

#[derive(Debug, Deserialize)]
struct SyllabusQuery {
    grade: Option<String>,
    subject: Option<String>,
}

async fn get_syllabus(Query(query): Query<SyllabusQuery>) -> Result<Json<Value>, AppError> {
    let (Some(grade), Some(subject)) = (query.grade, query.subject) else {
        let all: Vec<Value> = syllabus::entries()
            .iter()
            .map(|e| {
                json!({
                    "subject": e.subject,
                    "grades": e.grades,
                    "learningArea": e.learning_area,
                    "topics": e.topics,
                })
            })
            .collect();
        return Ok(Json(Value::Array(all)));
    };

    let grade: GradeLevel = grade
        .parse()
        .map_err(|e| AppError::bad_request(format!("{e}")))?;
    let subject: Subject = subject
        .parse()
        .map_err(|e| AppError::bad_request(format!("{e}")))?;
    let entry = syllabus::lookup(grade, subject)
        .ok_or_else(|| AppError::not_found(format!("no syllabus entry for {grade} {subject}")))?;

    Ok(Json(json!({
        "subject": entry.subject,
        "grade": grade,
        "learningArea": entry.learning_area,
        "topics": entry.topics,
        "context": entry.render(grade),
    })))
}

async fn create_schemes(
    State(state): State<AppState>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Response, AppError> {
    let input = fill(state.scheme_form(), &fields)?;
    let outcome = run_scheme_batch(
        &state.generator,
        &input,
        &state.batch,
        None,
        CancellationToken::new(),
    )
    .await
    .map_err(|e| AppError::bad_request(e.to_string()))?;

    match outcome {
        BatchOutcome::Failed {
            completed,
            subject,
            error,
        } => {
            tracing::error!(subject = %subject, error = %error, "scheme batch failed");
            let body = json!({
                "error": BATCH_ERROR_MESSAGE,
                "subject": subject,
                "schemes": completed,
            });
            Ok((StatusCode::BAD_GATEWAY, Json(body)).into_response())
        }
        other => Ok(Json(json!({ "schemes": other.into_schemes() })).into_response()),
    }
}

async fn create_lesson(
    State(state): State<AppState>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<LessonPlan>, AppError> {
    let form = LessonForm::seeded_from(&state.scheme_form());
    let input = fill(form, &fields)?;
    let plan = state
        .generator
        .lesson(&input)
        .await
        .map_err(AppError::upstream)?;
    Ok(Json(plan))
}

async fn create_flashcards(
    State(state): State<AppState>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<FlashcardSet>, AppError> {
    let input = fill(FlashcardForm::default(), &fields)?;
    let set = state
        .generator
        .flashcards(&input)
        .await
        .map_err(AppError::upstream)?;
    Ok(Json(set))
}

async fn create_assessment(
    State(state): State<AppState>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Assessment>, AppError> {
    let input = fill(AssessmentForm::default(), &fields)?;
    let assessment = state
        .generator
        .assessment(&input)
        .await
        .map_err(AppError::upstream)?;
    Ok(Json(assessment))
}

async fn create_exam(
    State(state): State<AppState>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<ExamPaper>, AppError> {
    let mut form = ExamForm::default();
    if let Some(school) = &state.profile.school_name {
        form.school_name = school.clone();
    }
    let input = fill(form, &fields)?;
    let exam = state
        .generator
        .exam(&input)
        .await
        .map_err(AppError::upstream)?;
    Ok(Json(exam))
}

/// Render a previously generated record as a PDF download.
///
/// `schemes` takes either a single scheme or an array of them.
async fn export_record(Path(kind): Path<String>, Json(body): Json<Value>) -> Result<Response, AppError> {
    let pdf = match kind.as_str() {
        "schemes" | "scheme" => {
            let schemes: Vec<SchemeOfWork> = match body {
                Value::Array(_) => record(body)?,
                single => vec![record(single)?],
            };
            export::export_schemes(&schemes)
        }
        "lessons" | "lesson" => export::export_lesson(&record::<LessonPlan>(body)?),
        "flashcards" => export::export_flashcards(&record::<FlashcardSet>(body)?),
        "assessments" | "assessment" => export::export_assessment(&record::<Assessment>(body)?),
        "exams" | "exam" => export::export_exam(&record::<ExamPaper>(body)?),
        other => return Err(AppError::not_found(format!("unknown export kind: {other}"))),
    };
    let pdf = pdf.map_err(AppError::export)?;
    tracing::info!(file = %pdf.file_name, bytes = pdf.bytes.len(), "exported PDF");
    Ok(pdf_response(pdf))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use zimed_core::batch::BatchConfig;
    use zimed_core::generator::Generator;
    use zimed_test_utils::fixtures::{ASSESSMENT_JSON, EXAM_JSON, LESSON_JSON, SCHEME_JSON};
    use zimed_test_utils::{Reply, ScriptedBackend};

    use super::AppState;
    use crate::config::ProfileSection;

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    fn state(backend: Arc<ScriptedBackend>) -> AppState {
        let mut state = AppState::new(
            Generator::new(backend, "test-model"),
            ProfileSection {
                teacher_name: Some("Mrs. Moyo".into()),
                school_name: Some("Chipo Primary".into()),
            },
        );
        state.batch = BatchConfig {
            delay: Duration::ZERO,
        };
        state
    }

    async fn get(state: AppState, uri: &str) -> axum::response::Response {
        let app = super::build_router(state);
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_json(state: AppState, uri: &str, body: Value) -> axum::response::Response {
        let app = super::build_router(state);
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_index_returns_html() {
        let resp = get(state(ScriptedBackend::new([])), "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp
            .headers()
            .get("content-type")
            .expect("should have content-type header")
            .to_str()
            .unwrap();
        assert!(
            content_type.contains("text/html"),
            "content-type should contain text/html, got: {content_type}"
        );
    }

    #[tokio::test]
    async fn test_syllabus_lookup() {
        let resp = get(
            state(ScriptedBackend::new([])),
            "/api/syllabus?grade=Grade%203&subject=Mathematics",
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert!(json["context"].as_str().unwrap().contains("Syllabus topics"));
        assert!(!json["topics"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_syllabus_rejects_unknown_grade() {
        let resp = get(
            state(ScriptedBackend::new([])),
            "/api/syllabus?grade=Grade%2012&subject=Mathematics",
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_schemes_returns_six_in_order() {
        let backend = ScriptedBackend::repeating(SCHEME_JSON, 6);
        let resp = post_json(
            state(backend.clone()),
            "/api/schemes",
            json!({ "grade": "Grade 3", "term": "Term 1", "year": 2025 }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let schemes = json["schemes"].as_array().unwrap();
        assert_eq!(schemes.len(), 6);
        assert_eq!(schemes[0]["teacherName"], "Mrs. Moyo");
        assert_eq!(backend.request_count(), 6);
    }

    #[tokio::test]
    async fn test_schemes_failure_keeps_completed() {
        let backend = ScriptedBackend::new([
            Reply::text(SCHEME_JSON),
            Reply::text(SCHEME_JSON),
            Reply::Status(500),
        ]);
        let resp = post_json(
            state(backend.clone()),
            "/api/schemes",
            json!({ "teacherName": "Mr. Dube" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(resp).await;
        assert_eq!(
            json["error"],
            "An error occurred. Please try again or check your connection."
        );
        assert_eq!(json["schemes"].as_array().unwrap().len(), 2);
        assert_eq!(backend.request_count(), 3);
    }

    #[tokio::test]
    async fn test_lesson_requires_topic() {
        let backend = ScriptedBackend::new([]);
        let resp = post_json(state(backend.clone()), "/api/lessons", json!({ "topic": "  " })).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Please fill in the Topic and Teacher Name.");
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_lesson_generates_with_profile_teacher() {
        let backend = ScriptedBackend::new([Reply::text(LESSON_JSON)]);
        let resp = post_json(
            state(backend),
            "/api/lessons",
            json!({ "topic": "Nouns", "subject": "English", "duration": 40, "context": null }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["teacherName"], "Mrs. Moyo");
        assert_eq!(json["duration"], 40);
        assert_eq!(json["lessonSteps"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_field_is_rejected() {
        let resp = post_json(
            state(ScriptedBackend::new([])),
            "/api/flashcards",
            json!({ "topic": "Plants", "colour": "red" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_assessment_upstream_failure_is_502() {
        let resp = post_json(
            state(ScriptedBackend::new([Reply::Status(503)])),
            "/api/assessments",
            json!({ "topic": "Fractions" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(resp).await;
        assert_eq!(
            json["error"],
            "Failed to generate assessment. Please try again."
        );
    }

    #[tokio::test]
    async fn test_assessment_total_is_recomputed() {
        let resp = post_json(
            state(ScriptedBackend::new([Reply::text(ASSESSMENT_JSON)])),
            "/api/assessments",
            json!({ "topic": "Fractions", "questionCount": 3 }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["totalMarks"], 4);
    }

    #[tokio::test]
    async fn test_exam_then_export() {
        let st = state(ScriptedBackend::new([Reply::text(EXAM_JSON)]));
        let resp = post_json(
            st.clone(),
            "/api/exams",
            json!({ "subject": "Social Science" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let exam = body_json(resp).await;
        assert_eq!(exam["schoolName"], "Chipo Primary");

        let resp = post_json(st, "/api/export/exams", exam).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers["content-type"], "application/pdf");
        assert_eq!(
            headers["content-disposition"],
            "attachment; filename=\"Social_Science_Exam.pdf\""
        );
        let bytes = axum::body::to_bytes(resp.into_body(), 10_485_760)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_export_assessment_with_stale_total() {
        let record = json!({
            "title": "Fractions Assessment",
            "topic": "Fractions",
            "grade": "Grade 4",
            "subject": "Mathematics",
            "type": "Structured",
            "passage": null,
            "questions": [{
                "id": "1",
                "section": "A",
                "type": "structured",
                "prompt": "Add 1/2 and 1/4",
                "options": [],
                "answer": "3/4",
                "marks": 2
            }],
            "totalMarks": 99
        });
        let parsed: zimed_model::Assessment = serde_json::from_value(record.clone()).unwrap();
        let text = zimed_core::export::documents::assessment_document(&parsed).text();
        assert!(!text.contains("99 marks"));

        let resp = post_json(state(ScriptedBackend::new([])), "/api/export/assessments", record).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["content-disposition"],
            "attachment; filename=\"Fractions_Assessment.pdf\""
        );
    }

    #[tokio::test]
    async fn test_export_empty_schemes_is_400() {
        let resp = post_json(
            state(ScriptedBackend::new([])),
            "/api/export/schemes",
            json!([]),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_unknown_kind_is_404() {
        let resp = post_json(
            state(ScriptedBackend::new([])),
            "/api/export/posters",
            json!({}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
