//! Generation service: one operation per content kind.
//!
//! Each operation builds the prompt from the input record and the syllabus
//! table, issues exactly one backend request, and decodes the response into
//! a typed record. Nothing is retried.

use std::sync::Arc;

use thiserror::Error;

use zimed_model::{
    Assessment, AssessmentInput, ExamInput, ExamPaper, FlashcardInput, FlashcardSet,
    LessonInput, LessonPlan, SchemeInput, SchemeOfWork, Subject,
};

use crate::backend::{BackendError, GenerationBackend, GenerationRequest};
use crate::decode::{self, DecodeError};
use crate::prompt::{self, ContentKind, PromptParts};
use crate::syllabus;

/// Failure of one generation call.
///
/// Both variants map to the same user-facing message; the distinction only
/// reaches logs.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{kind} request failed: {source}")]
    Backend {
        kind: ContentKind,
        #[source]
        source: BackendError,
    },

    #[error("{kind} response could not be decoded: {source}")]
    Decode {
        kind: ContentKind,
        #[source]
        source: DecodeError,
    },
}

impl GenerationError {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Backend { kind, .. } | Self::Decode { kind, .. } => *kind,
        }
    }

    /// Generic message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        user_message(self.kind())
    }
}

/// Generic failure message for a content kind.
pub fn user_message(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Scheme => "An error occurred. Please try again or check your connection.",
        ContentKind::Lesson => "Failed to generate lesson plan. Please try again.",
        ContentKind::Flashcards => "Failed to generate flashcards. Please try again.",
        ContentKind::Assessment => "Failed to generate assessment. Please try again.",
        ContentKind::Exam => "Failed to generate exam paper. Please try again.",
    }
}

/// Generation service bound to one backend and model.
#[derive(Clone)]
pub struct Generator {
    backend: Arc<dyn GenerationBackend>,
    model: String,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("backend", &self.backend.name())
            .field("model", &self.model)
            .finish()
    }
}

impl Generator {
    pub fn new(backend: Arc<dyn GenerationBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a prompt and return the raw response text.
    async fn request(&self, parts: &PromptParts) -> Result<String, GenerationError> {
        let request = GenerationRequest {
            kind: parts.kind,
            model: self.model.clone(),
            prompt: parts.render(),
            json_output: true,
        };
        self.backend.generate(&request).await.map_err(|source| {
            tracing::warn!(kind = %parts.kind, error = %source, "generation request failed");
            GenerationError::Backend {
                kind: parts.kind,
                source,
            }
        })
    }

    fn decode_failed(kind: ContentKind, source: DecodeError) -> GenerationError {
        tracing::warn!(kind = %kind, error = %source, "generation response rejected");
        GenerationError::Decode { kind, source }
    }

    /// Generate one subject's scheme of work.
    pub async fn scheme(
        &self,
        input: &SchemeInput,
        subject: Subject,
    ) -> Result<SchemeOfWork, GenerationError> {
        let context = syllabus::context_for(input.grade, subject);
        let parts = prompt::scheme_prompt(input, subject, &context);
        let text = self.request(&parts).await?;
        let scheme = decode::decode_scheme(&text, input, subject)
            .map_err(|e| Self::decode_failed(ContentKind::Scheme, e))?;
        tracing::info!(
            subject = %subject,
            grade = %input.grade,
            weeks = scheme.entries.len(),
            "generated scheme of work"
        );
        Ok(scheme)
    }

    pub async fn lesson(&self, input: &LessonInput) -> Result<LessonPlan, GenerationError> {
        let context = syllabus::context_for(input.grade, input.subject);
        let parts = prompt::lesson_prompt(input, &context);
        let text = self.request(&parts).await?;
        let plan = decode::decode_lesson(&text, input)
            .map_err(|e| Self::decode_failed(ContentKind::Lesson, e))?;
        tracing::info!(
            subject = %input.subject,
            grade = %input.grade,
            steps = plan.lesson_steps.len(),
            "generated lesson plan"
        );
        Ok(plan)
    }

    pub async fn flashcards(&self, input: &FlashcardInput) -> Result<FlashcardSet, GenerationError> {
        let context = syllabus::context_for(input.grade, input.subject);
        let parts = prompt::flashcard_prompt(input, &context);
        let text = self.request(&parts).await?;
        let set = decode::decode_flashcards(&text, input)
            .map_err(|e| Self::decode_failed(ContentKind::Flashcards, e))?;
        tracing::info!(topic = %set.topic, cards = set.cards.len(), "generated flashcards");
        Ok(set)
    }

    pub async fn assessment(&self, input: &AssessmentInput) -> Result<Assessment, GenerationError> {
        let context = syllabus::context_for(input.grade, input.subject);
        let parts = prompt::assessment_prompt(input, &context);
        let text = self.request(&parts).await?;
        let assessment = decode::decode_assessment(&text, input)
            .map_err(|e| Self::decode_failed(ContentKind::Assessment, e))?;
        tracing::info!(
            topic = %assessment.topic,
            kind = %assessment.kind,
            questions = assessment.questions.len(),
            total_marks = assessment.total_marks,
            "generated assessment"
        );
        Ok(assessment)
    }

    /// Generate an end-of-term exam paper.
    pub async fn exam(&self, input: &ExamInput) -> Result<ExamPaper, GenerationError> {
        let context = syllabus::context_for(input.grade, input.subject);
        let parts = prompt::exam_prompt(input, &context);
        let text = self.request(&parts).await?;
        let paper = decode::decode_exam(&text, input)
            .map_err(|e| Self::decode_failed(ContentKind::Exam, e))?;
        tracing::info!(
            subject = %paper.subject,
            sections = paper.sections.len(),
            total_marks = paper.total_marks,
            "generated exam paper"
        );
        Ok(paper)
    }
}
