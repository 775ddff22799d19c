//! Explicit-schema decoding of generation responses into typed records.
//!
//! The response text is parsed once into a wire struct whose every field is
//! optional. Absent or `null` fields take their default (empty list, empty
//! string, or a fallback computed from the input record); a field that is
//! present with the wrong JSON type is rejected rather than coerced. Mark
//! totals are always recomputed locally.

mod wire;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use zimed_model::{
    Assessment, AssessmentInput, ExamInput, ExamPaper, ExamSection, Flashcard, FlashcardInput,
    FlashcardSet, LessonInput, LessonPlan, LessonStep, Question, QuestionType, SchemeEntry,
    SchemeInput, SchemeOfWork, Subject,
};

use wire::{
    WireAssessment, WireExam, WireFlashcards, WireLesson, WireQuestion, WireScheme,
};

/// Marks credited to a question whose response omits `marks`.
pub const DEFAULT_QUESTION_MARKS: u32 = 1;

/// Errors from decoding a response body.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("response JSON is {found}, expected an object")]
    NotAnObject { found: &'static str },

    #[error("response JSON has an unexpected shape: {0}")]
    Shape(#[source] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Structural decode
// ---------------------------------------------------------------------------

/// Strip a surrounding Markdown code fence, if any.
fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line. A one-line
    // fence has no newline, so strip the info token up to the JSON itself.
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse response text into a wire struct.
///
/// Empty text decodes as `{}`, so every field takes its default.
fn decode_object<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    let body = strip_fence(text);
    let value: Value = if body.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(body).map_err(DecodeError::Syntax)?
    };
    if !value.is_object() {
        return Err(DecodeError::NotAnObject {
            found: json_kind(&value),
        });
    }
    serde_json::from_value(value).map_err(DecodeError::Shape)
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// Section letter for the zero-based section index: A, B, C, ...
fn section_letter(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    letter.to_string()
}

/// Convert a wire question, filling defaults.
///
/// `number` is the one-based running question number, used when the
/// response omits an id.
fn question(wire: WireQuestion, number: usize, default_section: &str) -> Question {
    let options = wire.options.unwrap_or_default();
    let kind = match wire.kind.as_deref() {
        Some(label) => QuestionType::from_label(label),
        None if !options.is_empty() => QuestionType::MultipleChoice,
        None => QuestionType::Other,
    };
    Question {
        id: wire
            .id
            .map(|id| id.into_string())
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| number.to_string()),
        section: wire
            .section
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default_section.to_string()),
        kind,
        prompt: wire.prompt.unwrap_or_default(),
        options,
        answer: wire.answer.unwrap_or_default(),
        marks: wire.marks.unwrap_or(DEFAULT_QUESTION_MARKS),
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Decode one subject's scheme of work.
pub fn decode_scheme(
    text: &str,
    input: &SchemeInput,
    subject: Subject,
) -> Result<SchemeOfWork, DecodeError> {
    let wire: WireScheme = decode_object(text)?;
    let entries = wire
        .entries
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, e)| SchemeEntry {
            week: e.week.unwrap_or(i as u32 + 1),
            topic: e.topic.unwrap_or_default(),
            objectives: e.objectives.unwrap_or_default(),
            skills: e.skills.unwrap_or_default(),
            som: e.som.unwrap_or_default(),
            media: e.media.unwrap_or_default(),
            activities: e.activities.unwrap_or_default(),
            evaluation: e.evaluation.unwrap_or_default(),
        })
        .collect();

    Ok(SchemeOfWork {
        subject,
        grade: input.grade,
        term: input.term,
        year: input.year,
        teacher_name: input.teacher_name.trim().to_string(),
        aims: wire.aims.unwrap_or_default(),
        topics_covered: wire.topics_covered.unwrap_or_default(),
        cross_cutting_issues: wire.cross_cutting_issues.unwrap_or_default(),
        entries,
    })
}

/// Decode a lesson plan. The sub-topic falls back to the requested topic.
pub fn decode_lesson(text: &str, input: &LessonInput) -> Result<LessonPlan, DecodeError> {
    let wire: WireLesson = decode_object(text)?;
    let topic = input.topic.trim().to_string();
    let lesson_steps = wire
        .lesson_steps
        .unwrap_or_default()
        .into_iter()
        .map(|s| LessonStep {
            stage: s.stage.unwrap_or_default(),
            time: s.time.unwrap_or_default(),
            teacher_activity: s.teacher_activity.unwrap_or_default(),
            learner_activity: s.learner_activity.unwrap_or_default(),
            methods: s.methods.unwrap_or_default(),
        })
        .collect();

    Ok(LessonPlan {
        grade: input.grade,
        subject: input.subject,
        sub_topic: wire
            .sub_topic
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| topic.clone()),
        topic,
        date: input.date,
        duration: input.duration,
        teacher_name: input.teacher_name.trim().to_string(),
        objectives: wire.objectives.unwrap_or_default(),
        materials: wire.materials.unwrap_or_default(),
        assumed_knowledge: wire.assumed_knowledge.unwrap_or_default(),
        lesson_steps,
        evaluation: wire.evaluation.unwrap_or_default(),
    })
}

/// Decode a flashcard set, numbering cards `card-1`, `card-2`, ...
pub fn decode_flashcards(text: &str, input: &FlashcardInput) -> Result<FlashcardSet, DecodeError> {
    let wire: WireFlashcards = decode_object(text)?;
    let cards = wire
        .cards
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, c)| Flashcard {
            id: Flashcard::id_for(i),
            front: c.front.unwrap_or_default(),
            back: c.back.unwrap_or_default(),
        })
        .collect();

    Ok(FlashcardSet {
        topic: input.topic.trim().to_string(),
        grade: input.grade,
        subject: input.subject,
        cards,
    })
}

/// Decode an assessment and recompute its total.
pub fn decode_assessment(text: &str, input: &AssessmentInput) -> Result<Assessment, DecodeError> {
    let wire: WireAssessment = decode_object(text)?;
    let topic = input.topic.trim().to_string();
    let questions = wire
        .questions
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, q)| question(q, i + 1, "A"))
        .collect();

    let mut assessment = Assessment {
        title: wire
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("{topic} Assessment")),
        topic,
        grade: input.grade,
        subject: input.subject,
        kind: input.kind,
        passage: wire.passage.filter(|p| !p.trim().is_empty()),
        questions,
        total_marks: 0,
    };
    assessment.recompute_total();
    Ok(assessment)
}

/// Decode an exam paper and recompute section and paper totals.
///
/// Any section or paper total present in the response is ignored.
pub fn decode_exam(text: &str, input: &ExamInput) -> Result<ExamPaper, DecodeError> {
    let wire: WireExam = decode_object(text)?;
    let mut number = 0usize;
    let sections = wire
        .sections
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let letter = section_letter(i);
            let questions = s
                .questions
                .unwrap_or_default()
                .into_iter()
                .map(|q| {
                    number += 1;
                    question(q, number, &letter)
                })
                .collect();
            ExamSection::new(
                s.title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| format!("Section {letter}")),
                s.instructions.unwrap_or_default(),
                questions,
            )
        })
        .collect();

    let mut paper = ExamPaper {
        school_name: input.school_name.trim().to_string(),
        grade: input.grade,
        subject: input.subject,
        term: input.term,
        year: input.year,
        duration: input.duration.trim().to_string(),
        sections,
        total_marks: 0,
    };
    paper.recompute_totals();
    Ok(paper)
}
