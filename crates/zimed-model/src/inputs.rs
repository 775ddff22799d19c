//! Input records submitted from the form screens.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::levels::{AssessmentType, GradeLevel, Subject, Term};

/// Default lesson length in minutes.
pub const DEFAULT_LESSON_MINUTES: u32 = 30;
/// Default number of flashcards or assessment questions.
pub const DEFAULT_ITEM_COUNT: u32 = 10;
/// Upper bound on flashcards or questions requested in one call.
pub const MAX_ITEM_COUNT: u32 = 50;
/// Default written-exam duration.
pub const DEFAULT_EXAM_DURATION: &str = "2 hours";

/// Clamp a requested card or question count into `1..=MAX_ITEM_COUNT`.
pub fn clamp_count(count: u32) -> u32 {
    count.clamp(1, MAX_ITEM_COUNT)
}

fn default_lesson_minutes() -> u32 {
    DEFAULT_LESSON_MINUTES
}

fn default_item_count() -> u32 {
    DEFAULT_ITEM_COUNT
}

fn default_exam_duration() -> String {
    DEFAULT_EXAM_DURATION.to_string()
}

/// Parameters for a six-subject scheme batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeInput {
    pub teacher_name: String,
    pub grade: GradeLevel,
    pub term: Term,
    pub year: i32,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonInput {
    pub teacher_name: String,
    pub grade: GradeLevel,
    pub subject: Subject,
    pub topic: String,
    /// Optional focus, e.g. remedial work or practical field work.
    #[serde(default)]
    pub context: String,
    pub date: NaiveDate,
    #[serde(default = "default_lesson_minutes")]
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardInput {
    pub grade: GradeLevel,
    pub subject: Subject,
    pub topic: String,
    #[serde(default = "default_item_count")]
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentInput {
    pub grade: GradeLevel,
    pub subject: Subject,
    pub topic: String,
    #[serde(rename = "type", default)]
    pub kind: AssessmentType,
    #[serde(default = "default_item_count")]
    pub question_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamInput {
    pub school_name: String,
    pub grade: GradeLevel,
    pub subject: Subject,
    pub term: Term,
    pub year: i32,
    #[serde(default = "default_exam_duration")]
    pub duration: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_count_bounds() {
        assert_eq!(clamp_count(0), 1);
        assert_eq!(clamp_count(12), 12);
        assert_eq!(clamp_count(500), MAX_ITEM_COUNT);
    }

    #[test]
    fn lesson_input_fills_serde_defaults() {
        let input: LessonInput = serde_json::from_str(
            r#"{
                "teacherName": "Mr. Mutero",
                "grade": "Grade 3",
                "subject": "Mathematics",
                "topic": "Long Division",
                "date": "2026-02-03"
            }"#,
        )
        .unwrap();
        assert_eq!(input.duration, DEFAULT_LESSON_MINUTES);
        assert!(input.context.is_empty());
    }

    #[test]
    fn assessment_input_defaults_to_mixed() {
        let input: AssessmentInput = serde_json::from_str(
            r#"{"grade": "grade-6", "subject": "english", "topic": "Verbs"}"#,
        )
        .unwrap();
        assert_eq!(input.kind, AssessmentType::Mixed);
        assert_eq!(input.question_count, DEFAULT_ITEM_COUNT);
        assert_eq!(input.grade, GradeLevel::Grade6);
    }
}
