//! Generated content records.
//!
//! Each record is built once per generation call and then only displayed or
//! exported. Mark totals are derived from the child questions and are never
//! taken from the generation service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::levels::{AssessmentType, GradeLevel, QuestionType, Subject, Term};

// ---------------------------------------------------------------------------
// Scheme of work
// ---------------------------------------------------------------------------

/// A term-long, week-by-week plan for one subject and grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeOfWork {
    pub subject: Subject,
    pub grade: GradeLevel,
    pub term: Term,
    pub year: i32,
    pub teacher_name: String,
    pub aims: Vec<String>,
    pub topics_covered: Vec<String>,
    pub cross_cutting_issues: Vec<String>,
    pub entries: Vec<SchemeEntry>,
}

/// One week row of a scheme of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemeEntry {
    pub week: u32,
    pub topic: String,
    pub objectives: Vec<String>,
    pub skills: Vec<String>,
    /// Sources of material.
    pub som: String,
    pub media: String,
    pub activities: Vec<String>,
    pub evaluation: String,
}

// ---------------------------------------------------------------------------
// Lesson plan
// ---------------------------------------------------------------------------

/// A single-session teaching plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    pub grade: GradeLevel,
    pub subject: Subject,
    pub topic: String,
    pub sub_topic: String,
    pub date: NaiveDate,
    /// Duration in minutes.
    pub duration: u32,
    pub teacher_name: String,
    pub objectives: Vec<String>,
    pub materials: Vec<String>,
    pub assumed_knowledge: String,
    pub lesson_steps: Vec<LessonStep>,
    pub evaluation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonStep {
    pub stage: String,
    pub time: String,
    pub teacher_activity: String,
    pub learner_activity: String,
    pub methods: String,
}

// ---------------------------------------------------------------------------
// Flashcards
// ---------------------------------------------------------------------------

/// First index used when numbering flashcards.
pub const FIRST_CARD_INDEX: usize = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardSet {
    pub topic: String,
    pub grade: GradeLevel,
    pub subject: Subject,
    pub cards: Vec<Flashcard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub front: String,
    pub back: String,
}

impl Flashcard {
    /// Identifier for the card at zero-based `position` within its set.
    pub fn id_for(position: usize) -> String {
        format!("card-{}", position + FIRST_CARD_INDEX)
    }
}

// ---------------------------------------------------------------------------
// Questions, assessments and exams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub section: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
    pub marks: u32,
}

/// Sum of the marks of `questions`, saturating at `u32::MAX`.
pub fn sum_marks(questions: &[Question]) -> u32 {
    questions
        .iter()
        .fold(0u32, |total, q| total.saturating_add(q.marks))
}

/// A topic test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub title: String,
    pub topic: String,
    pub grade: GradeLevel,
    pub subject: Subject,
    #[serde(rename = "type")]
    pub kind: AssessmentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub total_marks: u32,
}

impl Assessment {
    /// Reset `total_marks` to the sum of the question marks.
    pub fn recompute_total(&mut self) {
        self.total_marks = sum_marks(&self.questions);
    }

    /// Section labels in order of first appearance.
    pub fn sections(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for q in &self.questions {
            if !seen.contains(&q.section.as_str()) {
                seen.push(q.section.as_str());
            }
        }
        seen
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSection {
    pub title: String,
    pub instructions: String,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub section_marks: u32,
}

impl ExamSection {
    pub fn new(title: String, instructions: String, questions: Vec<Question>) -> Self {
        let section_marks = sum_marks(&questions);
        Self {
            title,
            instructions,
            questions,
            section_marks,
        }
    }
}

/// An end-of-term examination paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPaper {
    pub school_name: String,
    pub grade: GradeLevel,
    pub subject: Subject,
    pub term: Term,
    pub year: i32,
    pub duration: String,
    pub sections: Vec<ExamSection>,
    #[serde(default)]
    pub total_marks: u32,
}

impl ExamPaper {
    /// Recompute every section total and the paper total from the questions.
    pub fn recompute_totals(&mut self) {
        for section in &mut self.sections {
            section.section_marks = sum_marks(&section.questions);
        }
        self.total_marks = self
            .sections
            .iter()
            .fold(0u32, |total, s| total.saturating_add(s.section_marks));
    }

    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }
}
