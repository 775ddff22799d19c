//! `zimed lesson | flashcards | assessment | exam`: one generation call,
//! a text preview, and an optional PDF.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use zimed_core::export::{self, ExportedPdf};
use zimed_core::generator::{GenerationError, Generator};
use zimed_model::{AssessmentType, GradeLevel, Subject, Term};

use crate::config::ProfileSection;
use crate::forms::{AssessmentForm, ExamForm, FlashcardForm, Form, LessonForm, SchemeForm};
use crate::preview;

/// Print a generation failure the way the UI shows it, keeping the cause in
/// the log.
fn report(err: GenerationError) -> anyhow::Error {
    tracing::error!(kind = %err.kind(), error = %err, "generation failed");
    anyhow::anyhow!(err.user_message())
}

pub(crate) fn save(out: Option<&Path>, pdf: Result<ExportedPdf, export::ExportError>) -> Result<()> {
    let Some(dir) = out else {
        return Ok(());
    };
    let pdf = pdf.context("failed to render PDF")?;
    let path = export::write_pdf(dir, &pdf).context("failed to save PDF")?;
    println!("Saved {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Lesson
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct LessonArgs {
    pub teacher: Option<String>,
    pub grade: Option<GradeLevel>,
    pub subject: Option<Subject>,
    pub topic: String,
    pub context: Option<String>,
    pub date: Option<NaiveDate>,
    pub duration: Option<u32>,
}

/// Build the lesson form, seeding the teacher from the scheme screen
/// defaults when no name is given.
pub fn lesson_form(args: LessonArgs, profile: &ProfileSection) -> LessonForm {
    let mut scheme = SchemeForm::default();
    if let Some(name) = &profile.teacher_name {
        scheme.teacher_name = name.clone();
    }
    let mut form = LessonForm::seeded_from(&scheme);
    if let Some(teacher) = args.teacher {
        form.teacher_name = teacher;
    }
    if let Some(grade) = args.grade {
        form.grade = grade;
    }
    if let Some(subject) = args.subject {
        form.subject = subject;
    }
    form.topic = args.topic;
    if let Some(context) = args.context {
        form.context = context;
    }
    if let Some(date) = args.date {
        form.date = date;
    }
    if let Some(duration) = args.duration {
        form.duration = duration;
    }
    form
}

pub async fn run_lesson(
    generator: &Generator,
    mut form: LessonForm,
    out: Option<&Path>,
) -> Result<()> {
    let input = form.submit()?;
    let plan = generator.lesson(&input).await.map_err(report)?;
    form.finish();
    print!("{}", preview::lesson(&plan));
    save(out, export::export_lesson(&plan))
}

// ---------------------------------------------------------------------------
// Flashcards
// ---------------------------------------------------------------------------

pub fn flashcard_form(
    grade: Option<GradeLevel>,
    subject: Option<Subject>,
    topic: String,
    count: Option<u32>,
) -> FlashcardForm {
    let mut form = FlashcardForm::default();
    if let Some(grade) = grade {
        form.grade = grade;
    }
    if let Some(subject) = subject {
        form.subject = subject;
    }
    form.topic = topic;
    if let Some(count) = count {
        form.count = count;
    }
    form
}

pub async fn run_flashcards(
    generator: &Generator,
    mut form: FlashcardForm,
    out: Option<&Path>,
) -> Result<()> {
    let input = form.submit()?;
    let set = generator.flashcards(&input).await.map_err(report)?;
    form.finish();
    print!("{}", preview::flashcards(&set));
    save(out, export::export_flashcards(&set))
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

pub fn assessment_form(
    grade: Option<GradeLevel>,
    subject: Option<Subject>,
    topic: String,
    kind: Option<AssessmentType>,
    count: Option<u32>,
) -> AssessmentForm {
    let mut form = AssessmentForm::default();
    if let Some(grade) = grade {
        form.grade = grade;
    }
    if let Some(subject) = subject {
        form.subject = subject;
    }
    form.topic = topic;
    if let Some(kind) = kind {
        form.kind = kind;
    }
    if let Some(count) = count {
        form.question_count = count;
    }
    form
}

pub async fn run_assessment(
    generator: &Generator,
    mut form: AssessmentForm,
    out: Option<&Path>,
) -> Result<()> {
    let input = form.submit()?;
    let assessment = generator.assessment(&input).await.map_err(report)?;
    form.finish();
    print!("{}", preview::assessment(&assessment));
    save(out, export::export_assessment(&assessment))
}

// ---------------------------------------------------------------------------
// Exam
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ExamArgs {
    pub school: Option<String>,
    pub grade: Option<GradeLevel>,
    pub subject: Option<Subject>,
    pub term: Option<Term>,
    pub year: Option<i32>,
    pub duration: Option<String>,
}

pub fn exam_form(args: ExamArgs, profile: &ProfileSection) -> ExamForm {
    let mut form = ExamForm::default();
    if let Some(school) = args.school.or_else(|| profile.school_name.clone()) {
        form.school_name = school;
    }
    if let Some(grade) = args.grade {
        form.grade = grade;
    }
    if let Some(subject) = args.subject {
        form.subject = subject;
    }
    if let Some(term) = args.term {
        form.term = term;
    }
    if let Some(year) = args.year {
        form.year = year;
    }
    if let Some(duration) = args.duration {
        form.duration = duration;
    }
    form
}

pub async fn run_exam(generator: &Generator, mut form: ExamForm, out: Option<&Path>) -> Result<()> {
    let input = form.submit()?;
    let exam = generator.exam(&input).await.map_err(report)?;
    form.finish();
    print!("{}", preview::exam(&exam));
    save(out, export::export_exam(&exam))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_form_takes_teacher_from_profile() {
        let profile = ProfileSection {
            teacher_name: Some("Mrs. Moyo".into()),
            school_name: None,
        };
        let form = lesson_form(
            LessonArgs {
                topic: "Nouns".into(),
                ..Default::default()
            },
            &profile,
        );
        assert_eq!(form.teacher_name, "Mrs. Moyo");
        assert_eq!(form.validate().unwrap().teacher_name, "Mrs. Moyo");
    }

    #[test]
    fn lesson_flag_overrides_profile_teacher() {
        let profile = ProfileSection {
            teacher_name: Some("Mrs. Moyo".into()),
            school_name: None,
        };
        let form = lesson_form(
            LessonArgs {
                teacher: Some("Mr. Dube".into()),
                topic: "Nouns".into(),
                duration: Some(40),
                ..Default::default()
            },
            &profile,
        );
        let input = form.validate().unwrap();
        assert_eq!(input.teacher_name, "Mr. Dube");
        assert_eq!(input.duration, 40);
    }

    #[test]
    fn exam_form_falls_back_to_profile_school() {
        let profile = ProfileSection {
            teacher_name: None,
            school_name: Some("Chipo Primary".into()),
        };
        let form = exam_form(ExamArgs::default(), &profile);
        assert_eq!(form.validate().unwrap().school_name, "Chipo Primary");
    }

    #[test]
    fn assessment_form_clamps_count_on_validate() {
        let form = assessment_form(None, None, "Fractions".into(), None, Some(99));
        assert_eq!(form.validate().unwrap().question_count, 50);
    }
}
