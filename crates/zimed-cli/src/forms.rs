//! Per-screen form state.
//!
//! Each screen owns its own form: field values with defaults, a loading
//! flag and an error slot. Forms accept string-keyed updates the way a form
//! submission delivers them and validate into the typed input records.

use chrono::{Datelike, Local, NaiveDate};
use thiserror::Error;

use zimed_model::{
    AssessmentInput, AssessmentType, ExamInput, FlashcardInput, GradeLevel, LessonInput,
    SchemeInput, Subject, Term, clamp_count,
    inputs::{DEFAULT_EXAM_DURATION, DEFAULT_ITEM_COUNT, DEFAULT_LESSON_MINUTES},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Required fields are missing. Carries the message shown to the user.
    #[error("{0}")]
    Incomplete(&'static str),
}

const MISSING_TEACHER: &str = "Please enter your name.";
const MISSING_LESSON_FIELDS: &str = "Please fill in the Topic and Teacher Name.";
const MISSING_TOPIC: &str = "Please enter a topic.";
const MISSING_SCHOOL: &str = "Please enter the school name.";

/// Loading flag and error slot shared by every screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub loading: bool,
    pub error: Option<String>,
}

/// Normalise a field key: `teacherName`, `teacher_name` and `teacher-name`
/// all become `teachername`.
fn key(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse<T>(field: &str, value: &str) -> Result<T, FormError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| FormError::InvalidValue {
        field: field.to_string(),
        message: e.to_string(),
    })
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| FormError::InvalidValue {
        field: field.to_string(),
        message: e.to_string(),
    })
}

fn required(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Behaviour common to every screen's form.
pub trait Form {
    type Input;

    /// Apply one submitted field.
    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError>;

    /// Check required fields and build the input record.
    fn validate(&self) -> Result<Self::Input, FormError>;

    /// Reset to defaults, keeping the teacher name where the form has one.
    fn clear(&mut self);

    fn status(&self) -> &Status;

    fn status_mut(&mut self) -> &mut Status;

    /// Mark a request in flight and clear any previous error.
    fn begin(&mut self) {
        let status = self.status_mut();
        status.loading = true;
        status.error = None;
    }

    fn fail(&mut self, message: impl Into<String>) {
        let status = self.status_mut();
        status.loading = false;
        status.error = Some(message.into());
    }

    fn finish(&mut self) {
        self.status_mut().loading = false;
    }

    /// Apply every field in order, stopping at the first error.
    fn apply<'a, I>(&mut self, fields: I) -> Result<(), FormError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in fields {
            self.set_field(name, value)?;
        }
        Ok(())
    }

    /// Validate and record a failure in the error slot.
    fn submit(&mut self) -> Result<Self::Input, FormError> {
        match self.validate() {
            Ok(input) => {
                self.begin();
                Ok(input)
            }
            Err(e) => {
                self.fail(e.to_string());
                Err(e)
            }
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// Scheme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeForm {
    pub teacher_name: String,
    pub grade: GradeLevel,
    pub term: Term,
    pub year: i32,
    pub start_date: NaiveDate,
    today: NaiveDate,
    status: Status,
}

impl SchemeForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            teacher_name: String::new(),
            grade: GradeLevel::default(),
            term: Term::default(),
            year: today.year(),
            start_date: today,
            today,
            status: Status::default(),
        }
    }
}

impl Default for SchemeForm {
    fn default() -> Self {
        Self::new(today())
    }
}

impl Form for SchemeForm {
    type Input = SchemeInput;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match key(name).as_str() {
            "teachername" | "teacher" => self.teacher_name = value.to_string(),
            "grade" => self.grade = parse(name, value)?,
            "term" => self.term = parse(name, value)?,
            "year" => self.year = parse(name, value)?,
            "startdate" => self.start_date = parse_date(name, value)?,
            _ => return Err(FormError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<SchemeInput, FormError> {
        let teacher_name = required(&self.teacher_name).ok_or(FormError::Incomplete(MISSING_TEACHER))?;
        Ok(SchemeInput {
            teacher_name,
            grade: self.grade,
            term: self.term,
            year: self.year,
            start_date: self.start_date,
        })
    }

    fn clear(&mut self) {
        let teacher_name = std::mem::take(&mut self.teacher_name);
        *self = Self::new(self.today);
        self.teacher_name = teacher_name;
    }

    fn status(&self) -> &Status {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

// ---------------------------------------------------------------------------
// Lesson
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonForm {
    pub teacher_name: String,
    pub grade: GradeLevel,
    pub subject: Subject,
    pub topic: String,
    pub context: String,
    pub date: NaiveDate,
    pub duration: u32,
    today: NaiveDate,
    status: Status,
}

impl LessonForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            teacher_name: String::new(),
            grade: GradeLevel::default(),
            subject: Subject::default(),
            topic: String::new(),
            context: String::new(),
            date: today,
            duration: DEFAULT_LESSON_MINUTES,
            today,
            status: Status::default(),
        }
    }

    /// A lesson form carrying the teacher name from the scheme screen.
    pub fn seeded_from(scheme: &SchemeForm) -> Self {
        Self {
            teacher_name: scheme.teacher_name.clone(),
            ..Self::new(scheme.today)
        }
    }
}

impl Default for LessonForm {
    fn default() -> Self {
        Self::new(today())
    }
}

impl Form for LessonForm {
    type Input = LessonInput;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match key(name).as_str() {
            "teachername" | "teacher" => self.teacher_name = value.to_string(),
            "grade" => self.grade = parse(name, value)?,
            "subject" => self.subject = parse(name, value)?,
            "topic" => self.topic = value.to_string(),
            "context" => self.context = value.to_string(),
            "date" => self.date = parse_date(name, value)?,
            "duration" => self.duration = parse(name, value)?,
            _ => return Err(FormError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<LessonInput, FormError> {
        let (Some(topic), Some(teacher_name)) =
            (required(&self.topic), required(&self.teacher_name))
        else {
            return Err(FormError::Incomplete(MISSING_LESSON_FIELDS));
        };
        Ok(LessonInput {
            teacher_name,
            grade: self.grade,
            subject: self.subject,
            topic,
            context: self.context.trim().to_string(),
            date: self.date,
            duration: self.duration.max(1),
        })
    }

    fn clear(&mut self) {
        let teacher_name = std::mem::take(&mut self.teacher_name);
        *self = Self::new(self.today);
        self.teacher_name = teacher_name;
    }

    fn status(&self) -> &Status {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

// ---------------------------------------------------------------------------
// Flashcards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardForm {
    pub grade: GradeLevel,
    pub subject: Subject,
    pub topic: String,
    pub count: u32,
    status: Status,
}

impl Default for FlashcardForm {
    fn default() -> Self {
        Self {
            grade: GradeLevel::default(),
            subject: Subject::default(),
            topic: String::new(),
            count: DEFAULT_ITEM_COUNT,
            status: Status::default(),
        }
    }
}

impl Form for FlashcardForm {
    type Input = FlashcardInput;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match key(name).as_str() {
            "grade" => self.grade = parse(name, value)?,
            "subject" => self.subject = parse(name, value)?,
            "topic" => self.topic = value.to_string(),
            "count" => self.count = parse(name, value)?,
            _ => return Err(FormError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<FlashcardInput, FormError> {
        let topic = required(&self.topic).ok_or(FormError::Incomplete(MISSING_TOPIC))?;
        Ok(FlashcardInput {
            grade: self.grade,
            subject: self.subject,
            topic,
            count: clamp_count(self.count),
        })
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn status(&self) -> &Status {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentForm {
    pub grade: GradeLevel,
    pub subject: Subject,
    pub topic: String,
    pub kind: AssessmentType,
    pub question_count: u32,
    status: Status,
}

impl Default for AssessmentForm {
    fn default() -> Self {
        Self {
            grade: GradeLevel::default(),
            subject: Subject::default(),
            topic: String::new(),
            kind: AssessmentType::default(),
            question_count: DEFAULT_ITEM_COUNT,
            status: Status::default(),
        }
    }
}

impl Form for AssessmentForm {
    type Input = AssessmentInput;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match key(name).as_str() {
            "grade" => self.grade = parse(name, value)?,
            "subject" => self.subject = parse(name, value)?,
            "topic" => self.topic = value.to_string(),
            "type" | "kind" => self.kind = parse(name, value)?,
            "questioncount" | "count" => self.question_count = parse(name, value)?,
            _ => return Err(FormError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<AssessmentInput, FormError> {
        let topic = required(&self.topic).ok_or(FormError::Incomplete(MISSING_TOPIC))?;
        Ok(AssessmentInput {
            grade: self.grade,
            subject: self.subject,
            topic,
            kind: self.kind,
            question_count: clamp_count(self.question_count),
        })
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn status(&self) -> &Status {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

// ---------------------------------------------------------------------------
// Exam
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamForm {
    pub school_name: String,
    pub grade: GradeLevel,
    pub subject: Subject,
    pub term: Term,
    pub year: i32,
    pub duration: String,
    today: NaiveDate,
    status: Status,
}

impl ExamForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            school_name: String::new(),
            grade: GradeLevel::default(),
            subject: Subject::default(),
            term: Term::default(),
            year: today.year(),
            duration: DEFAULT_EXAM_DURATION.to_string(),
            today,
            status: Status::default(),
        }
    }
}

impl Default for ExamForm {
    fn default() -> Self {
        Self::new(today())
    }
}

impl Form for ExamForm {
    type Input = ExamInput;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match key(name).as_str() {
            "schoolname" | "school" => self.school_name = value.to_string(),
            "grade" => self.grade = parse(name, value)?,
            "subject" => self.subject = parse(name, value)?,
            "term" => self.term = parse(name, value)?,
            "year" => self.year = parse(name, value)?,
            "duration" => self.duration = value.to_string(),
            _ => return Err(FormError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<ExamInput, FormError> {
        let school_name = required(&self.school_name).ok_or(FormError::Incomplete(MISSING_SCHOOL))?;
        Ok(ExamInput {
            school_name,
            grade: self.grade,
            subject: self.subject,
            term: self.term,
            year: self.year,
            duration: required(&self.duration).unwrap_or_else(|| DEFAULT_EXAM_DURATION.to_string()),
        })
    }

    fn clear(&mut self) {
        *self = Self::new(self.today);
    }

    fn status(&self) -> &Status {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn defaults_follow_the_calendar() {
        let scheme = SchemeForm::new(day());
        assert_eq!(scheme.grade, GradeLevel::Grade3);
        assert_eq!(scheme.term, Term::Term1);
        assert_eq!(scheme.year, 2025);
        assert_eq!(scheme.start_date, day());

        let lesson = LessonForm::new(day());
        assert_eq!(lesson.subject, Subject::Math);
        assert_eq!(lesson.duration, 30);
        assert_eq!(lesson.date, day());
    }

    #[test]
    fn set_field_accepts_camel_and_snake_keys() {
        let mut form = SchemeForm::new(day());
        form.set_field("teacherName", "Mrs. Moyo").unwrap();
        form.set_field("start_date", "2025-01-14").unwrap();
        form.set_field("grade", "Grade 5").unwrap();
        form.set_field("term", "term-2").unwrap();

        let input = form.validate().unwrap();
        assert_eq!(input.teacher_name, "Mrs. Moyo");
        assert_eq!(input.grade, GradeLevel::Grade5);
        assert_eq!(input.term, Term::Term2);
        assert_eq!(input.start_date, NaiveDate::from_ymd_opt(2025, 1, 14).unwrap());
    }

    #[test]
    fn set_field_rejects_unknown_fields_and_bad_values() {
        let mut form = LessonForm::new(day());
        assert_eq!(
            form.set_field("colour", "red"),
            Err(FormError::UnknownField("colour".into()))
        );
        assert!(matches!(
            form.set_field("duration", "half an hour"),
            Err(FormError::InvalidValue { .. })
        ));
        assert!(matches!(
            form.set_field("date", "10/03/2025"),
            Err(FormError::InvalidValue { .. })
        ));
    }

    #[test]
    fn scheme_requires_a_teacher_name() {
        let mut form = SchemeForm::new(day());
        form.teacher_name = "   ".into();
        let err = form.submit().unwrap_err();
        assert_eq!(err.to_string(), "Please enter your name.");
        assert_eq!(form.status().error.as_deref(), Some("Please enter your name."));
        assert!(!form.status().loading);
    }

    #[test]
    fn lesson_requires_topic_and_teacher() {
        let mut form = LessonForm::new(day());
        form.topic = "Nouns".into();
        assert_eq!(
            form.validate(),
            Err(FormError::Incomplete("Please fill in the Topic and Teacher Name."))
        );
        form.teacher_name = "Mr. Dube".into();
        assert_eq!(form.validate().unwrap().topic, "Nouns");
    }

    #[test]
    fn clear_keeps_teacher_name() {
        let mut form = LessonForm::new(day());
        form.apply([
            ("teacherName", "Mr. Dube"),
            ("topic", "Nouns"),
            ("duration", "45"),
        ])
        .unwrap();
        form.clear();

        assert_eq!(form.teacher_name, "Mr. Dube");
        assert!(form.topic.is_empty());
        assert_eq!(form.duration, 30);
    }

    #[test]
    fn lesson_form_is_seeded_from_scheme_screen() {
        let mut scheme = SchemeForm::new(day());
        scheme.teacher_name = "Mrs. Moyo".into();
        let lesson = LessonForm::seeded_from(&scheme);
        assert_eq!(lesson.teacher_name, "Mrs. Moyo");
        assert_eq!(lesson.date, day());
    }

    #[test]
    fn counts_are_clamped() {
        let mut cards = FlashcardForm::default();
        cards.apply([("topic", "Plants"), ("count", "500")]).unwrap();
        assert_eq!(cards.validate().unwrap().count, 50);

        let mut test = AssessmentForm::default();
        test.apply([("topic", "Fractions"), ("questionCount", "0"), ("type", "Composition")])
            .unwrap();
        let input = test.validate().unwrap();
        assert_eq!(input.question_count, 1);
        assert_eq!(input.kind, AssessmentType::Composition);
    }

    #[test]
    fn exam_requires_school_and_defaults_duration() {
        let mut form = ExamForm::new(day());
        assert_eq!(
            form.validate(),
            Err(FormError::Incomplete("Please enter the school name."))
        );
        form.set_field("schoolName", "Chipo Primary").unwrap();
        form.set_field("duration", " ").unwrap();
        let input = form.validate().unwrap();
        assert_eq!(input.duration, "2 hours");
        assert_eq!(input.year, 2025);
    }

    #[test]
    fn begin_and_finish_toggle_loading() {
        let mut form = FlashcardForm::default();
        form.fail("old error");
        form.begin();
        assert!(form.status().loading);
        assert!(form.status().error.is_none());
        form.finish();
        assert!(!form.status().loading);
    }
}
