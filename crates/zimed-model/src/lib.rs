//! Data model for zimed: curriculum enumerations, form input records and
//! generated content records.

pub mod inputs;
pub mod levels;
pub mod records;

pub use inputs::{
    AssessmentInput, ExamInput, FlashcardInput, LessonInput, SchemeInput, clamp_count,
};
pub use levels::{AssessmentType, GradeLevel, QuestionType, SCHEME_SUBJECTS, Subject, Term};
pub use records::{
    Assessment, ExamPaper, ExamSection, Flashcard, FlashcardSet, LessonPlan, LessonStep,
    Question, SchemeEntry, SchemeOfWork, sum_marks,
};
