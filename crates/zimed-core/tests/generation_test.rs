//! Generator service against the scripted backend.

use std::sync::Arc;

use chrono::NaiveDate;

use zimed_core::ContentKind;
use zimed_core::generator::{GenerationError, Generator};
use zimed_model::{
    AssessmentInput, AssessmentType, ExamInput, FlashcardInput, GradeLevel, LessonInput,
    QuestionType, SchemeInput, Subject, Term,
};
use zimed_test_utils::fixtures;
use zimed_test_utils::{Reply, ScriptedBackend};

const MODEL: &str = "test-model";

fn generator(backend: &Arc<ScriptedBackend>) -> Generator {
    Generator::new(backend.clone(), MODEL)
}

fn lesson_input() -> LessonInput {
    LessonInput {
        teacher_name: "  Mr. Dube ".into(),
        grade: GradeLevel::Grade3,
        subject: Subject::English,
        topic: "Nouns".into(),
        context: String::new(),
        date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
        duration: 30,
    }
}

#[tokio::test]
async fn scheme_request_carries_model_kind_and_syllabus() {
    let backend = ScriptedBackend::new([Reply::text(fixtures::SCHEME_JSON)]);
    let input = SchemeInput {
        teacher_name: "Mrs. Moyo".into(),
        grade: GradeLevel::Grade3,
        term: Term::Term1,
        year: 2025,
        start_date: NaiveDate::from_ymd_opt(2025, 1, 14).unwrap(),
    };

    let scheme = generator(&backend)
        .scheme(&input, Subject::Math)
        .await
        .unwrap();

    assert_eq!(scheme.subject, Subject::Math);
    assert_eq!(scheme.entries.len(), 2);
    assert_eq!(scheme.entries[1].week, 2);
    assert_eq!(scheme.teacher_name, "Mrs. Moyo");

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, MODEL);
    assert_eq!(requests[0].kind, ContentKind::Scheme);
    assert!(requests[0].json_output);
    assert!(requests[0].prompt.contains("Mathematics"));
    assert!(requests[0].prompt.contains("Grade 3"));
}

#[tokio::test]
async fn lesson_decodes_steps_and_trims_teacher() {
    let backend = ScriptedBackend::new([Reply::text(fixtures::LESSON_JSON)]);
    let plan = generator(&backend).lesson(&lesson_input()).await.unwrap();

    assert_eq!(plan.sub_topic, "Proper nouns");
    assert_eq!(plan.lesson_steps.len(), 3);
    assert_eq!(plan.lesson_steps[0].stage, "Introduction");
    assert_eq!(plan.teacher_name, "Mr. Dube");
    assert_eq!(plan.duration, 30);
}

#[tokio::test]
async fn lesson_with_empty_response_falls_back_to_topic() {
    let backend = ScriptedBackend::new([Reply::text("")]);
    let plan = generator(&backend).lesson(&lesson_input()).await.unwrap();

    assert_eq!(plan.sub_topic, "Nouns");
    assert!(plan.objectives.is_empty());
    assert!(plan.lesson_steps.is_empty());
}

#[tokio::test]
async fn flashcards_are_numbered_from_one() {
    let backend = ScriptedBackend::new([Reply::text(fixtures::FLASHCARDS_JSON)]);
    let input = FlashcardInput {
        grade: GradeLevel::Grade2,
        subject: Subject::Science,
        topic: "Plants".into(),
        count: 3,
    };
    let set = generator(&backend).flashcards(&input).await.unwrap();

    let ids: Vec<&str> = set.cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["card-1", "card-2", "card-3"]);
    assert_eq!(backend.requests()[0].kind, ContentKind::Flashcards);
}

#[tokio::test]
async fn assessment_total_ignores_reported_total() {
    let backend = ScriptedBackend::new([Reply::text(fixtures::ASSESSMENT_JSON)]);
    let input = AssessmentInput {
        grade: GradeLevel::Grade5,
        subject: Subject::Math,
        topic: "Fractions".into(),
        kind: AssessmentType::Mixed,
        question_count: 3,
    };
    let assessment = generator(&backend).assessment(&input).await.unwrap();

    // 1 + 2 + 1 (no marks given)
    assert_eq!(assessment.total_marks, 4);
    assert_eq!(assessment.questions[2].id, "3");
    assert_eq!(assessment.questions[2].kind, QuestionType::Other);
    assert_eq!(assessment.sections(), vec!["A", "B"]);
}

#[tokio::test]
async fn exam_totals_are_recomputed_per_section() {
    let backend = ScriptedBackend::new([Reply::text(fixtures::EXAM_JSON)]);
    let input = ExamInput {
        school_name: "Chipo Primary".into(),
        grade: GradeLevel::Grade7,
        subject: Subject::Science,
        term: Term::Term3,
        year: 2025,
        duration: "2 hours".into(),
    };
    let exam = generator(&backend).exam(&input).await.unwrap();

    let marks: Vec<u32> = exam.sections.iter().map(|s| s.section_marks).collect();
    assert_eq!(marks, [2, 4, 10]);
    assert_eq!(exam.total_marks, 16);
    assert_eq!(exam.question_count(), 4);
    // Missing id takes the running number across sections.
    assert_eq!(exam.sections[2].questions[0].id, "4");
    assert_eq!(exam.sections[2].questions[0].section, "C");
}

#[tokio::test]
async fn backend_failure_maps_to_generic_message() {
    let backend = ScriptedBackend::new([Reply::Status(500)]);
    let err = generator(&backend)
        .lesson(&lesson_input())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Backend { .. }));
    assert_eq!(err.kind(), ContentKind::Lesson);
    assert_eq!(
        err.user_message(),
        "Failed to generate lesson plan. Please try again."
    );
}

#[tokio::test]
async fn malformed_response_maps_to_same_message_as_transport_failure() {
    let backend = ScriptedBackend::new([Reply::text("{\"objectives\": \"not a list\"}")]);
    let err = generator(&backend)
        .lesson(&lesson_input())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Decode { .. }));
    assert_eq!(
        err.user_message(),
        "Failed to generate lesson plan. Please try again."
    );
}

#[tokio::test]
async fn each_call_issues_exactly_one_request() {
    let backend = ScriptedBackend::new([Reply::Status(503), Reply::text(fixtures::LESSON_JSON)]);
    let generator = generator(&backend);

    assert!(generator.lesson(&lesson_input()).await.is_err());
    assert_eq!(backend.request_count(), 1);
    assert!(generator.lesson(&lesson_input()).await.is_ok());
    assert_eq!(backend.request_count(), 2);
}
