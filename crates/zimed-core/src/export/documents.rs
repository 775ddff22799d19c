//! Page layouts for each generated record.

use zimed_model::{
    Assessment, ExamPaper, FlashcardSet, LessonPlan, Question, SchemeOfWork, sum_marks,
};

use super::ExportError;
use super::layout::{Document, LayoutBuilder, Orientation, TITLE_PT, col};

const AS_PER_SYLLABUS: &str = "As per syllabus";

/// Option letter for zero-based `index`: A, B, C …
fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

fn marks_label(marks: u32) -> String {
    if marks == 1 {
        "[1 mark]".to_string()
    } else {
        format!("[{marks} marks]")
    }
}

fn lines(items: &[String]) -> String {
    items.join("\n")
}

// ---------------------------------------------------------------------------
// Scheme of work
// ---------------------------------------------------------------------------

/// Landscape scheme-of-work document, one section per subject.
///
/// Returns [`ExportError::Empty`] for an empty list.
pub fn scheme_document(schemes: &[SchemeOfWork]) -> Result<Document, ExportError> {
    let first = schemes.first().ok_or(ExportError::Empty)?;
    let mut b = LayoutBuilder::new(
        format!("{} Scheme of Work {}", first.grade, first.year),
        Orientation::Landscape,
    );

    let columns = [
        col("WEEK", 0.8),
        col("TOPIC / CONTENT", 1.6),
        col("OBJECTIVES", 2.0),
        col("SKILLS", 1.3),
        col("S.O.M", 1.2),
        col("MEDIA", 1.2),
        col("ACTIVITIES", 2.0),
        col("EVALUATION", 1.3),
    ];

    for scheme in schemes {
        b.page_break();
        let grade = scheme.grade.label().to_uppercase();
        let term = scheme.term.label().to_uppercase();
        b.title(
            &format!("{grade} HBC SCHEME-CUM {term} {}", scheme.year),
            TITLE_PT,
        );
        b.heading(&format!(
            "{grade} {} {term} {}",
            scheme.subject.label().to_uppercase(),
            scheme.year
        ));
        b.field("Teacher", &scheme.teacher_name);
        b.space(2.0);

        b.heading("TOPICS TO BE COVERED:");
        if scheme.topics_covered.is_empty() {
            b.numbered(&[AS_PER_SYLLABUS]);
        } else {
            b.numbered(&scheme.topics_covered);
        }

        b.heading("AIMS:");
        b.bullets(&scheme.aims);

        if !scheme.cross_cutting_issues.is_empty() {
            b.heading("CROSS-CUTTING ISSUES:");
            b.bullets(&scheme.cross_cutting_issues);
        }

        let rows: Vec<Vec<String>> = scheme
            .entries
            .iter()
            .map(|e| {
                vec![
                    format!("Week {}", e.week),
                    e.topic.clone(),
                    lines(&e.objectives),
                    lines(&e.skills),
                    e.som.clone(),
                    e.media.clone(),
                    lines(&e.activities),
                    e.evaluation.clone(),
                ]
            })
            .collect();
        b.table(&columns, &rows);
    }

    Ok(b.finish())
}

// ---------------------------------------------------------------------------
// Lesson plan
// ---------------------------------------------------------------------------

pub fn lesson_document(plan: &LessonPlan) -> Document {
    let mut b = LayoutBuilder::new(
        format!("{} Lesson {}", plan.subject, plan.date),
        Orientation::Portrait,
    );
    b.title("Detailed Lesson Plan", TITLE_PT);

    let meta = vec![
        vec!["Teacher".to_string(), plan.teacher_name.clone()],
        vec!["Date".to_string(), plan.date.format("%d %B %Y").to_string()],
        vec!["Grade".to_string(), plan.grade.to_string()],
        vec!["Subject".to_string(), plan.subject.to_string()],
        vec!["Topic".to_string(), plan.topic.clone()],
        vec!["Sub-topic".to_string(), plan.sub_topic.clone()],
        vec!["Duration".to_string(), format!("{} minutes", plan.duration)],
    ];
    b.table(&[col("FIELD", 1.0), col("DETAIL", 3.0)], &meta);

    b.heading("Objectives");
    b.paragraph("By the end of the lesson, learners should be able to:");
    b.numbered(&plan.objectives);

    b.heading("Materials / Media");
    b.bullets(&plan.materials);

    if !plan.assumed_knowledge.is_empty() {
        b.heading("Assumed Knowledge");
        b.paragraph(&plan.assumed_knowledge);
    }

    b.heading("Lesson Development");
    let steps: Vec<Vec<String>> = plan
        .lesson_steps
        .iter()
        .map(|s| {
            vec![
                s.stage.clone(),
                s.time.clone(),
                s.teacher_activity.clone(),
                s.learner_activity.clone(),
                s.methods.clone(),
            ]
        })
        .collect();
    b.table(
        &[
            col("STAGE", 1.2),
            col("TIME", 0.8),
            col("TEACHER ACTIVITY", 2.5),
            col("LEARNER ACTIVITY", 2.5),
            col("METHODS", 1.3),
        ],
        &steps,
    );

    if !plan.evaluation.is_empty() {
        b.heading("Evaluation");
        b.paragraph(&plan.evaluation);
    }

    b.finish()
}

// ---------------------------------------------------------------------------
// Flashcards
// ---------------------------------------------------------------------------

pub fn flashcard_document(set: &FlashcardSet) -> Document {
    let mut b = LayoutBuilder::new(format!("Flashcards: {}", set.topic), Orientation::Portrait);
    b.title(&format!("Flashcards: {}", set.topic), TITLE_PT);
    b.field("Grade", set.grade.label());
    b.field("Subject", set.subject.label());
    b.field("Cards", &set.cards.len().to_string());
    b.space(3.0);

    let rows: Vec<Vec<String>> = set
        .cards
        .iter()
        .enumerate()
        .map(|(i, c)| vec![(i + 1).to_string(), c.front.clone(), c.back.clone()])
        .collect();
    b.table(&[col("#", 0.4), col("FRONT", 3.0), col("BACK", 3.0)], &rows);

    b.finish()
}

// ---------------------------------------------------------------------------
// Assessment and exam
// ---------------------------------------------------------------------------

fn write_question(b: &mut LayoutBuilder, number: &str, q: &Question) {
    b.marked_item(
        &format!("{number}."),
        &format!("{} {}", q.prompt, marks_label(q.marks)),
    );
    for (i, option) in q.options.iter().enumerate() {
        b.indented(&format!("{}. {option}", option_letter(i)));
    }
    b.space(1.5);
}

fn write_answer_key<'a>(b: &mut LayoutBuilder, questions: impl Iterator<Item = &'a Question>) {
    b.page_break();
    b.title("ANSWER KEY", TITLE_PT);
    let rows: Vec<Vec<String>> = questions
        .map(|q| vec![q.id.clone(), q.answer.clone(), q.marks.to_string()])
        .collect();
    b.table(&[col("Q", 0.5), col("ANSWER", 5.0), col("MARKS", 0.8)], &rows);
}

/// Marks are printed from the questions; a `total_marks` carried on the
/// record is ignored.
pub fn assessment_document(assessment: &Assessment) -> Document {
    let total_marks = sum_marks(&assessment.questions);
    let mut b = LayoutBuilder::new(assessment.title.clone(), Orientation::Portrait);
    b.title(&assessment.title, TITLE_PT);
    b.field("Grade", assessment.grade.label());
    b.field("Subject", assessment.subject.label());
    b.field("Topic", &assessment.topic);
    b.field("Type", assessment.kind.label());
    b.field("Name", "______________________________");
    b.rule();

    if let Some(passage) = &assessment.passage {
        b.heading("Read the passage below and answer the questions that follow.");
        b.paragraph(passage);
        b.rule();
    }

    for section in assessment.sections() {
        if !section.is_empty() {
            b.heading(&format!("Section {section}"));
        }
        for q in assessment.questions.iter().filter(|q| q.section == section) {
            write_question(&mut b, &q.id, q);
        }
    }

    b.rule();
    b.field("Total", &format!("{total_marks} marks"));

    write_answer_key(&mut b, assessment.questions.iter());
    b.finish()
}

/// Section and paper totals are recomputed from the questions before
/// layout.
pub fn exam_document(exam: &ExamPaper) -> Document {
    let mut exam = exam.clone();
    exam.recompute_totals();
    let exam = &exam;
    let title = format!("{} {} Exam", exam.subject, exam.term);
    let mut b = LayoutBuilder::new(title.clone(), Orientation::Portrait);

    b.title(&exam.school_name.to_uppercase(), TITLE_PT);
    b.title(&title, TITLE_PT - 2.0);
    let meta = vec![vec![
        exam.grade.to_string(),
        exam.term.to_string(),
        exam.year.to_string(),
        exam.duration.clone(),
        exam.total_marks.to_string(),
    ]];
    b.table(
        &[
            col("GRADE", 1.0),
            col("TERM", 1.0),
            col("YEAR", 1.0),
            col("DURATION", 1.2),
            col("TOTAL MARKS", 1.2),
        ],
        &meta,
    );
    b.field("Candidate Name", "______________________________");
    b.rule();

    for section in &exam.sections {
        b.heading(&format!("{} ({} marks)", section.title, section.section_marks));
        if !section.instructions.is_empty() {
            b.paragraph(&section.instructions);
        }
        for q in &section.questions {
            write_question(&mut b, &q.id, q);
        }
    }

    b.rule();
    b.field("Total", &format!("{} marks", exam.total_marks));
    b.paragraph("END OF PAPER");

    write_answer_key(&mut b, exam.sections.iter().flat_map(|s| s.questions.iter()));
    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use zimed_model::{
        AssessmentType, ExamSection, Flashcard, GradeLevel, QuestionType, SchemeEntry, Subject,
        Term,
    };

    fn scheme(subject: Subject) -> SchemeOfWork {
        SchemeOfWork {
            subject,
            grade: GradeLevel::Grade3,
            term: Term::Term1,
            year: 2025,
            teacher_name: "Mrs. Moyo".into(),
            aims: vec!["Develop number sense".into()],
            topics_covered: vec![],
            cross_cutting_issues: vec![],
            entries: vec![SchemeEntry {
                week: 1,
                topic: "Counting".into(),
                ..Default::default()
            }],
        }
    }

    fn question(id: &str, section: &str, marks: u32) -> Question {
        Question {
            id: id.into(),
            section: section.into(),
            kind: QuestionType::MultipleChoice,
            prompt: format!("Question {id}"),
            options: vec!["one".into(), "two".into()],
            answer: "A".into(),
            marks,
        }
    }

    #[test]
    fn scheme_document_of_nothing_is_an_error() {
        assert!(matches!(scheme_document(&[]), Err(ExportError::Empty)));
    }

    #[test]
    fn scheme_document_heading_and_fallback_topics() {
        let doc = scheme_document(&[scheme(Subject::Math)]).unwrap();
        let text = doc.text();
        assert_eq!(doc.orientation, Orientation::Landscape);
        assert!(text.contains("GRADE 3 HBC SCHEME-CUM TERM 1 2025"));
        assert!(text.contains("GRADE 3 MATHEMATICS TERM 1 2025"));
        assert!(text.contains("As per syllabus"));
        assert!(text.contains("Week 1"));
        assert!(text.contains("S.O.M"));
    }

    #[test]
    fn scheme_document_starts_each_subject_on_new_page() {
        let doc = scheme_document(&[scheme(Subject::Math), scheme(Subject::English)]).unwrap();
        assert_eq!(doc.pages.len(), 2);
        assert!(doc.pages[1].text().contains("GRADE 3 ENGLISH TERM 1 2025"));
    }

    #[test]
    fn assessment_document_letters_options_and_adds_answer_key() {
        let assessment = Assessment {
            title: "Fractions Test".into(),
            topic: "Fractions".into(),
            grade: GradeLevel::Grade5,
            subject: Subject::Math,
            kind: AssessmentType::MultipleChoice,
            passage: None,
            questions: vec![question("1", "A", 1), question("2", "A", 2)],
            total_marks: 3,
        };
        let doc = assessment_document(&assessment);
        let text = doc.text();
        assert!(text.contains("A. one"));
        assert!(text.contains("B. two"));
        assert!(text.contains("[2 marks]"));
        assert!(text.contains("3 marks"));
        let last = doc.pages.last().unwrap().text();
        assert!(last.contains("ANSWER KEY"));
    }

    #[test]
    fn exam_document_shows_section_marks() {
        let exam = ExamPaper {
            school_name: "Chipo Primary".into(),
            grade: GradeLevel::Grade7,
            subject: Subject::Science,
            term: Term::Term2,
            year: 2025,
            duration: "2 hours".into(),
            sections: vec![ExamSection::new(
                "Section A".into(),
                "Answer all questions.".into(),
                vec![question("1", "A", 2), question("2", "A", 3)],
            )],
            total_marks: 5,
        };
        let text = exam_document(&exam).text();
        assert!(text.contains("CHIPO PRIMARY"));
        assert!(text.contains("Section A (5 marks)"));
        assert!(text.contains("END OF PAPER"));
    }

    #[test]
    fn assessment_document_ignores_carried_total() {
        let assessment = Assessment {
            title: "Fractions Test".into(),
            topic: "Fractions".into(),
            grade: GradeLevel::Grade5,
            subject: Subject::Math,
            kind: AssessmentType::Structured,
            passage: None,
            questions: vec![question("1", "A", 2)],
            total_marks: 99,
        };
        let text = assessment_document(&assessment).text();
        assert!(text.contains("2 marks"));
        assert!(!text.contains("99 marks"));
    }

    #[test]
    fn exam_document_recomputes_section_and_paper_totals() {
        let exam = ExamPaper {
            school_name: "Chipo Primary".into(),
            grade: GradeLevel::Grade7,
            subject: Subject::Science,
            term: Term::Term2,
            year: 2025,
            duration: "2 hours".into(),
            sections: vec![ExamSection {
                title: "Section A".into(),
                instructions: String::new(),
                questions: vec![question("1", "A", 2), question("2", "A", 3)],
                section_marks: 40,
            }],
            total_marks: 100,
        };
        let text = exam_document(&exam).text();
        assert!(text.contains("Section A (5 marks)"));
        assert!(!text.contains("40 marks"));
        assert!(!text.contains("100 marks"));
        assert!(!text.contains("100"));
    }

    #[test]
    fn flashcard_document_numbers_cards() {
        let set = FlashcardSet {
            topic: "Plants".into(),
            grade: GradeLevel::Grade2,
            subject: Subject::Science,
            cards: vec![Flashcard {
                id: Flashcard::id_for(0),
                front: "Leaf".into(),
                back: "Makes food".into(),
            }],
        };
        let text = flashcard_document(&set).text();
        assert!(text.contains("Flashcards: Plants"));
        assert!(text.contains("Makes food"));
    }

    #[test]
    fn lesson_document_formats_date_and_duration() {
        let plan = LessonPlan {
            grade: GradeLevel::Grade3,
            subject: Subject::English,
            topic: "Nouns".into(),
            sub_topic: "Proper nouns".into(),
            date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            duration: 30,
            teacher_name: "Mr. Dube".into(),
            objectives: vec!["identify proper nouns".into()],
            materials: vec![],
            assumed_knowledge: String::new(),
            lesson_steps: vec![],
            evaluation: String::new(),
        };
        let text = lesson_document(&plan).text();
        assert!(text.contains("Detailed Lesson Plan"));
        assert!(text.contains("03 February 2025"));
        assert!(text.contains("30 minutes"));
    }
}
