//! Plain-text previews printed after generation.

use std::fmt::Write;

use zimed_model::{Assessment, ExamPaper, FlashcardSet, LessonPlan, Question, SchemeOfWork};

fn list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{heading}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

fn question(out: &mut String, q: &Question) {
    let unit = if q.marks == 1 { "mark" } else { "marks" };
    let _ = writeln!(out, "  {}. {} [{} {unit}]", q.id, q.prompt, q.marks);
    for (i, option) in q.options.iter().enumerate() {
        let letter = (b'A' + (i % 26) as u8) as char;
        let _ = writeln!(out, "       {letter}. {option}");
    }
}

pub fn scheme(scheme: &SchemeOfWork) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {} {} (teacher: {})",
        scheme.grade, scheme.subject, scheme.term, scheme.year, scheme.teacher_name
    );
    list(&mut out, "Aims", &scheme.aims);
    list(&mut out, "Topics", &scheme.topics_covered);
    list(&mut out, "Cross-cutting issues", &scheme.cross_cutting_issues);
    if !scheme.entries.is_empty() {
        let _ = writeln!(out, "\nWeeks:");
        for entry in &scheme.entries {
            let _ = writeln!(out, "  Week {:>2}  {}", entry.week, entry.topic);
        }
    }
    out
}

pub fn lesson(plan: &LessonPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Lesson plan: {} / {}", plan.topic, plan.sub_topic);
    let _ = writeln!(
        out,
        "{} {} | {} | {} minutes | {}",
        plan.grade, plan.subject, plan.date, plan.duration, plan.teacher_name
    );
    list(&mut out, "Objectives", &plan.objectives);
    list(&mut out, "Materials", &plan.materials);
    if !plan.assumed_knowledge.is_empty() {
        let _ = writeln!(out, "\nAssumed knowledge: {}", plan.assumed_knowledge);
    }
    if !plan.lesson_steps.is_empty() {
        let _ = writeln!(out, "\nSteps:");
        for step in &plan.lesson_steps {
            let _ = writeln!(out, "  [{}] {}", step.time, step.stage);
            let _ = writeln!(out, "      teacher: {}", step.teacher_activity);
            let _ = writeln!(out, "      learners: {}", step.learner_activity);
        }
    }
    if !plan.evaluation.is_empty() {
        let _ = writeln!(out, "\nEvaluation: {}", plan.evaluation);
    }
    out
}

pub fn flashcards(set: &FlashcardSet) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Flashcards: {} ({} {}, {} cards)",
        set.topic,
        set.grade,
        set.subject,
        set.cards.len()
    );
    for card in &set.cards {
        let _ = writeln!(out, "  {}: {} -> {}", card.id, card.front, card.back);
    }
    out
}

pub fn assessment(assessment: &Assessment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", assessment.title, assessment.kind);
    if let Some(passage) = &assessment.passage {
        let _ = writeln!(out, "\n{passage}\n");
    }
    for section in assessment.sections() {
        let _ = writeln!(out, "\nSection {section}");
        for q in assessment.questions.iter().filter(|q| q.section == section) {
            question(&mut out, q);
        }
    }
    let _ = writeln!(out, "\nTotal: {} marks", assessment.total_marks);
    out
}

pub fn exam(exam: &ExamPaper) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", exam.school_name);
    let _ = writeln!(
        out,
        "{} {} {} {} | {}",
        exam.grade, exam.subject, exam.term, exam.year, exam.duration
    );
    for section in &exam.sections {
        let _ = writeln!(out, "\n{} ({} marks)", section.title, section.section_marks);
        if !section.instructions.is_empty() {
            let _ = writeln!(out, "  {}", section.instructions);
        }
        for q in &section.questions {
            question(&mut out, q);
        }
    }
    let _ = writeln!(out, "\nTotal: {} marks", exam.total_marks);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use zimed_model::{AssessmentType, GradeLevel, QuestionType, Subject};

    #[test]
    fn assessment_preview_groups_by_section_and_shows_total() {
        let q = |id: &str, section: &str, marks| Question {
            id: id.into(),
            section: section.into(),
            kind: QuestionType::Structured,
            prompt: format!("Prompt {id}"),
            options: vec![],
            answer: String::new(),
            marks,
        };
        let record = Assessment {
            title: "Fractions Assessment".into(),
            topic: "Fractions".into(),
            grade: GradeLevel::Grade4,
            subject: Subject::Math,
            kind: AssessmentType::Mixed,
            passage: None,
            questions: vec![q("1", "A", 1), q("2", "B", 3)],
            total_marks: 4,
        };
        let text = assessment(&record);
        assert!(text.contains("Section A\n  1. Prompt 1 [1 mark]"));
        assert!(text.contains("Section B\n  2. Prompt 2 [3 marks]"));
        assert!(text.ends_with("Total: 4 marks\n"));
    }
}
