//! Prompt construction for each content kind.
//!
//! Every builder is a pure function of its input record and the syllabus
//! context string: no clock, environment or randomness is consulted, so the
//! same inputs always render byte-identical prompt text.

mod assessment;
mod shapes;

use std::fmt;

use zimed_model::{
    AssessmentInput, ExamInput, FlashcardInput, GradeLevel, LessonInput, SchemeInput, Subject,
    clamp_count,
};

pub use shapes::{
    ASSESSMENT_SHAPE, EXAM_SHAPE, FLASHCARD_SHAPE, LESSON_SHAPE, SCHEME_SHAPE,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The kinds of content the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Scheme,
    Lesson,
    Flashcards,
    Assessment,
    Exam,
}

impl ContentKind {
    /// Human-readable name used in messages.
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Scheme => "scheme of work",
            Self::Lesson => "lesson plan",
            Self::Flashcards => "flashcards",
            Self::Assessment => "assessment",
            Self::Exam => "exam paper",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Scheme => "scheme",
            Self::Lesson => "lesson",
            Self::Flashcards => "flashcards",
            Self::Assessment => "assessment",
            Self::Exam => "exam",
        };
        f.write_str(s)
    }
}

/// The three parts of a generation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptParts {
    pub kind: ContentKind,
    /// Role and ground rules.
    pub instructions: String,
    /// JSON shape the response must follow.
    pub output_shape: &'static str,
    /// The concrete request, including the syllabus context.
    pub task: String,
}

impl PromptParts {
    /// Join the parts into the text sent to the generation service.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.instructions.len() + self.task.len() + self.output_shape.len() + 64,
        );
        out.push_str(&self.instructions);
        out.push_str("\n\n## Task\n\n");
        out.push_str(&self.task);
        out.push_str("\n\n## Output Format\n\n");
        out.push_str(self.output_shape);
        out
    }
}

// ---------------------------------------------------------------------------
// Shared instructions
// ---------------------------------------------------------------------------

const ROLE: &str = "You are an experienced Zimbabwean primary school teacher and curriculum \
specialist. You write teaching documents that follow the Heritage-Based Curriculum, use \
locally available materials and examples from Zimbabwean daily life, and use language \
suited to the learners' grade.";

const JSON_RULES: &str = "Respond with a single JSON object only. Do not wrap it in Markdown, \
do not add commentary, and use exactly the keys shown in the output format.";

fn instructions(extra: &str) -> String {
    let mut out = String::with_capacity(ROLE.len() + JSON_RULES.len() + extra.len() + 4);
    out.push_str(ROLE);
    out.push_str("\n\n");
    out.push_str(extra);
    out.push_str("\n\n");
    out.push_str(JSON_RULES);
    out
}

fn header(out: &mut String, grade: GradeLevel, subject: Subject) {
    out.push_str(&format!("- **Grade:** {grade}\n"));
    out.push_str(&format!("- **Subject:** {subject}\n"));
}

fn syllabus_block(out: &mut String, syllabus: &str) {
    out.push_str("\n### Syllabus Context\n\n");
    out.push_str(syllabus.trim_end());
    out.push('\n');
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Number of teaching weeks planned in a scheme of work.
pub const TERM_WEEKS: u32 = 12;

/// Prompt for one subject's scheme of work.
pub fn scheme_prompt(input: &SchemeInput, subject: Subject, syllabus: &str) -> PromptParts {
    let mut task = String::with_capacity(1024);
    task.push_str("Generate a Scheme of Work (scheme-cum-plan) for one school term.\n\n");
    header(&mut task, input.grade, subject);
    task.push_str(&format!("- **Term:** {}\n", input.term));
    task.push_str(&format!("- **Year:** {}\n", input.year));
    task.push_str(&format!(
        "- **Week 1 begins:** {}\n",
        input.start_date.format("%Y-%m-%d")
    ));
    task.push_str(&format!(
        "\nPlan {TERM_WEEKS} teaching weeks, numbered from 1, with one entry per week. \
         Sequence topics from simple to complex, and thread cross-cutting issues \
         (e.g. heritage, ICT, health, environment) through the activities.\n"
    ));
    syllabus_block(&mut task, syllabus);

    PromptParts {
        kind: ContentKind::Scheme,
        instructions: instructions(
            "You are preparing a term scheme of work. Objectives must be measurable \
             (\"By the end of the week learners should be able to ...\").",
        ),
        output_shape: SCHEME_SHAPE,
        task,
    }
}

/// Prompt for a single daily lesson plan.
pub fn lesson_prompt(input: &LessonInput, syllabus: &str) -> PromptParts {
    let mut task = String::with_capacity(1024);
    task.push_str("Create a detailed daily lesson plan.\n\n");
    header(&mut task, input.grade, input.subject);
    task.push_str(&format!("- **Topic:** {}\n", input.topic.trim()));
    task.push_str(&format!("- **Duration:** {} minutes\n", input.duration));
    let focus = input.context.trim();
    if !focus.is_empty() {
        task.push_str(&format!("- **Specific focus:** {focus}\n"));
    }
    task.push_str(
        "\nStructure the lesson as Introduction, Lesson Development (one or more steps) \
         and Conclusion. Step times must add up to the lesson duration.\n",
    );
    syllabus_block(&mut task, syllabus);

    PromptParts {
        kind: ContentKind::Lesson,
        instructions: instructions(
            "You are preparing a lesson plan that another teacher could deliver without \
             further preparation.",
        ),
        output_shape: LESSON_SHAPE,
        task,
    }
}

/// Prompt for a flashcard set.
pub fn flashcard_prompt(input: &FlashcardInput, syllabus: &str) -> PromptParts {
    let count = clamp_count(input.count);
    let mut task = String::with_capacity(768);
    task.push_str(&format!("Create {count} revision flashcards.\n\n"));
    header(&mut task, input.grade, input.subject);
    task.push_str(&format!("- **Topic:** {}\n", input.topic.trim()));
    task.push_str(
        "\nThe front holds a short question, term or prompt; the back holds a concise \
         answer or definition of at most two sentences.\n",
    );
    syllabus_block(&mut task, syllabus);

    PromptParts {
        kind: ContentKind::Flashcards,
        instructions: instructions("You are preparing flashcards for learner revision."),
        output_shape: FLASHCARD_SHAPE,
        task,
    }
}

/// Prompt for a topic assessment; the body depends on the assessment type.
pub fn assessment_prompt(input: &AssessmentInput, syllabus: &str) -> PromptParts {
    let count = clamp_count(input.question_count);
    let mut task = String::with_capacity(1536);
    task.push_str("Create a topic assessment.\n\n");
    header(&mut task, input.grade, input.subject);
    task.push_str(&format!("- **Topic:** {}\n", input.topic.trim()));
    task.push_str(&format!("- **Type:** {}\n\n", input.kind));
    task.push_str(&assessment::body(input.kind, count));
    syllabus_block(&mut task, syllabus);

    PromptParts {
        kind: ContentKind::Assessment,
        instructions: instructions(
            "You are setting a classroom assessment. Every question must have a model \
             answer and a whole-number mark allocation.",
        ),
        output_shape: ASSESSMENT_SHAPE,
        task,
    }
}

/// Prompt for an end-of-term examination paper.
pub fn exam_prompt(input: &ExamInput, syllabus: &str) -> PromptParts {
    let mut task = String::with_capacity(1536);
    task.push_str("Create an END OF TERM EXAMINATION paper.\n\n");
    task.push_str(&format!("- **School:** {}\n", input.school_name.trim()));
    header(&mut task, input.grade, input.subject);
    task.push_str(&format!("- **Term:** {}\n", input.term));
    task.push_str(&format!("- **Year:** {}\n", input.year));
    task.push_str(&format!("- **Duration:** {}\n", input.duration.trim()));
    task.push_str(
        "\nStructure:\n\
         - Section A: Multiple choice questions (four options each, 1 mark each)\n\
         - Section B: Structured questions (2-5 marks each)\n\
         - Section C: Long answer / Composition (choose one of several titles)\n\n\
         Cover the whole term's syllabus, ordering questions from easy to difficult \
         within each section. Number questions continuously across sections.\n",
    );
    syllabus_block(&mut task, syllabus);

    PromptParts {
        kind: ContentKind::Exam,
        instructions: instructions(
            "You are setting a formal examination paper with clear section instructions \
             and a complete marking guide.",
        ),
        output_shape: EXAM_SHAPE,
        task,
    }
}
