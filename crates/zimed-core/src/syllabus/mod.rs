//! Static syllabus lookup table.
//!
//! Learning-area context for each subject and grade band is defined in
//! `syllabus.toml` and embedded in the binary at compile time. The rendered
//! context is pasted into generation prompts so the model stays within the
//! heritage-based curriculum.

use std::sync::LazyLock;

use serde::Deserialize;
use zimed_model::{GradeLevel, Subject};

/// Syllabus context for one subject across a band of grades.
#[derive(Debug, Clone, Deserialize)]
pub struct SyllabusEntry {
    pub subject: Subject,
    pub grades: Vec<GradeLevel>,
    /// Name of the learning area as it appears in the curriculum framework.
    pub learning_area: String,
    pub topics: Vec<String>,
}

impl SyllabusEntry {
    /// Render the entry as prompt context for `grade`.
    pub fn render(&self, grade: GradeLevel) -> String {
        let mut out = String::with_capacity(256);
        out.push_str(&format!(
            "Learning area: {} ({grade}, {})\n",
            self.learning_area, self.subject
        ));
        out.push_str("Syllabus topics:\n");
        for (i, topic) in self.topics.iter().enumerate() {
            out.push_str(&format!("{}. {topic}\n", i + 1));
        }
        out
    }
}

#[derive(Debug, Deserialize)]
struct SyllabusTable {
    entries: Vec<SyllabusEntry>,
}

static SYLLABUS_TOML: &str = include_str!("syllabus.toml");

/// Parsed once on first use.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed. The table ships inside the
/// binary, so this cannot happen for a binary whose tests passed.
static TABLE: LazyLock<SyllabusTable> = LazyLock::new(|| {
    toml::from_str(SYLLABUS_TOML).expect("embedded syllabus.toml is invalid")
});

/// All syllabus entries in table order.
pub fn entries() -> &'static [SyllabusEntry] {
    &TABLE.entries
}

/// Find the entry covering `subject` at `grade`.
pub fn lookup(grade: GradeLevel, subject: Subject) -> Option<&'static SyllabusEntry> {
    entries()
        .iter()
        .find(|e| e.subject == subject && e.grades.contains(&grade))
}

/// Prompt context for a grade and subject.
///
/// Falls back to a generic curriculum instruction when the table has no
/// entry for the pair.
pub fn context_for(grade: GradeLevel, subject: Subject) -> String {
    match lookup(grade, subject) {
        Some(entry) => entry.render(grade),
        None => format!(
            "Follow the Zimbabwe Heritage-Based Curriculum (2024-2030) for {grade} {subject}.\n"
        ),
    }
}
