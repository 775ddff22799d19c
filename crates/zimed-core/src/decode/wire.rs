//! Wire shapes of generation responses. Every field is optional; missing
//! and `null` both deserialize to `None`. Unknown keys are ignored.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireScheme {
    pub aims: Option<Vec<String>>,
    pub topics_covered: Option<Vec<String>>,
    pub cross_cutting_issues: Option<Vec<String>>,
    pub entries: Option<Vec<WireSchemeEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireSchemeEntry {
    pub week: Option<u32>,
    pub topic: Option<String>,
    pub objectives: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub som: Option<String>,
    pub media: Option<String>,
    pub activities: Option<Vec<String>>,
    pub evaluation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireLesson {
    pub sub_topic: Option<String>,
    pub objectives: Option<Vec<String>>,
    pub materials: Option<Vec<String>>,
    pub assumed_knowledge: Option<String>,
    pub lesson_steps: Option<Vec<WireLessonStep>>,
    pub evaluation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireLessonStep {
    pub stage: Option<String>,
    pub time: Option<String>,
    pub teacher_activity: Option<String>,
    pub learner_activity: Option<String>,
    pub methods: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireFlashcards {
    pub cards: Option<Vec<WireCard>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireCard {
    pub front: Option<String>,
    pub back: Option<String>,
}

/// Question ids arrive as either numbers or strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum WireId {
    Number(u64),
    Text(String),
}

impl WireId {
    pub fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct WireQuestion {
    pub id: Option<WireId>,
    pub section: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub prompt: Option<String>,
    pub options: Option<Vec<String>>,
    pub answer: Option<String>,
    pub marks: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireAssessment {
    pub title: Option<String>,
    pub passage: Option<String>,
    pub questions: Option<Vec<WireQuestion>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireExam {
    pub sections: Option<Vec<WireExamSection>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireExamSection {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub questions: Option<Vec<WireQuestion>>,
}
