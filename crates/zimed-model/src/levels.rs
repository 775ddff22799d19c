use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Normalise a user-supplied label for lenient matching: lowercase, with
/// spaces, underscores and `&` folded into single hyphens.
fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.trim().chars() {
        let c = match c {
            ' ' | '_' | '&' | '/' => '-',
            other => other.to_ascii_lowercase(),
        };
        if c == '-' && (out.is_empty() || out.ends_with('-')) {
            continue;
        }
        out.push(c);
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

// ---------------------------------------------------------------------------
// Grade
// ---------------------------------------------------------------------------

/// Class level, from early childhood development through Grade 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeLevel {
    #[serde(rename = "ECD A", alias = "ecd-a")]
    EcdA,
    #[serde(rename = "ECD B", alias = "ecd-b")]
    EcdB,
    #[serde(rename = "Grade 1", alias = "grade-1")]
    Grade1,
    #[serde(rename = "Grade 2", alias = "grade-2")]
    Grade2,
    #[serde(rename = "Grade 3", alias = "grade-3")]
    Grade3,
    #[serde(rename = "Grade 4", alias = "grade-4")]
    Grade4,
    #[serde(rename = "Grade 5", alias = "grade-5")]
    Grade5,
    #[serde(rename = "Grade 6", alias = "grade-6")]
    Grade6,
    #[serde(rename = "Grade 7", alias = "grade-7")]
    Grade7,
}

impl GradeLevel {
    /// Every grade, in ascending order.
    pub const ALL: [GradeLevel; 9] = [
        Self::EcdA,
        Self::EcdB,
        Self::Grade1,
        Self::Grade2,
        Self::Grade3,
        Self::Grade4,
        Self::Grade5,
        Self::Grade6,
        Self::Grade7,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::EcdA => "ECD A",
            Self::EcdB => "ECD B",
            Self::Grade1 => "Grade 1",
            Self::Grade2 => "Grade 2",
            Self::Grade3 => "Grade 3",
            Self::Grade4 => "Grade 4",
            Self::Grade5 => "Grade 5",
            Self::Grade6 => "Grade 6",
            Self::Grade7 => "Grade 7",
        }
    }

    /// True for the two early-childhood classes.
    pub fn is_ecd(&self) -> bool {
        matches!(self, Self::EcdA | Self::EcdB)
    }
}

impl Default for GradeLevel {
    fn default() -> Self {
        Self::Grade3
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GradeLevel {
    type Err = GradeLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match slug(s).as_str() {
            "ecd-a" | "ecda" => Ok(Self::EcdA),
            "ecd-b" | "ecdb" => Ok(Self::EcdB),
            "grade-1" | "grade1" | "1" => Ok(Self::Grade1),
            "grade-2" | "grade2" | "2" => Ok(Self::Grade2),
            "grade-3" | "grade3" | "3" => Ok(Self::Grade3),
            "grade-4" | "grade4" | "4" => Ok(Self::Grade4),
            "grade-5" | "grade5" | "5" => Ok(Self::Grade5),
            "grade-6" | "grade6" | "6" => Ok(Self::Grade6),
            "grade-7" | "grade7" | "7" => Ok(Self::Grade7),
            _ => Err(GradeLevelParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`GradeLevel`] string.
#[derive(Debug, Clone)]
pub struct GradeLevelParseError(pub String);

impl fmt::Display for GradeLevelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid grade level: {:?}", self.0)
    }
}

impl std::error::Error for GradeLevelParseError {}

// ---------------------------------------------------------------------------
// Term
// ---------------------------------------------------------------------------

/// School term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    #[serde(rename = "Term 1", alias = "term-1")]
    Term1,
    #[serde(rename = "Term 2", alias = "term-2")]
    Term2,
    #[serde(rename = "Term 3", alias = "term-3")]
    Term3,
}

impl Term {
    pub const ALL: [Term; 3] = [Self::Term1, Self::Term2, Self::Term3];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Term1 => "Term 1",
            Self::Term2 => "Term 2",
            Self::Term3 => "Term 3",
        }
    }
}

impl Default for Term {
    fn default() -> Self {
        Self::Term1
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Term {
    type Err = TermParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match slug(s).as_str() {
            "term-1" | "term1" | "1" => Ok(Self::Term1),
            "term-2" | "term2" | "2" => Ok(Self::Term2),
            "term-3" | "term3" | "3" => Ok(Self::Term3),
            _ => Err(TermParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Term`] string.
#[derive(Debug, Clone)]
pub struct TermParseError(pub String);

impl fmt::Display for TermParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid term: {:?}", self.0)
    }
}

impl std::error::Error for TermParseError {}

// ---------------------------------------------------------------------------
// Subject
// ---------------------------------------------------------------------------

/// Learning area of the heritage-based primary curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    #[serde(rename = "Mathematics", alias = "math")]
    Math,
    #[serde(rename = "English", alias = "english")]
    English,
    #[serde(rename = "Science & Technology", alias = "science")]
    Science,
    #[serde(rename = "Social Science", alias = "social")]
    Social,
    #[serde(rename = "Indigenous Language", alias = "indigenous")]
    Indigenous,
    #[serde(rename = "PE & Arts", alias = "pe-arts")]
    PeArts,
}

/// Subjects generated by a scheme batch, in generation order.
pub const SCHEME_SUBJECTS: [Subject; 6] = [
    Subject::Math,
    Subject::English,
    Subject::Science,
    Subject::Social,
    Subject::Indigenous,
    Subject::PeArts,
];

impl Subject {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Math => "Mathematics",
            Self::English => "English",
            Self::Science => "Science & Technology",
            Self::Social => "Social Science",
            Self::Indigenous => "Indigenous Language",
            Self::PeArts => "PE & Arts",
        }
    }
}

impl Default for Subject {
    fn default() -> Self {
        Self::Math
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Subject {
    type Err = SubjectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match slug(s).as_str() {
            "math" | "maths" | "mathematics" => Ok(Self::Math),
            "english" => Ok(Self::English),
            "science" | "science-technology" => Ok(Self::Science),
            "social" | "social-science" | "social-studies" => Ok(Self::Social),
            "indigenous" | "indigenous-language" => Ok(Self::Indigenous),
            "pe-arts" | "pe" | "arts" | "physical-education-arts" => Ok(Self::PeArts),
            _ => Err(SubjectParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Subject`] string.
#[derive(Debug, Clone)]
pub struct SubjectParseError(pub String);

impl fmt::Display for SubjectParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid subject: {:?}", self.0)
    }
}

impl std::error::Error for SubjectParseError {}

// ---------------------------------------------------------------------------
// Assessment type
// ---------------------------------------------------------------------------

/// Flavour of a topic assessment; selects the prompt sub-template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssessmentType {
    #[serde(rename = "Multiple Choice", alias = "multiple-choice")]
    MultipleChoice,
    #[serde(rename = "Structured", alias = "structured")]
    Structured,
    #[serde(rename = "Comprehension", alias = "comprehension")]
    Comprehension,
    #[serde(rename = "Composition", alias = "composition")]
    Composition,
    #[serde(rename = "Mixed", alias = "mixed")]
    Mixed,
}

impl AssessmentType {
    pub const ALL: [AssessmentType; 5] = [
        Self::MultipleChoice,
        Self::Structured,
        Self::Comprehension,
        Self::Composition,
        Self::Mixed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "Multiple Choice",
            Self::Structured => "Structured",
            Self::Comprehension => "Comprehension",
            Self::Composition => "Composition",
            Self::Mixed => "Mixed",
        }
    }
}

impl Default for AssessmentType {
    fn default() -> Self {
        Self::Mixed
    }
}

impl fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AssessmentType {
    type Err = AssessmentTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match slug(s).as_str() {
            "multiple-choice" | "mcq" | "mc" => Ok(Self::MultipleChoice),
            "structured" => Ok(Self::Structured),
            "comprehension" => Ok(Self::Comprehension),
            "composition" => Ok(Self::Composition),
            "mixed" => Ok(Self::Mixed),
            _ => Err(AssessmentTypeParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`AssessmentType`] string.
#[derive(Debug, Clone)]
pub struct AssessmentTypeParseError(pub String);

impl fmt::Display for AssessmentTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid assessment type: {:?}", self.0)
    }
}

impl std::error::Error for AssessmentTypeParseError {}

// ---------------------------------------------------------------------------
// Question type
// ---------------------------------------------------------------------------

/// Type of a single generated question.
///
/// Parsing never fails: anything unrecognised becomes [`QuestionType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    Structured,
    Comprehension,
    Composition,
    ShortAnswer,
    TrueFalse,
    #[default]
    #[serde(other)]
    Other,
}

impl QuestionType {
    pub fn from_label(s: &str) -> Self {
        match slug(s).as_str() {
            "multiple-choice" | "mcq" | "mc" | "multiplechoice" => Self::MultipleChoice,
            "structured" => Self::Structured,
            "comprehension" => Self::Comprehension,
            "composition" | "essay" | "long-answer" => Self::Composition,
            "short-answer" | "shortanswer" | "fill-in" | "fill-in-the-blank" => Self::ShortAnswer,
            "true-false" | "truefalse" | "true-or-false" => Self::TrueFalse,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MultipleChoice => "multiple_choice",
            Self::Structured => "structured",
            Self::Comprehension => "comprehension",
            Self::Composition => "composition",
            Self::ShortAnswer => "short_answer",
            Self::TrueFalse => "true_false",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_parses_label_and_slug() {
        assert_eq!("Grade 3".parse::<GradeLevel>().unwrap(), GradeLevel::Grade3);
        assert_eq!("grade-5".parse::<GradeLevel>().unwrap(), GradeLevel::Grade5);
        assert_eq!("7".parse::<GradeLevel>().unwrap(), GradeLevel::Grade7);
        assert_eq!("ECD  B".parse::<GradeLevel>().unwrap(), GradeLevel::EcdB);
        assert!("Grade 9".parse::<GradeLevel>().is_err());
    }

    #[test]
    fn grade_display_roundtrips_through_from_str() {
        for grade in GradeLevel::ALL {
            assert_eq!(grade.to_string().parse::<GradeLevel>().unwrap(), grade);
        }
    }

    #[test]
    fn subject_parses_ampersand_labels() {
        assert_eq!(
            "Science & Technology".parse::<Subject>().unwrap(),
            Subject::Science
        );
        assert_eq!("PE & Arts".parse::<Subject>().unwrap(), Subject::PeArts);
        assert_eq!("pe_arts".parse::<Subject>().unwrap(), Subject::PeArts);
        let err = "Latin".parse::<Subject>().unwrap_err();
        assert_eq!(err.to_string(), "invalid subject: \"Latin\"");
    }

    #[test]
    fn scheme_subjects_are_in_fixed_order() {
        let labels: Vec<&str> = SCHEME_SUBJECTS.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Mathematics",
                "English",
                "Science & Technology",
                "Social Science",
                "Indigenous Language",
                "PE & Arts",
            ]
        );
    }

    #[test]
    fn serde_uses_labels_and_accepts_slugs() {
        let json = serde_json::to_string(&Subject::Indigenous).unwrap();
        assert_eq!(json, "\"Indigenous Language\"");
        let term: Term = serde_json::from_str("\"term-2\"").unwrap();
        assert_eq!(term, Term::Term2);
        let grade: GradeLevel = serde_json::from_str("\"ECD A\"").unwrap();
        assert_eq!(grade, GradeLevel::EcdA);
    }

    #[test]
    fn assessment_type_accepts_mcq_shorthand() {
        assert_eq!(
            "MCQ".parse::<AssessmentType>().unwrap(),
            AssessmentType::MultipleChoice
        );
        assert_eq!(AssessmentType::default(), AssessmentType::Mixed);
    }

    #[test]
    fn question_type_is_lenient() {
        assert_eq!(
            QuestionType::from_label("Multiple Choice"),
            QuestionType::MultipleChoice
        );
        assert_eq!(QuestionType::from_label("true/false"), QuestionType::TrueFalse);
        assert_eq!(QuestionType::from_label("riddle"), QuestionType::Other);
        let parsed: QuestionType = serde_json::from_str("\"matching\"").unwrap();
        assert_eq!(parsed, QuestionType::Other);
    }
}
