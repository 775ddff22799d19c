//! JSON output contracts quoted verbatim in prompts.
//!
//! Key spellings here must match the wire structs in [`crate::decode`].

pub const SCHEME_SHAPE: &str = r#"```json
{
  "aims": ["string"],
  "topicsCovered": ["string"],
  "crossCuttingIssues": ["string"],
  "entries": [
    {
      "week": 1,
      "topic": "string",
      "objectives": ["string"],
      "skills": ["string"],
      "som": "string (sources of material)",
      "media": "string",
      "activities": ["string"],
      "evaluation": "string"
    }
  ]
}
```
"#;

pub const LESSON_SHAPE: &str = r#"```json
{
  "subTopic": "string",
  "objectives": ["string"],
  "materials": ["string"],
  "assumedKnowledge": "string",
  "lessonSteps": [
    {
      "stage": "string",
      "time": "string (e.g. 5 min)",
      "teacherActivity": "string",
      "learnerActivity": "string",
      "methods": "string"
    }
  ],
  "evaluation": "string"
}
```
"#;

pub const FLASHCARD_SHAPE: &str = r#"```json
{
  "cards": [
    { "front": "string", "back": "string" }
  ]
}
```
"#;

pub const ASSESSMENT_SHAPE: &str = r#"```json
{
  "title": "string",
  "passage": "string or null (reading passage for comprehension work)",
  "questions": [
    {
      "id": 1,
      "section": "string (e.g. A)",
      "type": "multiple_choice | structured | comprehension | composition | short_answer | true_false",
      "prompt": "string",
      "options": ["string (multiple choice only, otherwise empty)"],
      "answer": "string (model answer or correct option letter)",
      "marks": 1
    }
  ]
}
```
"#;

pub const EXAM_SHAPE: &str = r#"```json
{
  "sections": [
    {
      "title": "string (e.g. Section A: Multiple Choice)",
      "instructions": "string",
      "questions": [
        {
          "id": 1,
          "type": "multiple_choice | structured | composition",
          "prompt": "string",
          "options": ["string (multiple choice only, otherwise empty)"],
          "answer": "string (marking guide)",
          "marks": 1
        }
      ]
    }
  ]
}
```
"#;
