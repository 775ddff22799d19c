//! Canned generation responses in the shapes the decoder expects.

/// A two-week scheme of work.
pub const SCHEME_JSON: &str = r#"{
  "aims": ["Develop number sense", "Apply mathematics in daily life"],
  "topicsCovered": ["Numbers to 1000", "Addition"],
  "crossCuttingIssues": ["Heritage", "ICT"],
  "entries": [
    {
      "week": 1,
      "topic": "Counting in hundreds",
      "objectives": ["count in hundreds to 1000"],
      "skills": ["counting"],
      "som": "HBC Mathematics Syllabus p. 12",
      "media": "Bottle tops, number charts",
      "activities": ["Counting bundles of sticks"],
      "evaluation": ""
    },
    {
      "week": 2,
      "topic": "Place value",
      "objectives": ["state the value of each digit"],
      "skills": ["reasoning"],
      "som": "HBC Mathematics Syllabus p. 13",
      "media": "Abacus",
      "activities": ["Building numbers on an abacus"],
      "evaluation": ""
    }
  ]
}"#;

pub const LESSON_JSON: &str = r#"{
  "subTopic": "Proper nouns",
  "objectives": ["identify proper nouns in a sentence", "write names with capital letters"],
  "materials": ["Flash cards", "Chalkboard"],
  "assumedKnowledge": "Learners can name people and places around them.",
  "lessonSteps": [
    {
      "stage": "Introduction",
      "time": "5 min",
      "teacherActivity": "Asks learners to name their village",
      "learnerActivity": "Respond orally",
      "methods": "Question and answer"
    },
    {
      "stage": "Development",
      "time": "20 min",
      "teacherActivity": "Writes sentences on the board",
      "learnerActivity": "Underline proper nouns",
      "methods": "Discussion"
    },
    {
      "stage": "Conclusion",
      "time": "5 min",
      "teacherActivity": "Summarises the lesson",
      "learnerActivity": "Complete a short exercise",
      "methods": "Written work"
    }
  ],
  "evaluation": "Most learners identified proper nouns correctly."
}"#;

pub const FLASHCARDS_JSON: &str = r#"{
  "cards": [
    {"front": "What do plants need to make food?", "back": "Sunlight, water and air"},
    {"front": "Which part of a plant absorbs water?", "back": "The roots"},
    {"front": "What colour are most leaves?", "back": "Green"}
  ]
}"#;

/// Reports a wrong total on purpose.
pub const ASSESSMENT_JSON: &str = r#"{
  "title": "Fractions Test",
  "totalMarks": 99,
  "questions": [
    {"id": 1, "section": "A", "type": "multiple_choice", "prompt": "What is 1/2 of 10?",
     "options": ["2", "5", "10", "20"], "answer": "B", "marks": 1},
    {"id": 2, "section": "B", "type": "structured", "prompt": "Write 3/4 in words.",
     "answer": "three quarters", "marks": 2},
    {"id": "3", "section": "B", "prompt": "Shade 1/3 of a shape.", "answer": "Any one of three equal parts"}
  ]
}"#;

/// Three sections; totals are deliberately wrong.
pub const EXAM_JSON: &str = r#"{
  "totalMarks": 1,
  "sections": [
    {
      "title": "Section A: Multiple Choice",
      "instructions": "Answer all questions.",
      "sectionMarks": 50,
      "questions": [
        {"id": 1, "type": "multiple_choice", "prompt": "Which is a mammal?",
         "options": ["Frog", "Cow", "Lizard", "Fish"], "answer": "B", "marks": 1},
        {"id": 2, "type": "multiple_choice", "prompt": "Water boils at?",
         "options": ["50 C", "80 C", "100 C", "120 C"], "answer": "C", "marks": 1}
      ]
    },
    {
      "title": "Section B: Structured",
      "instructions": "Answer all questions.",
      "questions": [
        {"id": 1, "type": "structured", "prompt": "Name two sources of energy.",
         "answer": "Sun, wood", "marks": 4}
      ]
    },
    {
      "title": "Section C: Long Answer",
      "instructions": "Answer one question.",
      "questions": [
        {"type": "composition", "prompt": "Describe how to care for a garden.",
         "answer": "Watering, weeding, mulching", "marks": 10}
      ]
    }
  ]
}"#;
