use zimed_model::AssessmentType;

/// Most composition titles offered in one assessment.
const MAX_COMPOSITION_TITLES: u32 = 4;

/// Assessment instructions for one sub-type.
pub(super) fn body(kind: AssessmentType, count: u32) -> String {
    match kind {
        AssessmentType::MultipleChoice => format!(
            "Write {count} multiple-choice questions in section \"A\". Give each exactly \
             four options and exactly one correct option. The answer is the letter of the \
             correct option (A, B, C or D). Each question carries 1 mark.\n"
        ),
        AssessmentType::Structured => format!(
            "Write {count} structured questions in section \"A\". Each question may have \
             short sub-parts answered in a word, phrase or sentence. Allocate 1 to 5 marks \
             per question according to difficulty, and give a model answer.\n"
        ),
        AssessmentType::Comprehension => format!(
            "Write an original reading passage of a length suitable for the grade, set in \
             a Zimbabwean context, and put it in \"passage\". Then write {count} questions \
             about the passage in section \"A\": literal questions first, then inferential \
             and vocabulary questions. Allocate 1 to 3 marks per question.\n"
        ),
        AssessmentType::Composition => {
            let titles = count.min(MAX_COMPOSITION_TITLES);
            format!(
                "Write {titles} composition titles in section \"A\" of type \"composition\"; \
                 learners choose ONE. Each title carries 20 marks. In the answer field give \
                 a marking guide covering content, organisation and language.\n"
            )
        }
        AssessmentType::Mixed => format!(
            "Write {count} questions spread over three sections: section \"A\" multiple \
             choice (four options, 1 mark each), section \"B\" structured questions \
             (2 to 5 marks each), and section \"C\" one short written-response question \
             (5 to 10 marks).\n"
        ),
    }
}
