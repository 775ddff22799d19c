//! Document export.
//!
//! ```text
//!   record ──▶ documents::*_document ──▶ layout::Document ──▶ pdf::render_pdf ──▶ bytes
//! ```
//!
//! Export is synchronous and local. File names derive from record metadata.

pub mod documents;
pub mod layout;
pub mod pdf;

use std::path::{Path, PathBuf};

use thiserror::Error;

use zimed_model::{Assessment, ExamPaper, FlashcardSet, LessonPlan, SchemeOfWork};

pub use layout::{Document, Orientation};
pub use pdf::render_pdf;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("pdf rendering failed: {0}")]
    Pdf(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A rendered PDF and the file name it should be saved under.
#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// File names
// ---------------------------------------------------------------------------

const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Make `stem` safe as a file name: whitespace runs become `_`, path
/// separators and reserved characters are dropped.
pub fn sanitize_file_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut pending_gap = false;
    for c in stem.chars() {
        if c.is_whitespace() {
            pending_gap = !out.is_empty();
            continue;
        }
        if RESERVED.contains(&c) || c.is_control() {
            continue;
        }
        if pending_gap {
            out.push('_');
            pending_gap = false;
        }
        out.push(c);
    }
    let out = out.trim_matches('.').to_string();
    if out.is_empty() {
        "document".to_string()
    } else {
        out
    }
}

fn pdf_name(stem: String) -> String {
    format!("{}.pdf", sanitize_file_stem(&stem))
}

pub fn scheme_file_name(scheme: &SchemeOfWork) -> String {
    pdf_name(format!("{}_Scheme_{}", scheme.grade, scheme.year))
}

pub fn lesson_file_name(plan: &LessonPlan) -> String {
    pdf_name(format!("{}_Lesson_{}", plan.subject, plan.date))
}

pub fn flashcards_file_name(set: &FlashcardSet) -> String {
    pdf_name(format!("{}_Flashcards", set.topic))
}

pub fn assessment_file_name(assessment: &Assessment) -> String {
    pdf_name(format!("{}_Assessment", assessment.topic))
}

pub fn exam_file_name(exam: &ExamPaper) -> String {
    pdf_name(format!("{}_Exam", exam.subject))
}

// ---------------------------------------------------------------------------
// Export operations
// ---------------------------------------------------------------------------

/// Export a scheme batch. The file is named after the first scheme.
pub fn export_schemes(schemes: &[SchemeOfWork]) -> Result<ExportedPdf, ExportError> {
    let first = schemes.first().ok_or(ExportError::Empty)?;
    let document = documents::scheme_document(schemes)?;
    Ok(ExportedPdf {
        file_name: scheme_file_name(first),
        bytes: render_pdf(&document)?,
    })
}

pub fn export_lesson(plan: &LessonPlan) -> Result<ExportedPdf, ExportError> {
    Ok(ExportedPdf {
        file_name: lesson_file_name(plan),
        bytes: render_pdf(&documents::lesson_document(plan))?,
    })
}

pub fn export_flashcards(set: &FlashcardSet) -> Result<ExportedPdf, ExportError> {
    Ok(ExportedPdf {
        file_name: flashcards_file_name(set),
        bytes: render_pdf(&documents::flashcard_document(set))?,
    })
}

pub fn export_assessment(assessment: &Assessment) -> Result<ExportedPdf, ExportError> {
    Ok(ExportedPdf {
        file_name: assessment_file_name(assessment),
        bytes: render_pdf(&documents::assessment_document(assessment))?,
    })
}

pub fn export_exam(exam: &ExamPaper) -> Result<ExportedPdf, ExportError> {
    Ok(ExportedPdf {
        file_name: exam_file_name(exam),
        bytes: render_pdf(&documents::exam_document(exam))?,
    })
}

/// Write `pdf` into `dir` under its file name, creating `dir` if needed.
pub fn write_pdf(dir: &Path, pdf: &ExportedPdf) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(&pdf.file_name);
    std::fs::write(&path, &pdf.bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = pdf.bytes.len(), "wrote pdf");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_whitespace_and_drops_reserved() {
        assert_eq!(sanitize_file_stem("Grade 3_Scheme_2025"), "Grade_3_Scheme_2025");
        assert_eq!(sanitize_file_stem("Water  cycle / rain?"), "Water_cycle_rain");
        assert_eq!(sanitize_file_stem("../../etc/passwd"), "etcpasswd");
    }

    #[test]
    fn sanitize_never_returns_empty() {
        assert_eq!(sanitize_file_stem("  /?  "), "document");
    }
}
