//! Scheme batch: one scheme of work per subject, generated sequentially.
//!
//! Subjects run in [`SCHEME_SUBJECTS`] order with a fixed delay before each
//! request. The first failure stops the batch; schemes produced before it
//! are still returned. Cancellation is checked before each subject and
//! during the delay, never mid-request.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use zimed_model::{SCHEME_SUBJECTS, SchemeInput, SchemeOfWork, Subject};

use crate::generator::{GenerationError, Generator};

/// Delay before each subject's request when none is configured.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Message shown when any subject in the batch fails.
pub const BATCH_ERROR_MESSAGE: &str =
    "An error occurred. Please try again or check your connection.";

/// Configuration for a scheme batch.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Pause before every request, the first one included.
    pub delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
        }
    }
}

/// Progress notification emitted while the batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// A subject's delay has elapsed and its request is about to be sent.
    Started {
        subject: Subject,
        /// Zero-based position in the batch.
        index: usize,
        total: usize,
    },
    Completed {
        scheme: Box<SchemeOfWork>,
    },
    Failed {
        subject: Subject,
        message: String,
    },
}

/// How a batch ended.
#[derive(Debug)]
pub enum BatchOutcome {
    /// Every subject produced a scheme, in subject order.
    Completed { schemes: Vec<SchemeOfWork> },
    /// A request failed. Later subjects were not attempted.
    Failed {
        completed: Vec<SchemeOfWork>,
        subject: Subject,
        error: GenerationError,
    },
    /// The caller cancelled before the next subject started.
    Cancelled { completed: Vec<SchemeOfWork> },
}

impl BatchOutcome {
    /// Schemes produced so far, whatever the outcome.
    pub fn schemes(&self) -> &[SchemeOfWork] {
        match self {
            Self::Completed { schemes } => schemes,
            Self::Failed { completed, .. } | Self::Cancelled { completed } => completed,
        }
    }

    pub fn into_schemes(self) -> Vec<SchemeOfWork> {
        match self {
            Self::Completed { schemes } => schemes,
            Self::Failed { completed, .. } | Self::Cancelled { completed } => completed,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Input rejected before any request is issued.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("teacher name is required")]
    MissingTeacherName,
}

fn emit(events: Option<&mpsc::UnboundedSender<BatchEvent>>, event: BatchEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is watching progress.
        let _ = tx.send(event);
    }
}

/// Run the six-subject scheme batch.
///
/// Progress is reported on `events` when given. Returns
/// [`BatchError::MissingTeacherName`] without contacting the backend when
/// the teacher name is blank.
pub async fn run_scheme_batch(
    generator: &Generator,
    input: &SchemeInput,
    config: &BatchConfig,
    events: Option<&mpsc::UnboundedSender<BatchEvent>>,
    cancel: CancellationToken,
) -> Result<BatchOutcome, BatchError> {
    if input.teacher_name.trim().is_empty() {
        return Err(BatchError::MissingTeacherName);
    }

    let total = SCHEME_SUBJECTS.len();
    let mut completed: Vec<SchemeOfWork> = Vec::with_capacity(total);

    tracing::info!(
        grade = %input.grade,
        term = %input.term,
        year = input.year,
        subjects = total,
        "starting scheme batch"
    );

    for (index, subject) in SCHEME_SUBJECTS.into_iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::info!(completed = completed.len(), "scheme batch cancelled");
            return Ok(BatchOutcome::Cancelled { completed });
        }

        tokio::select! {
            _ = tokio::time::sleep(config.delay) => {}
            _ = cancel.cancelled() => {
                tracing::info!(
                    subject = %subject,
                    completed = completed.len(),
                    "scheme batch cancelled during delay"
                );
                return Ok(BatchOutcome::Cancelled { completed });
            }
        }

        emit(
            events,
            BatchEvent::Started {
                subject,
                index,
                total,
            },
        );

        match generator.scheme(input, subject).await {
            Ok(scheme) => {
                emit(
                    events,
                    BatchEvent::Completed {
                        scheme: Box::new(scheme.clone()),
                    },
                );
                completed.push(scheme);
            }
            Err(error) => {
                tracing::error!(
                    subject = %subject,
                    completed = completed.len(),
                    error = %error,
                    "scheme batch stopped"
                );
                emit(
                    events,
                    BatchEvent::Failed {
                        subject,
                        message: BATCH_ERROR_MESSAGE.to_string(),
                    },
                );
                return Ok(BatchOutcome::Failed {
                    completed,
                    subject,
                    error,
                });
            }
        }
    }

    tracing::info!(schemes = completed.len(), "scheme batch completed");
    Ok(BatchOutcome::Completed { schemes: completed })
}
