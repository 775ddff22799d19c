//! `zimed scheme`: the six-subject scheme batch with live progress.

use std::path::Path;
use std::time::Duration;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use zimed_core::batch::{BATCH_ERROR_MESSAGE, BatchConfig, BatchEvent, BatchOutcome, run_scheme_batch};
use zimed_core::export;
use zimed_core::generator::Generator;
use zimed_model::{GradeLevel, Term};

use crate::config::ProfileSection;
use crate::forms::{Form, SchemeForm};
use crate::generate_cmd::save;
use crate::preview;

#[derive(Debug, Default)]
pub struct SchemeArgs {
    pub teacher: Option<String>,
    pub grade: Option<GradeLevel>,
    pub term: Option<Term>,
    pub year: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub delay_ms: Option<u64>,
}

pub fn scheme_form(args: &SchemeArgs, profile: &ProfileSection) -> SchemeForm {
    let mut form = SchemeForm::default();
    if let Some(teacher) = args.teacher.clone().or_else(|| profile.teacher_name.clone()) {
        form.teacher_name = teacher;
    }
    if let Some(grade) = args.grade {
        form.grade = grade;
    }
    if let Some(term) = args.term {
        form.term = term;
    }
    if let Some(year) = args.year {
        form.year = year;
    }
    if let Some(start_date) = args.start_date {
        form.start_date = start_date;
    }
    form
}

fn progress_line(event: &BatchEvent) -> String {
    match event {
        BatchEvent::Started {
            subject,
            index,
            total,
        } => format!("[{}/{total}] Generating {subject}...", index + 1),
        BatchEvent::Completed { scheme } => format!(
            "      {} done ({} weeks)",
            scheme.subject,
            scheme.entries.len()
        ),
        BatchEvent::Failed { subject, message } => format!("      {subject} failed: {message}"),
    }
}

pub async fn run_scheme(
    generator: &Generator,
    mut form: SchemeForm,
    delay_ms: Option<u64>,
    out: Option<&Path>,
) -> Result<()> {
    let input = form.submit()?;
    let config = match delay_ms {
        Some(ms) => BatchConfig {
            delay: Duration::from_millis(ms),
        },
        None => BatchConfig::default(),
    };

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Cancelling after the current subject...");
                cancel.cancel();
            }
        })
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            println!("{}", progress_line(&event));
        }
    });

    let result = run_scheme_batch(generator, &input, &config, Some(&tx), cancel).await;
    drop(tx);
    let _ = printer.await;
    ctrl_c.abort();
    form.finish();

    let outcome = result?;
    for scheme in outcome.schemes() {
        println!();
        print!("{}", preview::scheme(scheme));
    }

    match &outcome {
        BatchOutcome::Completed { schemes } => save(out, export::export_schemes(schemes)),
        BatchOutcome::Failed { subject, error, .. } => {
            tracing::error!(subject = %subject, error = %error, "scheme batch failed");
            bail!(BATCH_ERROR_MESSAGE)
        }
        BatchOutcome::Cancelled { completed } => {
            println!(
                "\nCancelled after {} of 6 subjects; nothing was exported.",
                completed.len()
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zimed_model::Subject;

    #[test]
    fn started_line_is_one_based() {
        let line = progress_line(&BatchEvent::Started {
            subject: Subject::English,
            index: 1,
            total: 6,
        });
        assert_eq!(line, "[2/6] Generating English...");
    }

    #[test]
    fn teacher_flag_wins_over_profile() {
        let profile = ProfileSection {
            teacher_name: Some("Mrs. Moyo".into()),
            school_name: None,
        };
        let args = SchemeArgs {
            teacher: Some("Mr. Dube".into()),
            ..Default::default()
        };
        assert_eq!(scheme_form(&args, &profile).teacher_name, "Mr. Dube");

        let form = scheme_form(&SchemeArgs::default(), &profile);
        assert_eq!(form.teacher_name, "Mrs. Moyo");
    }
}
