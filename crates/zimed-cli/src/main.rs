mod config;
mod forms;
mod generate_cmd;
mod preview;
mod scheme_cmd;
mod serve_cmd;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};

use zimed_core::backend::gemini::GeminiBackend;
use zimed_core::generator::Generator;
use zimed_core::syllabus;
use zimed_model::{AssessmentType, GradeLevel, Subject, Term};

use config::ZimedConfig;
use generate_cmd::{ExamArgs, LessonArgs};
use scheme_cmd::SchemeArgs;

#[derive(Parser)]
#[command(
    name = "zimed",
    about = "Generate schemes of work, lesson plans, flashcards, assessments and exam papers"
)]
struct Cli {
    /// Gemini API key (overrides GEMINI_API_KEY env var)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model name (overrides ZIMED_MODEL env var)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a zimed config file storing the key given with --api-key
    Init {
        /// Default teacher name for the form screens
        #[arg(long)]
        teacher: Option<String>,
        /// Default school name for exam papers
        #[arg(long)]
        school: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate a scheme of work for all six subjects
    Scheme {
        /// Teacher name (defaults to profile.teacher_name)
        #[arg(long)]
        teacher: Option<String>,
        #[arg(long)]
        grade: Option<GradeLevel>,
        #[arg(long)]
        term: Option<Term>,
        #[arg(long)]
        year: Option<i32>,
        /// First day of term (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// Pause before each subject's request, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Directory to write the PDF into
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a detailed lesson plan
    Lesson {
        /// Lesson topic
        topic: String,
        #[arg(long)]
        teacher: Option<String>,
        #[arg(long)]
        grade: Option<GradeLevel>,
        #[arg(long)]
        subject: Option<Subject>,
        /// Extra context for the lesson
        #[arg(long)]
        context: Option<String>,
        /// Lesson date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Duration in minutes
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a flashcard set
    Flashcards {
        topic: String,
        #[arg(long)]
        grade: Option<GradeLevel>,
        #[arg(long)]
        subject: Option<Subject>,
        /// Number of cards (1-50)
        #[arg(long)]
        count: Option<u32>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate an assessment with answer key
    Assessment {
        topic: String,
        #[arg(long)]
        grade: Option<GradeLevel>,
        #[arg(long)]
        subject: Option<Subject>,
        /// multiple-choice, structured, comprehension, composition or mixed
        #[arg(long = "type")]
        kind: Option<AssessmentType>,
        /// Number of questions (1-50)
        #[arg(long)]
        count: Option<u32>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate an end-of-term exam paper
    Exam {
        /// School name (defaults to profile.school_name)
        #[arg(long)]
        school: Option<String>,
        #[arg(long)]
        grade: Option<GradeLevel>,
        #[arg(long)]
        subject: Option<Subject>,
        #[arg(long)]
        term: Option<Term>,
        #[arg(long)]
        year: Option<i32>,
        /// Paper duration, e.g. "2 hours"
        #[arg(long)]
        duration: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the syllabus context used for a grade and subject
    Syllabus {
        #[arg(long)]
        grade: GradeLevel,
        #[arg(long)]
        subject: Subject,
    },
    /// Start the web UI and JSON API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

/// Execute the `zimed init` command: write config file.
fn cmd_init(
    api_key: Option<&str>,
    teacher: Option<String>,
    school: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let path = config::config_path();
    let api_key = api_key
        .filter(|k| !k.trim().is_empty())
        .context("zimed init requires --api-key <KEY>")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        gemini: config::GeminiSection {
            api_key: api_key.to_string(),
            ..Default::default()
        },
        profile: config::ProfileSection {
            teacher_name: teacher,
            school_name: school,
        },
    };

    let path = config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  gemini.api_key = {}", config::mask_key(api_key));
    if let Some(name) = &cfg.profile.teacher_name {
        println!("  profile.teacher_name = {name}");
    }
    if let Some(name) = &cfg.profile.school_name {
        println!("  profile.school_name = {name}");
    }
    println!();
    println!("Next: run `zimed serve` or `zimed scheme --teacher <NAME>`.");

    Ok(())
}

fn cmd_syllabus(grade: GradeLevel, subject: Subject) -> anyhow::Result<()> {
    let entry = syllabus::lookup(grade, subject)
        .with_context(|| format!("no syllabus entry for {grade} {subject}"))?;
    print!("{}", entry.render(grade));
    Ok(())
}

fn build_generator(cli_api_key: Option<&str>, cli_model: Option<&str>) -> anyhow::Result<Generator> {
    let resolved = ZimedConfig::resolve(cli_api_key, cli_model)?;
    let backend = GeminiBackend::new(resolved.gemini).context("failed to build Gemini client")?;
    tracing::debug!(model = %resolved.model, "using Gemini backend");
    Ok(Generator::new(Arc::new(backend), resolved.model))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let api_key = cli.api_key.as_deref();
    let model = cli.model.as_deref();

    match cli.command {
        Commands::Init {
            teacher,
            school,
            force,
        } => {
            cmd_init(api_key, teacher, school, force)?;
        }
        Commands::Scheme {
            teacher,
            grade,
            term,
            year,
            start_date,
            delay_ms,
            out,
        } => {
            let generator = build_generator(api_key, model)?;
            let args = SchemeArgs {
                teacher,
                grade,
                term,
                year,
                start_date,
                delay_ms,
            };
            let form = scheme_cmd::scheme_form(&args, &config::load_profile());
            scheme_cmd::run_scheme(&generator, form, args.delay_ms, out.as_deref()).await?;
        }
        Commands::Lesson {
            topic,
            teacher,
            grade,
            subject,
            context,
            date,
            duration,
            out,
        } => {
            let generator = build_generator(api_key, model)?;
            let args = LessonArgs {
                teacher,
                grade,
                subject,
                topic,
                context,
                date,
                duration,
            };
            let form = generate_cmd::lesson_form(args, &config::load_profile());
            generate_cmd::run_lesson(&generator, form, out.as_deref()).await?;
        }
        Commands::Flashcards {
            topic,
            grade,
            subject,
            count,
            out,
        } => {
            let generator = build_generator(api_key, model)?;
            let form = generate_cmd::flashcard_form(grade, subject, topic, count);
            generate_cmd::run_flashcards(&generator, form, out.as_deref()).await?;
        }
        Commands::Assessment {
            topic,
            grade,
            subject,
            kind,
            count,
            out,
        } => {
            let generator = build_generator(api_key, model)?;
            let form = generate_cmd::assessment_form(grade, subject, topic, kind, count);
            generate_cmd::run_assessment(&generator, form, out.as_deref()).await?;
        }
        Commands::Exam {
            school,
            grade,
            subject,
            term,
            year,
            duration,
            out,
        } => {
            let generator = build_generator(api_key, model)?;
            let args = ExamArgs {
                school,
                grade,
                subject,
                term,
                year,
                duration,
            };
            let form = generate_cmd::exam_form(args, &config::load_profile());
            generate_cmd::run_exam(&generator, form, out.as_deref()).await?;
        }
        Commands::Syllabus { grade, subject } => {
            cmd_syllabus(grade, subject)?;
        }
        Commands::Serve { bind, port } => {
            let generator = build_generator(api_key, model)?;
            let state = serve_cmd::AppState::new(generator, config::load_profile());
            serve_cmd::run_serve(state, &bind, port).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "zimed", &mut std::io::stdout());
        }
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_lenient_enum_flags() {
        let cli = Cli::try_parse_from([
            "zimed",
            "assessment",
            "Fractions",
            "--grade",
            "grade-4",
            "--subject",
            "maths",
            "--type",
            "mcq",
        ])
        .unwrap();
        match cli.command {
            Commands::Assessment {
                grade, subject, kind, ..
            } => {
                assert_eq!(grade, Some(GradeLevel::Grade4));
                assert_eq!(subject, Some(Subject::Math));
                assert_eq!(kind, Some(AssessmentType::MultipleChoice));
            }
            _ => panic!("expected assessment command"),
        }
    }

    #[test]
    fn global_api_key_is_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["zimed", "init", "--api-key", "k", "--teacher", "Mrs. Moyo"])
            .unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert!(matches!(cli.command, Commands::Init { force: false, .. }));
    }

    #[test]
    fn init_without_key_is_an_error() {
        let _guard = crate::test_util::lock_env();
        let err = cmd_init(None, None, None, false).unwrap_err();
        assert!(err.to_string().contains("--api-key"));
    }
}
