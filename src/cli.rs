//! Command-line front end: argument parsing, collaborator wiring and file IO.
//!
//! `src/main.rs` only maps the outcome of [`run`] to an exit code.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use crate::engine::{Engine, EvaluationRequest};
use crate::error::EvalError;
use crate::logging::init_tracing;
use crate::model::ScoringProfile;
use crate::pipeline::stage6_report::{ReportFormat, write_reports};
use crate::report::json::render_result_json;
use crate::report::text::render_report_text;
use crate::rubric::loader::load_rubric;
use crate::signals::{
    Collaborators, GrammarChecker, HashedBowEmbedder, LexiconSentiment, RuleGrammarChecker,
    SentimentClassifier, TimeBoxed, Unavailable,
};

#[derive(Debug, Parser)]
#[command(
    name = "kira-commscore",
    version,
    about = "Rubric-driven communication scoring for speech transcripts"
)]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score one transcript.
    Run(RunArgs),
    /// Load and validate a rubric, then print it as resolved.
    Rubric(RubricArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Transcript file, or `-` for stdin.
    #[arg(long)]
    pub transcript: PathBuf,

    /// Spoken duration in seconds; estimated from the word count when absent.
    #[arg(long)]
    pub duration: Option<String>,

    /// Rubric file (.json or .tsv). The built-in rubric is used when absent.
    #[arg(long)]
    pub rubric: Option<PathBuf>,

    /// Directory for summary.json, diagnostics.json and report.txt. Without
    /// it the result goes to stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ReportFormat::Both)]
    pub format: ReportFormat,

    #[arg(long, default_value_t = 2000)]
    pub grammar_timeout_ms: u64,

    #[arg(long, default_value_t = 2000)]
    pub sentiment_timeout_ms: u64,

    #[arg(long, default_value_t = 2000)]
    pub embed_timeout_ms: u64,

    /// Treat the grammar checker as unavailable.
    #[arg(long)]
    pub no_grammar: bool,

    /// Treat the sentiment classifier as unavailable.
    #[arg(long)]
    pub no_sentiment: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RubricArgs {
    #[arg(long)]
    pub rubric: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot render JSON: {0}")]
    Render(#[from] serde_json::Error),
}

impl CliError {
    fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        CliError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Eval(EvalError::Input(_)) => 2,
            CliError::Eval(EvalError::Configuration(_)) => 3,
            CliError::Eval(EvalError::Computation(_)) => 4,
            CliError::Render(_) => 4,
            CliError::Io { .. } => 1,
        }
    }
}

pub fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    execute(cli.command)
}

pub fn execute(command: Command) -> Result<(), CliError> {
    match command {
        Command::Run(args) => handle_run(&args),
        Command::Rubric(args) => handle_rubric(&args),
    }
}

fn handle_run(args: &RunArgs) -> Result<(), CliError> {
    let profile = ScoringProfile::default_v1();
    let rubric = load_rubric(args.rubric.as_deref(), &profile)?;
    let engine = Engine::new(Arc::new(rubric), build_collaborators(args), profile);

    let transcript = read_transcript(&args.transcript)?;
    let mut request = EvaluationRequest::new(transcript);
    if let Some(duration) = &args.duration {
        request = request.with_duration(duration.as_str());
    }
    let evaluation = engine.evaluate(&request)?;

    match &args.out {
        Some(dir) => {
            let written = write_reports(&evaluation.result, &evaluation.diagnostics, dir, args.format)
                .map_err(|e| CliError::io(format!("cannot write reports to {}", dir.display()), e))?;
            for path in written {
                info!(path = %path.display(), "wrote");
            }
        }
        None => match args.format {
            ReportFormat::Text => {
                print!(
                    "{}",
                    render_report_text(&evaluation.result, &evaluation.diagnostics)
                );
            }
            ReportFormat::Json | ReportFormat::Both => {
                println!("{}", render_result_json(&evaluation.result)?);
            }
        },
    }
    Ok(())
}

fn handle_rubric(args: &RubricArgs) -> Result<(), CliError> {
    let rubric = load_rubric(args.rubric.as_deref(), &ScoringProfile::default_v1())?;
    println!("{}", serde_json::to_string_pretty(&rubric)?);
    Ok(())
}

/// Reference collaborators, each bounded by its timeout; the `--no-*` flags
/// swap in an unavailable stand-in.
pub fn build_collaborators(args: &RunArgs) -> Collaborators {
    let grammar: Arc<dyn GrammarChecker> = if args.no_grammar {
        Arc::new(Unavailable::new("grammar checker"))
    } else {
        Arc::new(TimeBoxed::new(
            Arc::new(RuleGrammarChecker),
            Duration::from_millis(args.grammar_timeout_ms),
        ))
    };
    let sentiment: Arc<dyn SentimentClassifier> = if args.no_sentiment {
        Arc::new(Unavailable::new("sentiment classifier"))
    } else {
        Arc::new(TimeBoxed::new(
            Arc::new(LexiconSentiment),
            Duration::from_millis(args.sentiment_timeout_ms),
        ))
    };
    let embedder = Arc::new(TimeBoxed::new(
        Arc::new(HashedBowEmbedder::default()),
        Duration::from_millis(args.embed_timeout_ms),
    ));
    Collaborators {
        grammar,
        sentiment,
        embedder,
    }
}

pub fn read_transcript(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| CliError::io("cannot read transcript from stdin", e))?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read transcript {}", path.display()), e))
}

#[cfg(test)]
#[path = "../tests/src_inline/cli/tests.rs"]
mod tests;
