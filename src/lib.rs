//! Rubric-driven scoring of spoken self-introductions.
//!
//! A transcript (plus an optional duration) goes through six stages: lexical
//! statistics, speech rate, external signals, per-criterion normalization,
//! weighted aggregation and report assembly. See [`engine::Engine`].

pub mod cli;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod rubric;
pub mod signals;

pub use engine::{DurationInput, Engine, Evaluation, EvaluationRequest};
pub use error::{EvalError, EvalResult};
pub use model::{Diagnostics, EvaluationResult, ScoreDetail, ScoringProfile, TranscriptMetrics};
pub use rubric::Rubric;
pub use signals::Collaborators;

#[cfg(test)]
#[path = "../tests/src_inline/stubs.rs"]
pub(crate) mod test_stubs;
