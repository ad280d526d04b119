//! Request validation and the per-request pipeline.
//!
//! An [`Engine`] is built once from a frozen rubric and a collaborator set and
//! can then serve any number of evaluations, from any thread.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{EvalError, EvalResult};
use crate::model::{Diagnostics, EvaluationResult, ScoringProfile, TranscriptMetrics};
use crate::pipeline::stage1_lexical::run_stage1;
use crate::pipeline::stage2_rate::run_stage2;
use crate::pipeline::stage3_signals::run_stage3;
use crate::pipeline::stage4_normalize::{Stage4Inputs, run_stage4};
use crate::pipeline::stage5_aggregate::run_stage5;
use crate::pipeline::stage6_report::build_result;
use crate::rubric::Rubric;
use crate::signals::Collaborators;

/// Duration as it arrives from a caller: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DurationInput {
    Seconds(f64),
    Text(String),
}

impl From<f64> for DurationInput {
    fn from(v: f64) -> Self {
        DurationInput::Seconds(v)
    }
}

impl From<u32> for DurationInput {
    fn from(v: u32) -> Self {
        DurationInput::Seconds(v as f64)
    }
}

impl From<&str> for DurationInput {
    fn from(v: &str) -> Self {
        DurationInput::Text(v.to_string())
    }
}

impl From<String> for DurationInput {
    fn from(v: String) -> Self {
        DurationInput::Text(v)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvaluationRequest {
    pub transcript: String,
    #[serde(default)]
    pub duration: Option<DurationInput>,
}

impl EvaluationRequest {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: impl Into<DurationInput>) -> Self {
        self.duration = Some(duration.into());
        self
    }
}

/// Whole seconds, rounded to nearest. An empty string means "not given".
pub fn parse_duration(input: Option<&DurationInput>) -> EvalResult<Option<u32>> {
    let seconds = match input {
        None => return Ok(None),
        Some(DurationInput::Seconds(v)) => *v,
        Some(DurationInput::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<f64>()
                .map_err(|_| EvalError::input(format!("duration {s:?} is not a number")))?
        }
    };

    if !seconds.is_finite() {
        return Err(EvalError::input(format!("duration {seconds} is not finite")));
    }
    if seconds < 0.0 {
        return Err(EvalError::input(format!("duration {seconds} is negative")));
    }
    let rounded = seconds.round();
    if rounded > u32::MAX as f64 {
        return Err(EvalError::input(format!("duration {seconds} is too large")));
    }
    Ok(Some(rounded as u32))
}

/// Transcript with runs of whitespace collapsed to single spaces.
pub fn clean_transcript(raw: &str) -> EvalResult<String> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return Err(EvalError::input("transcript is empty"));
    }
    Ok(cleaned)
}

/// Result plus its side channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub result: EvaluationResult,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone)]
pub struct Engine {
    rubric: Arc<Rubric>,
    collaborators: Collaborators,
    profile: ScoringProfile,
}

impl Engine {
    pub fn new(rubric: Arc<Rubric>, collaborators: Collaborators, profile: ScoringProfile) -> Self {
        Self {
            rubric,
            collaborators,
            profile,
        }
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    pub fn evaluate(&self, request: &EvaluationRequest) -> EvalResult<Evaluation> {
        let text = clean_transcript(&request.transcript)?;
        let duration = parse_duration(request.duration.as_ref())?;
        let mut diagnostics = Diagnostics::default();

        let lexical = run_stage1(&text);
        debug!(
            word_count = lexical.word_count,
            ttr = lexical.ttr,
            fillers = lexical.filler_count,
            "lexical stats"
        );

        let rate = run_stage2(lexical.word_count, duration, &self.profile);
        diagnostics.duration_estimated = rate.estimated;
        if rate.estimated {
            debug!(duration_sec = rate.duration_sec, "duration estimated");
        }

        let signals = run_stage3(
            &self.collaborators,
            &text,
            lexical.word_count,
            &self.profile,
            &mut diagnostics,
        );

        let metrics = TranscriptMetrics {
            word_count: lexical.word_count,
            duration_sec: rate.duration_sec,
            wpm: rate.wpm,
            ttr: lexical.ttr,
            grammar_score: signals.grammar.score,
            grammar_errors: signals.grammar.errors,
            filler_rate_per_100: lexical.filler_rate_per_100,
            sentiment: signals.sentiment,
        };

        let inputs = Stage4Inputs {
            text: &text,
            metrics: &metrics,
            embedder: self.collaborators.embedder.as_ref(),
        };
        let scores = run_stage4(&self.rubric, &inputs, &mut diagnostics);
        let aggregate = run_stage5(&self.rubric, &scores)?;
        let result = build_result(&self.rubric, &scores, &aggregate, metrics);

        info!(
            overall_score = result.overall_score,
            criteria = result.details.len(),
            degraded = diagnostics.degraded.len(),
            fallbacks = diagnostics.fallbacks.len(),
            "evaluation complete"
        );
        Ok(Evaluation {
            result,
            diagnostics,
        })
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/engine/tests.rs"]
mod tests;
