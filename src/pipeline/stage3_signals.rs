use tracing::debug;

use crate::model::{Diagnostics, ScoringProfile, Signal, clip01};
use crate::signals::{Collaborators, GrammarChecker, SentimentClassifier};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrammarSignal {
    pub errors: u32,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage3Output {
    pub grammar: GrammarSignal,
    pub sentiment: f64,
}

/// Inverse error density, clamped so short texts with many flagged issues
/// stay at 0.
pub fn grammar_score(errors: u32, word_count: u32) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    clip01(1.0 - errors as f64 / word_count as f64)
}

pub fn score_grammar(
    checker: &dyn GrammarChecker,
    text: &str,
    word_count: u32,
    diagnostics: &mut Diagnostics,
) -> GrammarSignal {
    let errors = match checker.count_issues(text) {
        Ok(n) => n,
        Err(err) => {
            diagnostics.record_degraded(Signal::Grammar, err.to_string());
            0
        }
    };
    GrammarSignal {
        errors,
        score: grammar_score(errors, word_count),
    }
}

/// Leading span of at most `max_chars` characters, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

pub fn score_sentiment(
    classifier: &dyn SentimentClassifier,
    text: &str,
    neutral: f64,
    diagnostics: &mut Diagnostics,
) -> f64 {
    let (input, truncated) = truncate_chars(text, classifier.max_input_chars());
    if truncated {
        debug!(
            limit = classifier.max_input_chars(),
            "sentiment input truncated"
        );
        diagnostics.sentiment_truncated = true;
    }
    match classifier.positivity(input) {
        Ok(p) if p.is_finite() => clip01(p),
        Ok(p) => {
            diagnostics.record_degraded(
                Signal::Sentiment,
                format!("{} returned non-finite probability {p}", classifier.name()),
            );
            neutral
        }
        Err(err) => {
            diagnostics.record_degraded(Signal::Sentiment, err.to_string());
            neutral
        }
    }
}

pub fn run_stage3(
    collaborators: &Collaborators,
    text: &str,
    word_count: u32,
    profile: &ScoringProfile,
    diagnostics: &mut Diagnostics,
) -> Stage3Output {
    let grammar = score_grammar(collaborators.grammar.as_ref(), text, word_count, diagnostics);
    let sentiment = score_sentiment(
        collaborators.sentiment.as_ref(),
        text,
        profile.neutral_sentiment,
        diagnostics,
    );
    debug!(
        grammar_errors = grammar.errors,
        grammar_score = grammar.score,
        sentiment,
        "signals scored"
    );
    Stage3Output { grammar, sentiment }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_signals.rs"]
mod tests;
