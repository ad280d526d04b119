use tracing::debug;

use crate::model::{Diagnostics, Signal, TranscriptMetrics, clip01};
use crate::pipeline::stage1_lexical::{fold_case, normalize_token, tokenize};
use crate::rubric::{Computation, FlowSpec, KeywordSpec, Rubric, RubricCriterion, WpmBand};
use crate::signals::semantic::map_cosine;
use crate::signals::{Embedder, SemanticSimilarityScorer};

pub struct Stage4Inputs<'a> {
    pub text: &'a str,
    pub metrics: &'a TranscriptMetrics,
    pub embedder: &'a dyn Embedder,
}

/// One normalized score per criterion, in rubric order.
pub fn run_stage4(
    rubric: &Rubric,
    inputs: &Stage4Inputs<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<f64> {
    let text_lower = fold_case(inputs.text);
    let words: Vec<String> = tokenize(inputs.text)
        .into_iter()
        .map(normalize_token)
        .collect();
    let similarity = SemanticSimilarityScorer::new(inputs.embedder);

    let mut scores = Vec::with_capacity(rubric.len());
    for criterion in rubric.criteria() {
        let score = normalize_criterion(
            criterion,
            inputs,
            &text_lower,
            &words,
            &similarity,
            diagnostics,
        );
        debug!(criterion = %criterion.name, score, "criterion normalized");
        scores.push(score);
    }
    scores
}

fn normalize_criterion(
    criterion: &RubricCriterion,
    inputs: &Stage4Inputs<'_>,
    text_lower: &str,
    words: &[String],
    similarity: &SemanticSimilarityScorer<'_>,
    diagnostics: &mut Diagnostics,
) -> f64 {
    let metrics = inputs.metrics;
    match &criterion.computation {
        Computation::SpeechRate(band) => normalize_wpm(metrics.wpm, band),
        Computation::TypeTokenRatio => clip01(metrics.ttr),
        Computation::FillerRate { threshold } => {
            normalize_filler(metrics.filler_rate_per_100, *threshold)
        }
        Computation::Grammar => clip01(metrics.grammar_score),
        Computation::Sentiment => clip01(metrics.sentiment),
        Computation::Keywords(spec) => match keyword_coverage(text_lower, spec) {
            Some(score) => score,
            None if spec.is_empty() => {
                diagnostics.record_fallback(&criterion.name, "keyword list is empty");
                semantic_score(criterion, inputs.text, &criterion.name, similarity, diagnostics)
            }
            None => {
                let reference = spec.reference.clone().unwrap_or_else(|| spec.keyword_phrase());
                let score =
                    semantic_score(criterion, inputs.text, &reference, similarity, diagnostics);
                related_or_zero(criterion, "no keyword present", score, diagnostics)
            }
        },
        Computation::Flow(spec) => match flow_tier(text_lower, spec) {
            Some(score) => score,
            None => {
                let reference = spec
                    .reference
                    .clone()
                    .unwrap_or_else(|| criterion.name.clone());
                let score =
                    semantic_score(criterion, inputs.text, &reference, similarity, diagnostics);
                related_or_zero(criterion, "no section marker present", score, diagnostics)
            }
        },
        Computation::Similarity { reference } => {
            semantic_score(criterion, inputs.text, reference, similarity, diagnostics)
        }
        Computation::Salutation => salutation_tier(text_lower, words),
    }
}

/// A criterion that has content to look for but found none keeps its
/// similarity score only when it shows actual relatedness (cosine above 0).
/// Anything else scores 0, below a partial literal match.
fn related_or_zero(
    criterion: &RubricCriterion,
    reason: &str,
    score: f64,
    diagnostics: &mut Diagnostics,
) -> f64 {
    if score > map_cosine(0.0) {
        diagnostics.record_fallback(&criterion.name, format!("{reason}; semantically related"));
        score
    } else {
        diagnostics.record_fallback(&criterion.name, format!("{reason}; not related"));
        0.0
    }
}

fn semantic_score(
    criterion: &RubricCriterion,
    text: &str,
    reference: &str,
    similarity: &SemanticSimilarityScorer<'_>,
    diagnostics: &mut Diagnostics,
) -> f64 {
    let sim = similarity.similarity(text, reference);
    if let Some(reason) = sim.degraded {
        diagnostics.record_degraded(
            Signal::Similarity,
            format!("criterion {:?}: {reason}", criterion.name),
        );
    }
    sim.score
}

/// 1.0 inside the ideal band, linear falloff outside, clamped at 0.
pub fn normalize_wpm(wpm: f64, band: &WpmBand) -> f64 {
    let distance = if wpm < band.ideal_min {
        band.ideal_min - wpm
    } else if wpm > band.ideal_max {
        wpm - band.ideal_max
    } else {
        0.0
    };
    clip01(1.0 - distance / band.falloff)
}

pub fn normalize_filler(rate_per_100: f64, threshold: f64) -> f64 {
    clip01(1.0 - rate_per_100 / threshold)
}

/// `None` when there is no deterministic signal: no keywords configured, or
/// none of them present.
pub fn keyword_coverage(text_lower: &str, spec: &KeywordSpec) -> Option<f64> {
    if spec.is_empty() {
        return None;
    }
    let found = |list: &[String]| list.iter().filter(|k| text_lower.contains(k.as_str())).count();
    let found_must = found(&spec.must_have);
    let found_good = found(&spec.good_to_have);
    if found_must + found_good == 0 {
        return None;
    }

    let fraction = |hit: usize, total: usize| {
        if total == 0 {
            1.0
        } else {
            hit as f64 / total as f64
        }
    };
    let must = fraction(found_must, spec.must_have.len());
    let good = fraction(found_good, spec.good_to_have.len());
    Some(clip01(
        spec.must_weight * must + (1.0 - spec.must_weight) * good,
    ))
}

/// First whole-phrase occurrence of `phrase` in `text`.
pub fn find_phrase(text: &str, phrase: &str) -> Option<usize> {
    if phrase.is_empty() {
        return None;
    }
    text.match_indices(phrase).map(|(idx, _)| idx).find(|&idx| {
        let before = text[..idx].chars().next_back();
        let after = text[idx + phrase.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// 1.0 when every section appears in order, 0.5 when at least two appear but
/// the order is broken or a section is missing, 0.0 with a single section.
/// `None` when no section marker appears at all.
pub fn flow_tier(text_lower: &str, spec: &FlowSpec) -> Option<f64> {
    let positions: Vec<Option<usize>> = spec
        .sections
        .iter()
        .map(|markers| markers.iter().filter_map(|m| find_phrase(text_lower, m)).min())
        .collect();
    let found: Vec<usize> = positions.iter().flatten().copied().collect();
    if found.is_empty() {
        return None;
    }
    let all_present = found.len() == positions.len();
    let ordered = found.windows(2).all(|w| w[0] < w[1]);
    Some(if all_present && ordered {
        1.0
    } else if found.len() >= 2 {
        0.5
    } else {
        0.0
    })
}

const ENTHUSIASTIC_GREETINGS: &[&str] = &["i am excited", "pleased to meet", "delighted"];
const FORMAL_GREETINGS: &[&str] = &["good morning", "good afternoon", "good evening"];
const CASUAL_GREETINGS: &[&str] = &["hi", "hello"];

pub fn salutation_tier(text_lower: &str, words: &[String]) -> f64 {
    let has_any = |phrases: &[&str]| phrases.iter().any(|p| find_phrase(text_lower, p).is_some());
    if has_any(ENTHUSIASTIC_GREETINGS) {
        1.0
    } else if has_any(FORMAL_GREETINGS) {
        0.8
    } else if words.iter().any(|w| CASUAL_GREETINGS.contains(&w.as_str())) {
        0.4
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_normalize.rs"]
mod tests;
