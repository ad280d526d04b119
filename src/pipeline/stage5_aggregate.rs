use crate::error::{EvalError, EvalResult};
use crate::rubric::Rubric;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage5Output {
    pub overall_score: f64,
    pub weighted_sum: f64,
    pub total_weight: f64,
}

const SCORE_EPS: f64 = 1e-9;

/// Weighted mean of the normalized scores, scaled to 0..100. Scores must be
/// finite and in [0,1]; anything else is an internal failure.
pub fn run_stage5(rubric: &Rubric, scores: &[f64]) -> EvalResult<Stage5Output> {
    if scores.len() != rubric.len() {
        return Err(EvalError::computation(format!(
            "expected {} criterion scores, got {}",
            rubric.len(),
            scores.len()
        )));
    }

    let mut weighted_sum = 0f64;
    let mut total_weight = 0f64;
    for (criterion, &score) in rubric.criteria().iter().zip(scores) {
        if !score.is_finite() || score < -SCORE_EPS || score > 1.0 + SCORE_EPS {
            return Err(EvalError::computation(format!(
                "criterion {:?} produced invalid score {score}",
                criterion.name
            )));
        }
        weighted_sum += criterion.weight * score;
        total_weight += criterion.weight;
    }

    if !total_weight.is_finite() || total_weight <= 0.0 {
        return Err(EvalError::computation(format!(
            "total weight {total_weight} is not positive"
        )));
    }
    let overall = weighted_sum / total_weight * 100.0;
    if !overall.is_finite() {
        return Err(EvalError::computation("overall score is not finite"));
    }

    Ok(Stage5Output {
        overall_score: overall.clamp(0.0, 100.0),
        weighted_sum,
        total_weight,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_aggregate.rs"]
mod tests;
