use serde::{Deserialize, Serialize};

use crate::model::metrics::TranscriptMetrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetail {
    pub criterion: String,
    pub metric: String,
    pub weight: f64,
    pub score_normalized: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub overall_score: f64,
    pub details: Vec<ScoreDetail>,
    pub meta: TranscriptMetrics,
}
