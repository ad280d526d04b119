use serde::{Deserialize, Serialize};

/// Per-request raw metrics, serialized as the `meta` block of the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMetrics {
    pub word_count: u32,
    pub duration_sec: u32,
    pub wpm: f64,
    pub ttr: f64,
    pub grammar_score: f64,
    pub grammar_errors: u32,
    pub filler_rate_per_100: f64,
    pub sentiment: f64,
}
