/// Numeric defaults for normalization. Criterion parameters in the rubric
/// override the band and threshold values when a criterion is bound.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringProfile {
    pub reference_wpm: f64,
    pub ideal_min_wpm: f64,
    pub ideal_max_wpm: f64,
    pub falloff_wpm: f64,
    pub filler_threshold: f64,
    pub must_have_weight: f64,
    pub neutral_sentiment: f64,
}

impl ScoringProfile {
    pub fn default_v1() -> Self {
        Self {
            reference_wpm: 120.0,
            ideal_min_wpm: 110.0,
            ideal_max_wpm: 150.0,
            falloff_wpm: 50.0,
            filler_threshold: 8.0,
            must_have_weight: 0.7,
            neutral_sentiment: 0.5,
        }
    }
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::default_v1()
    }
}
