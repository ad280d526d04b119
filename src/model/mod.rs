pub mod diagnostics;
pub mod metrics;
pub mod profile;
pub mod result;

pub use diagnostics::{Diagnostics, Signal};
pub use metrics::TranscriptMetrics;
pub use profile::ScoringProfile;
pub use result::{EvaluationResult, ScoreDetail};

pub fn clip01(x: f64) -> f64 {
    if x < 0.0 {
        0.0
    } else if x > 1.0 {
        1.0
    } else {
        x
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/tests.rs"]
mod tests;
