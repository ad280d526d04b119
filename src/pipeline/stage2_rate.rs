use crate::model::ScoringProfile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechRate {
    pub duration_sec: u32,
    pub wpm: f64,
    pub estimated: bool,
}

pub fn estimate_duration_sec(word_count: u32, reference_wpm: f64) -> u32 {
    if !reference_wpm.is_finite() || reference_wpm <= 0.0 {
        return 0;
    }
    (word_count as f64 / reference_wpm * 60.0).round() as u32
}

pub fn words_per_minute(word_count: u32, duration_sec: u32) -> f64 {
    if duration_sec == 0 {
        return 0.0;
    }
    word_count as f64 / duration_sec as f64 * 60.0
}

/// A missing or zero duration is replaced by an estimate at the profile's
/// reference rate; the estimate is what gets reported.
pub fn run_stage2(word_count: u32, duration_sec: Option<u32>, profile: &ScoringProfile) -> SpeechRate {
    let (duration_sec, estimated) = match duration_sec {
        Some(d) if d > 0 => (d, false),
        _ => (estimate_duration_sec(word_count, profile.reference_wpm), true),
    };
    SpeechRate {
        duration_sec,
        wpm: words_per_minute(word_count, duration_sec),
        estimated,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_rate.rs"]
mod tests;
