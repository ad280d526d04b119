pub mod json;
pub mod text;

/// Rounding applied only where scores are shown to people.
pub fn display_round(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}

pub fn format_score(v: f64) -> String {
    format!("{:.2}", display_round(v, 2))
}

pub fn format_unit(v: f64) -> String {
    format!("{:.4}", v)
}

pub fn score_band(overall: f64) -> &'static str {
    if overall >= 85.0 {
        "excellent"
    } else if overall >= 70.0 {
        "good"
    } else if overall >= 50.0 {
        "fair"
    } else {
        "needs work"
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
