use crate::model::{Diagnostics, EvaluationResult};

/// The response contract, full precision.
pub fn render_result_json(result: &EvaluationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

pub fn render_diagnostics_json(diagnostics: &Diagnostics) -> serde_json::Result<String> {
    serde_json::to_string_pretty(diagnostics)
}
