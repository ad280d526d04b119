use crate::model::{Diagnostics, EvaluationResult};
use crate::report::{format_score, format_unit, score_band};

pub fn render_report_text(result: &EvaluationResult, diagnostics: &Diagnostics) -> String {
    let mut out = String::new();

    out.push_str("Communication Score Report\n");
    out.push_str("==========================\n\n");

    out.push_str(&format!(
        "Overall score: {} / 100 ({})\n\n",
        format_score(result.overall_score),
        score_band(result.overall_score)
    ));

    out.push_str("1. Criteria\n");
    let name_width = result
        .details
        .iter()
        .map(|d| d.criterion.chars().count())
        .max()
        .unwrap_or(0)
        .max("criterion".len());
    out.push_str(&format!(
        "{:<name_width$}  {:<19}  {:>7}  {:>6}\n",
        "criterion", "metric", "weight", "score"
    ));
    for d in &result.details {
        out.push_str(&format!(
            "{:<name_width$}  {:<19}  {:>7}  {:>6}\n",
            d.criterion,
            d.metric,
            format_score(d.weight),
            format_score(d.score_normalized * 100.0)
        ));
    }
    out.push('\n');

    let m = &result.meta;
    out.push_str("2. Transcript metrics\n");
    out.push_str(&format!("Words: {}\n", m.word_count));
    out.push_str(&format!(
        "Duration: {} s{}\n",
        m.duration_sec,
        if diagnostics.duration_estimated {
            " (estimated)"
        } else {
            ""
        }
    ));
    out.push_str(&format!("Speech rate: {} wpm\n", format_score(m.wpm)));
    out.push_str(&format!("Type-token ratio: {}\n", format_unit(m.ttr)));
    out.push_str(&format!(
        "Grammar: {} ({} issues)\n",
        format_unit(m.grammar_score),
        m.grammar_errors
    ));
    out.push_str(&format!(
        "Filler rate: {} per 100 words\n",
        format_score(m.filler_rate_per_100)
    ));
    out.push_str(&format!("Sentiment: {}\n\n", format_unit(m.sentiment)));

    out.push_str("3. Diagnostics\n");
    if diagnostics.is_clean() {
        out.push_str("All signals available.\n");
    }
    for d in &diagnostics.degraded {
        out.push_str(&format!("Degraded {}: {}\n", d.signal.as_str(), d.reason));
    }
    for f in &diagnostics.fallbacks {
        out.push_str(&format!(
            "Semantic fallback for {:?}: {}\n",
            f.criterion, f.reason
        ));
    }
    if diagnostics.sentiment_truncated {
        out.push_str("Note: sentiment was scored on the leading part of the transcript only.\n");
    }

    out
}
