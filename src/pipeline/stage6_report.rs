use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::model::{Diagnostics, EvaluationResult, ScoreDetail, TranscriptMetrics};
use crate::pipeline::stage5_aggregate::Stage5Output;
use crate::report::json::{render_diagnostics_json, render_result_json};
use crate::report::text::render_report_text;
use crate::rubric::Rubric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Json,
    Text,
    Both,
}

/// One detail per criterion in rubric order; nothing is dropped, degraded
/// criteria included.
pub fn build_result(
    rubric: &Rubric,
    scores: &[f64],
    aggregate: &Stage5Output,
    meta: TranscriptMetrics,
) -> EvaluationResult {
    let details = rubric
        .criteria()
        .iter()
        .zip(scores)
        .map(|(criterion, &score)| ScoreDetail {
            criterion: criterion.name.clone(),
            metric: criterion.metric_type.label().to_string(),
            weight: criterion.weight,
            score_normalized: score,
        })
        .collect();

    EvaluationResult {
        overall_score: aggregate.overall_score,
        details,
        meta,
    }
}

pub fn write_reports(
    result: &EvaluationResult,
    diagnostics: &Diagnostics,
    out_dir: &Path,
    format: ReportFormat,
) -> std::io::Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    if matches!(format, ReportFormat::Json | ReportFormat::Both) {
        let summary_path = out_dir.join("summary.json");
        let json = render_result_json(result).map_err(std::io::Error::other)?;
        write_text(&summary_path, &json)?;
        written.push(summary_path);

        let diagnostics_path = out_dir.join("diagnostics.json");
        let json = render_diagnostics_json(diagnostics).map_err(std::io::Error::other)?;
        write_text(&diagnostics_path, &json)?;
        written.push(diagnostics_path);
    }

    if matches!(format, ReportFormat::Text | ReportFormat::Both) {
        let report_path = out_dir.join("report.txt");
        write_text(&report_path, &render_report_text(result, diagnostics))?;
        written.push(report_path);
    }

    info!(out_dir = %out_dir.display(), files = written.len(), "reports written");
    Ok(written)
}

fn write_text(path: &Path, content: &str) -> std::io::Result<()> {
    let mut body = content.to_string();
    if !body.ends_with('\n') {
        body.push('\n');
    }
    fs::write(path, body)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_report.rs"]
mod tests;
