use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{EvalError, EvalResult};
use crate::model::ScoringProfile;
use crate::rubric::defs::{builtin_records, default_flow_sections};
use crate::rubric::{
    Computation, FlowSpec, KeywordSpec, MetricType, Rubric, RubricCriterion, RubricRecord, WpmBand,
};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RubricDocument {
    List(Vec<RubricRecord>),
    Wrapped { criteria: Vec<RubricRecord> },
}

/// Loads and binds the rubric once at startup. `None` selects the built-in
/// rubric.
pub fn load_rubric(path: Option<&Path>, profile: &ScoringProfile) -> EvalResult<Rubric> {
    let records = match path {
        Some(path) => load_records(path)?,
        None => {
            info!("no rubric file given; using built-in rubric");
            builtin_records()
        }
    };
    bind_rubric(records, profile)
}

pub fn load_records(path: &Path) -> EvalResult<Vec<RubricRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        EvalError::config(format!("cannot read rubric {}: {e}", path.display()))
    })?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let records = match ext.as_deref() {
        Some("json") => parse_json_records(&text)?,
        Some("tsv") | Some("tab") => parse_tsv_records(&text)?,
        _ => {
            let first = text.trim_start().chars().next();
            if matches!(first, Some('[') | Some('{')) {
                parse_json_records(&text)?
            } else {
                parse_tsv_records(&text)?
            }
        }
    };
    debug!(
        path = %path.display(),
        records = records.len(),
        "rubric records read"
    );
    Ok(records)
}

pub fn parse_json_records(text: &str) -> EvalResult<Vec<RubricRecord>> {
    let doc: RubricDocument = serde_json::from_str(text)
        .map_err(|e| EvalError::config(format!("rubric JSON is malformed: {e}")))?;
    Ok(match doc {
        RubricDocument::List(records) => records,
        RubricDocument::Wrapped { criteria } => criteria,
    })
}

struct TsvColumns {
    name: usize,
    metric: usize,
    weight: usize,
    keywords: Option<usize>,
    must_have: Option<usize>,
    good_to_have: Option<usize>,
    reference: Option<usize>,
    description: Option<usize>,
    sections: Option<usize>,
}

pub fn parse_tsv_records(text: &str) -> EvalResult<Vec<RubricRecord>> {
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let (_, header_line) = lines
        .next()
        .ok_or_else(|| EvalError::config("rubric file is empty"))?;
    let header: Vec<String> = header_line
        .split('\t')
        .map(|s| s.trim().to_ascii_lowercase().replace([' ', '-'], "_"))
        .collect();

    let cols = TsvColumns {
        name: find_column(&header, &["name", "criterion", "criteria"])
            .ok_or_else(|| EvalError::config("rubric header has no name column"))?,
        metric: find_column(&header, &["metric_type", "metric"])
            .ok_or_else(|| EvalError::config("rubric header has no metric_type column"))?,
        weight: find_column(&header, &["weight", "weightage"])
            .ok_or_else(|| EvalError::config("rubric header has no weight column"))?,
        keywords: find_column(&header, &["keywords", "keyword"]),
        must_have: find_column(&header, &["must_have"]),
        good_to_have: find_column(&header, &["good_to_have"]),
        reference: find_column(&header, &["reference"]),
        description: find_column(&header, &["description", "scoring"]),
        sections: find_column(&header, &["sections"]),
    };

    let mut records = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        let cell = |col: usize| fields.get(col).copied().unwrap_or("");
        let opt_cell = |col: Option<usize>| col.map(|c| cell(c)).filter(|s| !s.is_empty());

        let name = cell(cols.name);
        if name.is_empty() {
            return Err(EvalError::config(format!(
                "rubric line {line_no}: criterion name is empty"
            )));
        }
        let weight_raw = cell(cols.weight);
        let weight = weight_raw.parse::<f64>().map_err(|_| {
            EvalError::config(format!(
                "rubric line {line_no}: weight {weight_raw:?} is not a number"
            ))
        })?;

        records.push(RubricRecord {
            name: name.to_string(),
            metric_type: cell(cols.metric).to_string(),
            weight,
            keywords: opt_cell(cols.keywords).map(split_list).unwrap_or_default(),
            must_have: opt_cell(cols.must_have).map(split_list).unwrap_or_default(),
            good_to_have: opt_cell(cols.good_to_have).map(split_list).unwrap_or_default(),
            reference: opt_cell(cols.reference).map(str::to_string),
            description: opt_cell(cols.description).map(str::to_string),
            sections: opt_cell(cols.sections).map(split_sections).unwrap_or_default(),
            ..RubricRecord::default()
        });
    }
    Ok(records)
}

fn find_column(header: &[String], names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|h| names.iter().any(|n| h.as_str() == *n))
}

fn split_list(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `hi|hello > my name is|i am > thank you`
fn split_sections(cell: &str) -> Vec<Vec<String>> {
    cell.split('>')
        .map(|section| {
            section
                .split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|markers| !markers.is_empty())
        .collect()
}

pub fn bind_rubric(records: Vec<RubricRecord>, profile: &ScoringProfile) -> EvalResult<Rubric> {
    if records.is_empty() {
        return Err(EvalError::config("rubric has no criteria"));
    }

    let mut criteria = Vec::with_capacity(records.len());
    let mut seen = BTreeSet::new();
    for record in records {
        let criterion = bind_criterion(record, profile)?;
        if !seen.insert(criterion.name.clone()) {
            warn!(criterion = %criterion.name, "duplicate criterion name in rubric");
        }
        criteria.push(criterion);
    }

    let total_weight: f64 = criteria.iter().map(|c| c.weight).sum();
    if !total_weight.is_finite() || total_weight <= 0.0 {
        return Err(EvalError::config(format!(
            "rubric total weight must be positive, got {total_weight}"
        )));
    }

    info!(
        criteria = criteria.len(),
        total_weight, "rubric loaded and frozen"
    );
    Ok(Rubric {
        criteria,
        total_weight,
    })
}

pub fn bind_criterion(record: RubricRecord, profile: &ScoringProfile) -> EvalResult<RubricCriterion> {
    let name = record.name.trim().to_string();
    if name.is_empty() {
        return Err(EvalError::config("criterion name is empty"));
    }
    let metric_type = MetricType::parse_label(&record.metric_type).ok_or_else(|| {
        EvalError::config(format!(
            "criterion {name:?}: unknown metric type {:?}",
            record.metric_type
        ))
    })?;
    if !record.weight.is_finite() || record.weight <= 0.0 {
        return Err(EvalError::config(format!(
            "criterion {name:?}: weight must be positive, got {}",
            record.weight
        )));
    }

    let computation = match metric_type {
        MetricType::Wpm => Computation::SpeechRate(bind_band(&name, &record, profile)?),
        MetricType::Ttr => Computation::TypeTokenRatio,
        MetricType::FillerRate => {
            let threshold = record.filler_threshold.unwrap_or(profile.filler_threshold);
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(EvalError::config(format!(
                    "criterion {name:?}: filler threshold must be positive"
                )));
            }
            Computation::FillerRate { threshold }
        }
        MetricType::Grammar => Computation::Grammar,
        MetricType::Sentiment => Computation::Sentiment,
        MetricType::Keyword => Computation::Keywords(bind_keywords(&record, profile)),
        MetricType::Flow => Computation::Flow(bind_flow(&name, &record)?),
        MetricType::SemanticSimilarity => Computation::Similarity {
            reference: non_empty(record.reference.as_deref())
                .or_else(|| non_empty(record.description.as_deref()))
                .unwrap_or(&name)
                .to_string(),
        },
        MetricType::Salutation => Computation::Salutation,
    };

    Ok(RubricCriterion {
        name,
        metric_type,
        weight: record.weight,
        computation,
    })
}

fn bind_band(name: &str, record: &RubricRecord, profile: &ScoringProfile) -> EvalResult<WpmBand> {
    let band = WpmBand {
        ideal_min: record.ideal_min_wpm.unwrap_or(profile.ideal_min_wpm),
        ideal_max: record.ideal_max_wpm.unwrap_or(profile.ideal_max_wpm),
        falloff: record.falloff_wpm.unwrap_or(profile.falloff_wpm),
    };
    let finite = band.ideal_min.is_finite() && band.ideal_max.is_finite() && band.falloff.is_finite();
    if !finite || band.ideal_min < 0.0 || band.ideal_min > band.ideal_max {
        return Err(EvalError::config(format!(
            "criterion {name:?}: invalid ideal WPM band {}..{}",
            band.ideal_min, band.ideal_max
        )));
    }
    if band.falloff <= 0.0 {
        return Err(EvalError::config(format!(
            "criterion {name:?}: WPM falloff must be positive"
        )));
    }
    Ok(band)
}

fn bind_keywords(record: &RubricRecord, profile: &ScoringProfile) -> KeywordSpec {
    let tiered = !record.must_have.is_empty() || !record.good_to_have.is_empty();
    let mut must_have = clean_phrases(&record.must_have);
    must_have.extend(clean_phrases(&record.keywords));
    KeywordSpec {
        must_have,
        good_to_have: clean_phrases(&record.good_to_have),
        must_weight: if tiered { profile.must_have_weight } else { 1.0 },
        reference: non_empty(record.reference.as_deref()).map(str::to_string),
    }
}

fn bind_flow(name: &str, record: &RubricRecord) -> EvalResult<FlowSpec> {
    let sections = if record.sections.is_empty() {
        default_flow_sections()
    } else {
        record
            .sections
            .iter()
            .map(|markers| clean_phrases(markers))
            .collect::<Vec<_>>()
    };
    if sections.len() < 2 || sections.iter().any(|markers| markers.is_empty()) {
        return Err(EvalError::config(format!(
            "criterion {name:?}: flow needs at least two sections with markers"
        )));
    }
    Ok(FlowSpec {
        sections,
        reference: non_empty(record.reference.as_deref()).map(str::to_string),
    })
}

fn clean_phrases(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
