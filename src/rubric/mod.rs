//! Rubric definitions and their load-time binding.
//!
//! A rubric goes through load -> validate -> freeze: raw [`RubricRecord`]s are
//! bound to a [`Computation`] each, and the resulting [`Rubric`] has no
//! mutators. Engines share it behind an `Arc`.

pub mod defs;
pub mod loader;

use serde::{Deserialize, Serialize};

pub use defs::MetricType;

/// One criterion as it appears in a rubric file, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RubricRecord {
    #[serde(alias = "criterion", alias = "criteria")]
    pub name: String,
    #[serde(alias = "metric")]
    pub metric_type: String,
    #[serde(alias = "weightage")]
    pub weight: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub must_have: Vec<String>,
    #[serde(default)]
    pub good_to_have: Vec<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ideal_min_wpm: Option<f64>,
    #[serde(default)]
    pub ideal_max_wpm: Option<f64>,
    #[serde(default)]
    pub falloff_wpm: Option<f64>,
    #[serde(default)]
    pub filler_threshold: Option<f64>,
    #[serde(default)]
    pub sections: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WpmBand {
    pub ideal_min: f64,
    pub ideal_max: f64,
    pub falloff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordSpec {
    pub must_have: Vec<String>,
    pub good_to_have: Vec<String>,
    pub must_weight: f64,
    pub reference: Option<String>,
}

impl KeywordSpec {
    pub fn is_empty(&self) -> bool {
        self.must_have.is_empty() && self.good_to_have.is_empty()
    }

    pub fn keyword_phrase(&self) -> String {
        self.must_have
            .iter()
            .chain(self.good_to_have.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSpec {
    pub sections: Vec<Vec<String>>,
    pub reference: Option<String>,
}

/// The concrete computation a criterion is bound to at load time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Computation {
    SpeechRate(WpmBand),
    TypeTokenRatio,
    FillerRate { threshold: f64 },
    Grammar,
    Sentiment,
    Keywords(KeywordSpec),
    Flow(FlowSpec),
    Similarity { reference: String },
    Salutation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricCriterion {
    pub name: String,
    pub metric_type: MetricType,
    pub weight: f64,
    pub computation: Computation,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rubric {
    criteria: Vec<RubricCriterion>,
    total_weight: f64,
}

impl Rubric {
    pub fn criteria(&self) -> &[RubricCriterion] {
        &self.criteria
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/rubric/tests.rs"]
mod tests;
