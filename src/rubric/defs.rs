use serde::Serialize;

use crate::rubric::RubricRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    Wpm,
    Ttr,
    FillerRate,
    Grammar,
    Sentiment,
    Keyword,
    Flow,
    SemanticSimilarity,
    Salutation,
}

impl MetricType {
    pub fn label(self) -> &'static str {
        match self {
            MetricType::Wpm => "WPM",
            MetricType::Ttr => "TTR",
            MetricType::FillerRate => "FILLER_RATE",
            MetricType::Grammar => "GRAMMAR",
            MetricType::Sentiment => "SENTIMENT",
            MetricType::Keyword => "KEYWORD",
            MetricType::Flow => "FLOW",
            MetricType::SemanticSimilarity => "SEMANTIC_SIMILARITY",
            MetricType::Salutation => "SALUTATION",
        }
    }

    /// Lenient label parsing for hand-maintained rubric sheets.
    pub fn parse_label(raw: &str) -> Option<Self> {
        let key = normalize_label(raw);
        for (alias, metric) in METRIC_ALIASES {
            if *alias == key {
                return Some(*metric);
            }
        }
        None
    }
}

fn normalize_label(raw: &str) -> String {
    raw.to_ascii_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

const METRIC_ALIASES: &[(&str, MetricType)] = &[
    ("wpm", MetricType::Wpm),
    ("words per minute", MetricType::Wpm),
    ("speech rate", MetricType::Wpm),
    ("rate", MetricType::Wpm),
    ("pace", MetricType::Wpm),
    ("ttr", MetricType::Ttr),
    ("type token ratio", MetricType::Ttr),
    ("vocabulary", MetricType::Ttr),
    ("vocabulary richness", MetricType::Ttr),
    ("lexical diversity", MetricType::Ttr),
    ("filler rate", MetricType::FillerRate),
    ("filler", MetricType::FillerRate),
    ("filler words", MetricType::FillerRate),
    ("filler word rate", MetricType::FillerRate),
    ("clarity", MetricType::FillerRate),
    ("grammar", MetricType::Grammar),
    ("language", MetricType::Grammar),
    ("language grammar", MetricType::Grammar),
    ("grammar errors", MetricType::Grammar),
    ("sentiment", MetricType::Sentiment),
    ("engagement", MetricType::Sentiment),
    ("positivity", MetricType::Sentiment),
    ("keyword", MetricType::Keyword),
    ("keywords", MetricType::Keyword),
    ("key words", MetricType::Keyword),
    ("keyword presence", MetricType::Keyword),
    ("flow", MetricType::Flow),
    ("structure", MetricType::Flow),
    ("order", MetricType::Flow),
    ("semantic similarity", MetricType::SemanticSimilarity),
    ("semantic", MetricType::SemanticSimilarity),
    ("similarity", MetricType::SemanticSimilarity),
    ("salutation", MetricType::Salutation),
    ("salutation level", MetricType::Salutation),
    ("greeting", MetricType::Salutation),
];

pub const GREETING_MARKERS: &[&str] = &[
    "hi",
    "hello",
    "good morning",
    "good afternoon",
    "good evening",
];
pub const INTRODUCTION_MARKERS: &[&str] = &["my name is", "i am", "i'm", "myself"];
pub const CLOSING_MARKERS: &[&str] = &["thank you", "thanks"];

pub fn default_flow_sections() -> Vec<Vec<String>> {
    [GREETING_MARKERS, INTRODUCTION_MARKERS, CLOSING_MARKERS]
        .iter()
        .map(|markers| markers.iter().map(|m| m.to_string()).collect())
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct CriterionDef {
    pub name: &'static str,
    pub metric: MetricType,
    pub weight: f64,
    pub must_have: &'static [&'static str],
    pub good_to_have: &'static [&'static str],
}

const INTRO_MUST_HAVE: &[&str] = &["name", "age", "school", "class", "family"];
const INTRO_GOOD_TO_HAVE: &[&str] = &[
    "from",
    "hobbies",
    "interest",
    "favourite",
    "goal",
    "dream",
    "strength",
    "fun fact",
];

const BUILTIN_CRITERIA: &[CriterionDef] = &[
    CriterionDef {
        name: "Salutation",
        metric: MetricType::Salutation,
        weight: 5.0,
        must_have: &[],
        good_to_have: &[],
    },
    CriterionDef {
        name: "Key content",
        metric: MetricType::Keyword,
        weight: 30.0,
        must_have: INTRO_MUST_HAVE,
        good_to_have: INTRO_GOOD_TO_HAVE,
    },
    CriterionDef {
        name: "Flow",
        metric: MetricType::Flow,
        weight: 5.0,
        must_have: &[],
        good_to_have: &[],
    },
    CriterionDef {
        name: "Speech rate",
        metric: MetricType::Wpm,
        weight: 10.0,
        must_have: &[],
        good_to_have: &[],
    },
    CriterionDef {
        name: "Grammar",
        metric: MetricType::Grammar,
        weight: 10.0,
        must_have: &[],
        good_to_have: &[],
    },
    CriterionDef {
        name: "Vocabulary",
        metric: MetricType::Ttr,
        weight: 10.0,
        must_have: &[],
        good_to_have: &[],
    },
    CriterionDef {
        name: "Clarity",
        metric: MetricType::FillerRate,
        weight: 15.0,
        must_have: &[],
        good_to_have: &[],
    },
    CriterionDef {
        name: "Engagement",
        metric: MetricType::Sentiment,
        weight: 15.0,
        must_have: &[],
        good_to_have: &[],
    },
];

pub fn builtin_criteria() -> &'static [CriterionDef] {
    BUILTIN_CRITERIA
}

pub fn builtin_records() -> Vec<RubricRecord> {
    builtin_criteria()
        .iter()
        .map(|def| RubricRecord {
            name: def.name.to_string(),
            metric_type: def.metric.label().to_string(),
            weight: def.weight,
            must_have: def.must_have.iter().map(|s| s.to_string()).collect(),
            good_to_have: def.good_to_have.iter().map(|s| s.to_string()).collect(),
            ..RubricRecord::default()
        })
        .collect()
}
