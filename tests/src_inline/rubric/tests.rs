use super::defs::{builtin_criteria, builtin_records};
use super::loader::{bind_rubric, load_rubric, parse_json_records, parse_tsv_records};
use super::*;
use crate::error::EvalError;
use crate::model::ScoringProfile;
use std::sync::atomic::{AtomicUsize, Ordering};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("commscore_rubric_test_{}_{}", std::process::id(), id));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn record(name: &str, metric: &str, weight: f64) -> RubricRecord {
    RubricRecord {
        name: name.to_string(),
        metric_type: metric.to_string(),
        weight,
        ..RubricRecord::default()
    }
}

#[test]
fn test_builtin_rubric_binds() {
    let rubric = bind_rubric(builtin_records(), &ScoringProfile::default()).unwrap();
    assert_eq!(rubric.len(), builtin_criteria().len());
    assert!((rubric.total_weight() - 100.0).abs() < 1e-9);
    assert_eq!(rubric.criteria()[0].metric_type, MetricType::Salutation);
    for (def, c) in builtin_criteria().iter().zip(rubric.criteria()) {
        assert_eq!(def.name, c.name);
    }
}

#[test]
fn test_metric_label_aliases() {
    assert_eq!(MetricType::parse_label("WPM"), Some(MetricType::Wpm));
    assert_eq!(MetricType::parse_label("Speech Rate"), Some(MetricType::Wpm));
    assert_eq!(
        MetricType::parse_label("filler_rate"),
        Some(MetricType::FillerRate)
    );
    assert_eq!(
        MetricType::parse_label("Language & Grammar"),
        Some(MetricType::Grammar)
    );
    assert_eq!(
        MetricType::parse_label("SEMANTIC_SIMILARITY"),
        Some(MetricType::SemanticSimilarity)
    );
    assert_eq!(MetricType::parse_label("vibes"), None);
    for metric in [
        MetricType::Wpm,
        MetricType::Ttr,
        MetricType::FillerRate,
        MetricType::Grammar,
        MetricType::Sentiment,
        MetricType::Keyword,
        MetricType::Flow,
        MetricType::SemanticSimilarity,
        MetricType::Salutation,
    ] {
        assert_eq!(MetricType::parse_label(metric.label()), Some(metric));
    }
}

#[test]
fn test_json_list_and_wrapped_forms() {
    let list = r#"[{"name":"Pace","metric_type":"WPM","weight":50},
                   {"name":"Grammar","metric":"grammar","weight":50}]"#;
    let records = parse_json_records(list).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].metric_type, "grammar");

    let wrapped = r#"{"criteria":[{"name":"Topics","metric_type":"KEYWORD","weight":10,
                      "keywords":["school","family"]}]}"#;
    let records = parse_json_records(wrapped).unwrap();
    assert_eq!(records[0].keywords, vec!["school", "family"]);
}

#[test]
fn test_malformed_json_is_configuration_error() {
    let err = parse_json_records("[{\"name\":").unwrap_err();
    assert!(matches!(err, EvalError::Configuration(_)));
}

#[test]
fn test_tsv_records() {
    let tsv = "Criterion\tMetric\tWeight\tKeywords\tSections\n\
               \n\
               Topics\tkeyword\t30\tschool, family ,hobbies\t\n\
               Order\tflow\t10\t\thi|hello > my name is > thanks\n";
    let records = parse_tsv_records(tsv).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].keywords, vec!["school", "family", "hobbies"]);
    assert_eq!(records[0].weight, 30.0);
    assert_eq!(
        records[1].sections,
        vec![
            vec!["hi".to_string(), "hello".to_string()],
            vec!["my name is".to_string()],
            vec!["thanks".to_string()],
        ]
    );
}

#[test]
fn test_tsv_bad_weight_and_missing_columns() {
    let bad_weight = "name\tmetric_type\tweight\nPace\twpm\theavy\n";
    assert!(matches!(
        parse_tsv_records(bad_weight),
        Err(EvalError::Configuration(_))
    ));
    let no_weight = "name\tmetric_type\nPace\twpm\n";
    assert!(matches!(
        parse_tsv_records(no_weight),
        Err(EvalError::Configuration(_))
    ));
    assert!(parse_tsv_records("   \n").is_err());
}

#[test]
fn test_invalid_rubrics_rejected_at_load() {
    let profile = ScoringProfile::default();
    assert!(matches!(
        bind_rubric(Vec::new(), &profile),
        Err(EvalError::Configuration(_))
    ));
    assert!(matches!(
        bind_rubric(vec![record("Pace", "wpm", 0.0)], &profile),
        Err(EvalError::Configuration(_))
    ));
    assert!(matches!(
        bind_rubric(vec![record("Pace", "wpm", -5.0)], &profile),
        Err(EvalError::Configuration(_))
    ));
    assert!(matches!(
        bind_rubric(vec![record("Mood", "astrology", 10.0)], &profile),
        Err(EvalError::Configuration(_))
    ));
    assert!(matches!(
        bind_rubric(vec![record("  ", "wpm", 10.0)], &profile),
        Err(EvalError::Configuration(_))
    ));

    let mut inverted = record("Pace", "wpm", 10.0);
    inverted.ideal_min_wpm = Some(160.0);
    inverted.ideal_max_wpm = Some(120.0);
    assert!(bind_rubric(vec![inverted], &profile).is_err());

    let mut flow = record("Order", "flow", 10.0);
    flow.sections = vec![vec!["hello".to_string()]];
    assert!(bind_rubric(vec![flow], &profile).is_err());
}

#[test]
fn test_keyword_binding_tiers() {
    let profile = ScoringProfile::default();
    let mut plain = record("Topics", "keyword", 10.0);
    plain.keywords = vec!["School".to_string(), " ".to_string()];
    let mut tiered = record("Intro", "keyword", 10.0);
    tiered.must_have = vec!["name".to_string()];
    tiered.good_to_have = vec!["hobby".to_string()];

    let rubric = bind_rubric(vec![plain, tiered], &profile).unwrap();
    match &rubric.criteria()[0].computation {
        Computation::Keywords(spec) => {
            assert_eq!(spec.must_have, vec!["school"]);
            assert_eq!(spec.must_weight, 1.0);
        }
        other => panic!("unexpected computation {other:?}"),
    }
    match &rubric.criteria()[1].computation {
        Computation::Keywords(spec) => {
            assert_eq!(spec.must_weight, profile.must_have_weight);
            assert_eq!(spec.keyword_phrase(), "name hobby");
        }
        other => panic!("unexpected computation {other:?}"),
    }
}

#[test]
fn test_similarity_reference_priority() {
    let profile = ScoringProfile::default();
    let mut with_ref = record("Confidence", "semantic", 10.0);
    with_ref.reference = Some("I am confident".to_string());
    with_ref.description = Some("ignored".to_string());
    let mut with_desc = record("Warmth", "semantic", 10.0);
    with_desc.description = Some("friendly tone".to_string());
    let bare = record("Curiosity", "semantic", 10.0);

    let rubric = bind_rubric(vec![with_ref, with_desc, bare], &profile).unwrap();
    let refs: Vec<String> = rubric
        .criteria()
        .iter()
        .map(|c| match &c.computation {
            Computation::Similarity { reference } => reference.clone(),
            _ => String::new(),
        })
        .collect();
    assert_eq!(refs, vec!["I am confident", "friendly tone", "Curiosity"]);
}

#[test]
fn test_criterion_overrides_profile_band() {
    let mut pace = record("Pace", "wpm", 10.0);
    pace.ideal_min_wpm = Some(90.0);
    pace.falloff_wpm = Some(30.0);
    let rubric = bind_rubric(vec![pace], &ScoringProfile::default()).unwrap();
    assert_eq!(
        rubric.criteria()[0].computation,
        Computation::SpeechRate(WpmBand {
            ideal_min: 90.0,
            ideal_max: 150.0,
            falloff: 30.0,
        })
    );
}

#[test]
fn test_load_rubric_from_files() {
    let dir = make_temp_dir();
    let json_path = dir.join("rubric.json");
    std::fs::write(
        &json_path,
        r#"[{"name":"Pace","metric_type":"WPM","weight":50},{"name":"Grammar","metric_type":"GRAMMAR","weight":50}]"#,
    )
    .unwrap();
    let rubric = load_rubric(Some(&json_path), &ScoringProfile::default()).unwrap();
    assert_eq!(rubric.len(), 2);

    let sniffed = dir.join("rubric.txt");
    std::fs::write(&sniffed, "name\tmetric\tweight\nTone\tsentiment\t3\n").unwrap();
    let rubric = load_rubric(Some(&sniffed), &ScoringProfile::default()).unwrap();
    assert_eq!(rubric.criteria()[0].metric_type, MetricType::Sentiment);

    let missing = dir.join("nope.json");
    assert!(matches!(
        load_rubric(Some(&missing), &ScoringProfile::default()),
        Err(EvalError::Configuration(_))
    ));

    let builtin = load_rubric(None, &ScoringProfile::default()).unwrap();
    assert_eq!(builtin.len(), builtin_criteria().len());
}
