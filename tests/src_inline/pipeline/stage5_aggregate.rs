use super::*;
use crate::model::ScoringProfile;
use crate::rubric::RubricRecord;
use crate::rubric::loader::bind_rubric;

fn rubric(entries: &[(&str, &str, f64)]) -> Rubric {
    let records = entries
        .iter()
        .map(|(name, metric, weight)| RubricRecord {
            name: name.to_string(),
            metric_type: metric.to_string(),
            weight: *weight,
            ..RubricRecord::default()
        })
        .collect();
    bind_rubric(records, &ScoringProfile::default()).unwrap()
}

#[test]
fn test_weighted_mean_example() {
    let r = rubric(&[("Pace", "WPM", 50.0), ("Grammar", "GRAMMAR", 50.0)]);
    let out = run_stage5(&r, &[0.8, 0.6]).unwrap();
    assert!((out.overall_score - 70.0).abs() < 1e-9);
    assert_eq!(out.total_weight, 100.0);
}

#[test]
fn test_weights_need_not_sum_to_100() {
    let r = rubric(&[("Pace", "WPM", 1.0), ("Grammar", "GRAMMAR", 3.0)]);
    let out = run_stage5(&r, &[1.0, 0.0]).unwrap();
    assert!((out.overall_score - 25.0).abs() < 1e-9);
}

#[test]
fn test_bounds() {
    let r = rubric(&[("Pace", "WPM", 7.0), ("Grammar", "GRAMMAR", 2.5)]);
    assert_eq!(run_stage5(&r, &[0.0, 0.0]).unwrap().overall_score, 0.0);
    assert!((run_stage5(&r, &[1.0, 1.0]).unwrap().overall_score - 100.0).abs() < 1e-9);
    for a in [0.0, 0.1, 0.33, 0.5, 0.99, 1.0] {
        for b in [0.0, 0.25, 0.75, 1.0] {
            let s = run_stage5(&r, &[a, b]).unwrap().overall_score;
            assert!((0.0..=100.0).contains(&s));
        }
    }
}

#[test]
fn test_invalid_scores_are_computation_errors() {
    let r = rubric(&[("Pace", "WPM", 1.0), ("Grammar", "GRAMMAR", 1.0)]);
    assert!(matches!(
        run_stage5(&r, &[f64::NAN, 0.5]),
        Err(EvalError::Computation(_))
    ));
    assert!(matches!(
        run_stage5(&r, &[1.5, 0.5]),
        Err(EvalError::Computation(_))
    ));
    assert!(matches!(
        run_stage5(&r, &[0.5]),
        Err(EvalError::Computation(_))
    ));
}
