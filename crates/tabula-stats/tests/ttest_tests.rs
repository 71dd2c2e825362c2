//! t-test integration tests
//!
//! Reference values checked against the Numerical Recipes formulation

use tabula_stats::{t_test_independent, t_test_paired, Sample, StatsError};

fn scores_a() -> Sample {
    Sample::new("Group A", vec![1.0, 2.0, 3.0, 4.0, 5.0])
}

fn scores_b() -> Sample {
    Sample::new("Group B", vec![2.0, 4.0, 6.0, 8.0, 10.0])
}

// === Independent samples ===

#[test]
fn test_independent_matches_reference_to_six_places() {
    let result = t_test_independent(&scores_a(), &scores_b()).unwrap();
    assert!((result.statistic - -1.897367).abs() < 1e-6);
    assert!((result.p_value - 0.094350).abs() < 1e-6);
}

#[test]
fn test_independent_descriptives() {
    let result = t_test_independent(&scores_a(), &scores_b()).unwrap();
    assert_eq!(result.descriptives.len(), 2);

    let a = &result.descriptives[0];
    assert_eq!(a.label, "Group A");
    assert_eq!(a.n, 5);
    assert!((a.mean - 3.0).abs() < 1e-12);
    assert_eq!(a.min, 1.0);
    assert_eq!(a.max, 5.0);

    let b = &result.descriptives[1];
    assert_eq!(b.label, "Group B");
    assert_eq!(b.n, 5);
    assert!((b.mean - 6.0).abs() < 1e-12);
    assert_eq!(b.min, 2.0);
    assert_eq!(b.max, 10.0);
    assert!(b.ci95.0 < b.mean && b.mean < b.ci95.1);
}

#[test]
fn test_independent_is_antisymmetric() {
    let ab = t_test_independent(&scores_a(), &scores_b()).unwrap();
    let ba = t_test_independent(&scores_b(), &scores_a()).unwrap();
    assert!((ab.statistic + ba.statistic).abs() < 1e-12);
    assert!((ab.p_value - ba.p_value).abs() < 1e-12);
}

#[test]
fn test_independent_unequal_sizes() {
    let a = Sample::new("A", vec![10.0, 12.0, 11.0, 14.0]);
    let b = Sample::new("B", vec![20.0, 19.0, 22.0, 21.0, 23.0, 18.0]);
    let result = t_test_independent(&a, &b).unwrap();
    assert_eq!(result.df, 8);
    assert!(result.statistic < 0.0);
    assert!(result.p_value < 0.001);
}

#[test]
fn test_independent_rejects_single_value_sample() {
    let lonely = Sample::new("Lonely", vec![4.0]);
    let err = t_test_independent(&scores_a(), &lonely).unwrap_err();
    assert!(matches!(err, StatsError::TooFewSamples { ref label, .. } if label == "Lonely"));
}

// === Paired samples ===

#[test]
fn test_paired_reference() {
    let after = Sample::new("After", vec![2.0, 4.0, 6.0, 8.0, 11.0]);
    let result = t_test_paired(&scores_a(), &after).unwrap();
    assert!((result.statistic - -3.719924).abs() < 1e-6);
    assert!((result.p_value - 0.020476).abs() < 1e-6);
    assert_eq!(result.df, 4);
    assert!(result.p_value_converged);
}

#[test]
fn test_paired_differences_are_b_minus_a() {
    let after = Sample::new("After", vec![0.0, 2.0, 5.0, 4.0, 9.0]);
    let result = t_test_paired(&scores_a(), &after).unwrap();
    assert_eq!(result.differences.unwrap(), vec![-1.0, 0.0, 2.0, 0.0, 4.0]);
}

#[test]
fn test_paired_requires_equal_lengths() {
    let short = Sample::new("Short", vec![1.0, 2.0]);
    assert_eq!(
        t_test_paired(&scores_a(), &short).unwrap_err(),
        StatsError::UnequalLength { left: 5, right: 2 }
    );
}
