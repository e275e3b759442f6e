//! Integration tests for the evaluation metrics.

use std::str::FromStr;

use spatha::error::{Result, SpathaError};
use spatha::ml::metrics::{Average, MetricsReport, accuracy, f1_score, precision, recall};

const Y_TRUE: [i32; 5] = [1, 1, 0, 0, 1];
const Y_PRED: [i32; 5] = [1, 0, 0, 0, 1];

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_binary_metrics_on_fixed_example() -> Result<()> {
    assert_close(accuracy(&Y_TRUE, &Y_PRED)?, 0.8);
    assert_close(precision(&Y_TRUE, &Y_PRED, &1, Average::Binary)?, 1.0);
    assert_close(recall(&Y_TRUE, &Y_PRED, &1, Average::Binary)?, 2.0 / 3.0);
    assert_close(f1_score(&Y_TRUE, &Y_PRED, &1, Average::Binary)?, 0.8);
    Ok(())
}

#[test]
fn test_weighted_metrics_on_fixed_example() -> Result<()> {
    // class 1: p=1, r=2/3, f1=0.8, support 3
    // class 0: p=2/3, r=1, f1=0.8, support 2
    assert_close(
        precision(&Y_TRUE, &Y_PRED, &1, Average::Weighted)?,
        0.6 * 1.0 + 0.4 * (2.0 / 3.0),
    );
    assert_close(
        recall(&Y_TRUE, &Y_PRED, &1, Average::Weighted)?,
        0.6 * (2.0 / 3.0) + 0.4 * 1.0,
    );
    assert_close(f1_score(&Y_TRUE, &Y_PRED, &1, Average::Weighted)?, 0.8);
    Ok(())
}

#[test]
fn test_zero_denominators_are_zero() -> Result<()> {
    let y_true = [false, false, false];
    let y_pred = [false, false, false];
    assert_close(precision(&y_true, &y_pred, &true, Average::Binary)?, 0.0);
    assert_close(recall(&y_true, &y_pred, &true, Average::Binary)?, 0.0);
    assert_close(f1_score(&y_true, &y_pred, &true, Average::Binary)?, 0.0);
    Ok(())
}

#[test]
fn test_metric_errors() {
    let empty: [i32; 0] = [];
    assert!(matches!(
        accuracy(&empty, &empty),
        Err(SpathaError::InvalidInput(_))
    ));
    assert!(matches!(
        f1_score(&[1, 0], &[1], &1, Average::Weighted),
        Err(SpathaError::InvalidInput(_))
    ));
    assert!(matches!(
        Average::from_str("macro"),
        Err(SpathaError::UnsupportedMode(_))
    ));
    assert_eq!(Average::from_str("binary").unwrap(), Average::Binary);
}

#[test]
fn test_metrics_report() -> Result<()> {
    let report = MetricsReport::evaluate(&Y_TRUE, &Y_PRED, &1, Average::Binary)?;
    assert_close(report.accuracy, 0.8);
    assert_eq!(report.get("Recall"), Some(report.recall));
    assert_eq!(report.get("AUC"), None);
    for (_, score) in report.entries() {
        assert!((0.0..=1.0).contains(&score));
    }
    Ok(())
}
