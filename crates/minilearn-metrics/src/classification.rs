use minilearn_core::unique_labels;

use crate::EPSILON;

fn same_label(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Compute accuracy: fraction of positions where the labels match.
///
/// # Panics
/// Panics if the inputs differ in length.
pub fn accuracy(y_true: &[f64], y_pred: &[f64]) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "Length mismatch");
    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(&t, &p)| same_label(t, p))
        .count();
    correct as f64 / y_true.len() as f64
}

/// Binary confusion counts `(tp, fp, fn)` treating `label` as positive.
pub fn label_confusion(y_true: &[f64], y_pred: &[f64], label: f64) -> (usize, usize, usize) {
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;
    for (&t, &p) in y_true.iter().zip(y_pred) {
        match (same_label(t, label), same_label(p, label)) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => {}
        }
    }
    (tp, fp, fn_)
}

/// F1 score for a single label, with epsilon-smoothed denominators.
pub fn f1_for_label(y_true: &[f64], y_pred: &[f64], label: f64) -> f64 {
    let (tp, fp, fn_) = label_confusion(y_true, y_pred, label);
    let tp = tp as f64;
    let precision = tp / (tp + fp as f64 + EPSILON);
    let recall = tp / (tp + fn_ as f64 + EPSILON);
    2.0 * precision * recall / (precision + recall + EPSILON)
}

/// Macro-averaged F1 score.
///
/// The class set is taken from `y_true` only; labels that appear only in
/// `y_pred` do not get a term of their own.
///
/// # Panics
/// Panics if the inputs differ in length.
pub fn macro_f1(y_true: &[f64], y_pred: &[f64]) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "Length mismatch");
    let labels = unique_labels(y_true);
    let sum: f64 = labels
        .iter()
        .map(|&label| f1_for_label(y_true, y_pred, label))
        .sum();
    sum / labels.len() as f64
}
