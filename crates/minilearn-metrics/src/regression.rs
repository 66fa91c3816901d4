use crate::EPSILON;

/// Mean Squared Error.
///
/// # Panics
/// Panics if the inputs differ in length.
pub fn mse(y_true: &[f64], y_pred: &[f64]) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "Length mismatch");
    let sum: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    sum / y_true.len() as f64
}

/// Root Mean Squared Error.
pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> f64 {
    mse(y_true, y_pred).sqrt()
}

/// R² (coefficient of determination): `1 − RSS / (TSS + ε)`.
///
/// A constant `y_true` has TSS = 0, so any residual drives the score far
/// below zero instead of dividing by zero.
pub fn r2(y_true: &[f64], y_pred: &[f64]) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "Length mismatch");
    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;

    let mut rss = 0.0;
    let mut tss = 0.0;
    for (t, p) in y_true.iter().zip(y_pred) {
        rss += (t - p) * (t - p);
        tss += (t - mean) * (t - mean);
    }
    1.0 - rss / (tss + EPSILON)
}
