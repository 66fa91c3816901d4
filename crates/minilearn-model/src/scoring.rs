use minilearn_core::{Matrix, MlError, MlResult};
use minilearn_metrics::{
    accuracy, macro_f1, r2, rmse, MetricsBundle, TaskType, ACCURACY, MACRO_F1, R2, RMSE,
};

use crate::model::Model;

fn predict_for_scoring<M: Model + ?Sized>(model: &M, x: &Matrix, y: &[f64]) -> MlResult<Vec<f64>> {
    model.lifecycle().check_fitted("score")?;
    if x.rows() != y.len() {
        return Err(MlError::InvalidInput(format!(
            "X and y must have same number of samples: X={}, y={}",
            x.rows(),
            y.len()
        )));
    }
    model.predict(x)
}

/// Accuracy and macro-F1 of `model` on `(x, y)`.
pub fn score_classification<M: Model + ?Sized>(
    model: &M,
    x: &Matrix,
    y: &[f64],
) -> MlResult<MetricsBundle> {
    let predictions = predict_for_scoring(model, x, y)?;
    let mut metrics = MetricsBundle::new(model.name(), TaskType::Classification);
    metrics.add_metric(ACCURACY, accuracy(y, &predictions));
    metrics.add_metric(MACRO_F1, macro_f1(y, &predictions));
    Ok(metrics)
}

/// RMSE and R² of `model` on `(x, y)`.
pub fn score_regression<M: Model + ?Sized>(
    model: &M,
    x: &Matrix,
    y: &[f64],
) -> MlResult<MetricsBundle> {
    let predictions = predict_for_scoring(model, x, y)?;
    let mut metrics = MetricsBundle::new(model.name(), TaskType::Regression);
    metrics.add_metric(RMSE, rmse(y, &predictions));
    metrics.add_metric(R2, r2(y, &predictions));
    Ok(metrics)
}
