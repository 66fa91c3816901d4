use std::time::Duration;

use minilearn_core::{Matrix, MlResult};
use minilearn_metrics::{MetricsBundle, TaskType};

use crate::lifecycle::Lifecycle;
use crate::scoring::{score_classification, score_regression};

/// Contract shared by every supervised learner.
///
/// `fit` may be called any number of times; each call fully replaces the
/// learned parameters. `predict` and `score` fail with `NotFitted` until a
/// `fit` call has succeeded.
pub trait Model {
    /// Train on a feature matrix and a target vector of matching length.
    fn fit(&mut self, x: &Matrix, y: &[f64]) -> MlResult<()>;

    /// One prediction per row of `x`.
    fn predict(&self, x: &Matrix) -> MlResult<Vec<f64>>;

    /// Human readable name of the algorithm.
    fn name(&self) -> &str;

    /// Which metrics `score` reports.
    fn task(&self) -> TaskType;

    /// Fitted-state bookkeeping.
    fn lifecycle(&self) -> &Lifecycle;

    fn is_fitted(&self) -> bool {
        self.lifecycle().is_fitted()
    }

    /// Duration of the last successful `fit`.
    fn train_time(&self) -> Option<Duration> {
        self.lifecycle().train_time()
    }

    /// Evaluate predictions on `x` against `y`.
    fn score(&self, x: &Matrix, y: &[f64]) -> MlResult<MetricsBundle> {
        match self.task() {
            TaskType::Classification => score_classification(self, x, y),
            TaskType::Regression => score_regression(self, x, y),
        }
    }
}
