use std::time::{Duration, Instant};

use minilearn_core::{Matrix, MlError, MlResult};
use tracing::{debug, info};

/// Check that a training set is usable: non-empty, with one target per row.
pub fn validate_training_data(x: &Matrix, y: &[f64]) -> MlResult<()> {
    if x.rows() != y.len() {
        return Err(MlError::InvalidInput(format!(
            "X and y must have same number of samples: X={}, y={}",
            x.rows(),
            y.len()
        )));
    }
    if x.is_empty() {
        return Err(MlError::InvalidInput("cannot train on empty dataset".into()));
    }
    Ok(())
}

/// Fitted-state tracking shared by all models.
///
/// Models hold one of these next to their learned parameters and route
/// `fit` through [`Lifecycle::fit`], which validates the input, times the
/// training routine and only records the model as fitted when training
/// returns `Ok`.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    n_features: Option<usize>,
    train_time: Option<Duration>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.n_features.is_some()
    }

    pub fn train_time(&self) -> Option<Duration> {
        self.train_time
    }

    /// Column count seen by the last successful fit.
    pub fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    /// Validate `x`/`y`, run `train`, and record timing on success.
    ///
    /// On error the previous state (fitted or not) is left untouched.
    pub fn fit<P, F>(&mut self, model: &str, x: &Matrix, y: &[f64], train: F) -> MlResult<P>
    where
        F: FnOnce(&Matrix, &[f64]) -> MlResult<P>,
    {
        validate_training_data(x, y)?;
        debug!(model, n_samples = x.rows(), n_features = x.cols(), "fitting model");

        let start = Instant::now();
        let params = train(x, y)?;
        let elapsed = start.elapsed();

        self.n_features = Some(x.cols());
        self.train_time = Some(elapsed);
        info!(model, elapsed_ms = elapsed.as_secs_f64() * 1e3, "model fitted");
        Ok(params)
    }

    /// Fail with `NotFitted` unless a fit has succeeded.
    pub fn check_fitted(&self, op: &'static str) -> MlResult<()> {
        if self.is_fitted() {
            Ok(())
        } else {
            Err(MlError::NotFitted(op))
        }
    }

    /// `check_fitted` plus a column-count check against the training data.
    pub fn check_input(&self, op: &'static str, x: &Matrix) -> MlResult<()> {
        let expected = self.n_features.ok_or(MlError::NotFitted(op))?;
        if x.cols() != expected && !x.is_empty() {
            return Err(MlError::DimensionMismatch {
                expected,
                got: x.cols(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> (Matrix, Vec<f64>) {
        let x = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        (x, vec![0.0, 1.0])
    }

    #[test]
    fn test_fit_records_state() {
        let (x, y) = data();
        let mut lc = Lifecycle::new();
        assert!(!lc.is_fitted());
        let out = lc.fit("test", &x, &y, |x, _| Ok(x.cols())).unwrap();
        assert_eq!(out, 2);
        assert!(lc.is_fitted());
        assert_eq!(lc.n_features(), Some(2));
        assert!(lc.train_time().is_some());
    }

    #[test]
    fn test_fit_rejects_mismatch_and_empty() {
        let (x, _) = data();
        let mut lc = Lifecycle::new();
        let err = lc.fit("test", &x, &[1.0], |_, _| Ok(())).unwrap_err();
        assert!(matches!(err, MlError::InvalidInput(_)));

        let empty = Matrix::zeros(0, 2);
        let err = lc.fit("test", &empty, &[], |_, _| Ok(())).unwrap_err();
        assert!(matches!(err, MlError::InvalidInput(_)));
        assert!(!lc.is_fitted());
    }

    #[test]
    fn test_training_is_not_run_on_invalid_input() {
        let (x, _) = data();
        let mut lc = Lifecycle::new();
        let mut called = false;
        let _ = lc.fit("test", &x, &[], |_, _| {
            called = true;
            Ok(())
        });
        assert!(!called);
    }

    #[test]
    fn test_failed_training_keeps_previous_state() {
        let (x, y) = data();
        let mut lc = Lifecycle::new();
        let err = lc
            .fit("test", &x, &y, |_, _| -> MlResult<()> {
                Err(MlError::InvalidInput("bad labels".into()))
            })
            .unwrap_err();
        assert!(matches!(err, MlError::InvalidInput(_)));
        assert!(!lc.is_fitted());

        lc.fit("test", &x, &y, |_, _| Ok(())).unwrap();
        let _ = lc.fit("test", &x, &y, |_, _| -> MlResult<()> {
            Err(MlError::InvalidInput("bad labels".into()))
        });
        assert!(lc.is_fitted());
    }

    #[test]
    fn test_check_input() {
        let (x, y) = data();
        let mut lc = Lifecycle::new();
        assert_eq!(lc.check_input("predict", &x), Err(MlError::NotFitted("predict")));

        lc.fit("test", &x, &y, |_, _| Ok(())).unwrap();
        assert!(lc.check_input("predict", &x).is_ok());

        let narrow = Matrix::from_rows(&[vec![1.0]]).unwrap();
        assert_eq!(
            lc.check_input("predict", &narrow),
            Err(MlError::DimensionMismatch { expected: 2, got: 1 })
        );
    }
}
