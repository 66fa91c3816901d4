use std::f64::consts::PI;

use minilearn_core::{unique_labels, Matrix, MlError, MlResult};
use minilearn_metrics::TaskType;
use minilearn_model::{Lifecycle, Model};
use serde::{Deserialize, Serialize};

const NAME: &str = "Gaussian Naive Bayes";

/// Hyperparameters of [`GaussianNaiveBayes`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianNbParams {
    /// Added to every per-class feature variance.
    pub var_smoothing: f64,
}

impl Default for GaussianNbParams {
    fn default() -> Self {
        GaussianNbParams { var_smoothing: 1e-9 }
    }
}

impl GaussianNbParams {
    pub fn validate(&self) -> MlResult<()> {
        if !self.var_smoothing.is_finite() || self.var_smoothing < 0.0 {
            return Err(MlError::invalid_hyperparameter(
                "var_smoothing",
                format!("must be a finite value >= 0, got {}", self.var_smoothing),
            ));
        }
        Ok(())
    }
}

/// Per-class parameters learned by [`GaussianNaiveBayes`], indexed in
/// ascending label order.
#[derive(Debug, Clone, PartialEq)]
struct ClassStats {
    classes: Vec<f64>,
    priors: Vec<f64>,
    means: Vec<Vec<f64>>,
    variances: Vec<Vec<f64>>,
}

/// Gaussian Naive Bayes classifier.
#[derive(Debug, Clone)]
pub struct GaussianNaiveBayes {
    params: GaussianNbParams,
    stats: Option<ClassStats>,
    lifecycle: Lifecycle,
}

impl GaussianNaiveBayes {
    pub fn new(var_smoothing: f64) -> MlResult<Self> {
        Self::from_params(GaussianNbParams { var_smoothing })
    }

    pub fn from_params(params: GaussianNbParams) -> MlResult<Self> {
        params.validate()?;
        Ok(GaussianNaiveBayes {
            params,
            stats: None,
            lifecycle: Lifecycle::new(),
        })
    }

    pub fn params(&self) -> &GaussianNbParams {
        &self.params
    }

    /// Sorted distinct training labels.
    pub fn classes(&self) -> Option<&[f64]> {
        self.stats.as_ref().map(|s| s.classes.as_slice())
    }

    pub fn priors(&self) -> Option<&[f64]> {
        self.stats.as_ref().map(|s| s.priors.as_slice())
    }

    pub fn means(&self) -> Option<&[Vec<f64>]> {
        self.stats.as_ref().map(|s| s.means.as_slice())
    }

    /// Smoothed per-class feature variances.
    pub fn variances(&self) -> Option<&[Vec<f64>]> {
        self.stats.as_ref().map(|s| s.variances.as_slice())
    }
}

impl Default for GaussianNaiveBayes {
    fn default() -> Self {
        GaussianNaiveBayes {
            params: GaussianNbParams::default(),
            stats: None,
            lifecycle: Lifecycle::new(),
        }
    }
}

fn fit_gaussian(x: &Matrix, y: &[f64], var_smoothing: f64) -> ClassStats {
    let n = x.rows() as f64;
    let d = x.cols();
    let classes = unique_labels(y);

    let mut priors = Vec::with_capacity(classes.len());
    let mut means = Vec::with_capacity(classes.len());
    let mut variances = Vec::with_capacity(classes.len());

    for &label in &classes {
        let rows: Vec<&[f64]> = x
            .iter_rows()
            .zip(y)
            .filter(|(_, &yi)| yi == label)
            .map(|(row, _)| row)
            .collect();
        let count = rows.len() as f64;

        let mut mean = vec![0.0; d];
        for row in &rows {
            for (m, v) in mean.iter_mut().zip(*row) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= count);

        // Population variance (divide by count, not count - 1).
        let mut var = vec![0.0; d];
        for row in &rows {
            for ((s, v), m) in var.iter_mut().zip(*row).zip(&mean) {
                *s += (v - m) * (v - m);
            }
        }
        var.iter_mut().for_each(|s| *s = *s / count + var_smoothing);

        priors.push(count / n);
        means.push(mean);
        variances.push(var);
    }

    ClassStats {
        classes,
        priors,
        means,
        variances,
    }
}

impl ClassStats {
    fn log_posterior(&self, c: usize, x: &[f64]) -> f64 {
        let half_log_2pi = 0.5 * (2.0 * PI).ln();
        let likelihood: f64 = x
            .iter()
            .zip(&self.means[c])
            .zip(&self.variances[c])
            .map(|((xj, mean), var)| -half_log_2pi - 0.5 * var.ln() - 0.5 * (xj - mean).powi(2) / var)
            .sum();
        self.priors[c].ln() + likelihood
    }

    fn predict_one(&self, x: &[f64]) -> f64 {
        let mut best = 0;
        let mut best_log_prob = self.log_posterior(0, x);
        for c in 1..self.classes.len() {
            let lp = self.log_posterior(c, x);
            if lp > best_log_prob {
                best_log_prob = lp;
                best = c;
            }
        }
        self.classes[best]
    }
}

impl Model for GaussianNaiveBayes {
    fn fit(&mut self, x: &Matrix, y: &[f64]) -> MlResult<()> {
        let var_smoothing = self.params.var_smoothing;
        let stats = self
            .lifecycle
            .fit(NAME, x, y, |x, y| Ok(fit_gaussian(x, y, var_smoothing)))?;
        self.stats = Some(stats);
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> MlResult<Vec<f64>> {
        self.lifecycle.check_input("predict", x)?;
        let stats = self.stats.as_ref().ok_or(MlError::NotFitted("predict"))?;
        Ok(x.iter_rows().map(|row| stats.predict_one(row)).collect())
    }

    fn name(&self) -> &str {
        NAME
    }

    fn task(&self) -> TaskType {
        TaskType::Classification
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}
