use minilearn_core::{Matrix, MlError, MlResult};
use minilearn_linalg::dot;
use minilearn_metrics::TaskType;
use minilearn_model::{Lifecycle, Model};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{trace, Level};

const NAME: &str = "Logistic Regression";

/// Logits beyond this magnitude saturate the sigmoid to exactly 0 or 1.
const SIGMOID_CLIP: f64 = 500.0;

/// Standard deviation of the initial weights.
const INIT_SCALE: f64 = 0.01;

/// Hyperparameters of [`LogisticRegression`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticRegressionParams {
    pub learning_rate: f64,
    pub epochs: usize,
    pub l2: f64,
    /// Seed of the generator used for weight initialisation.
    pub seed: u64,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        LogisticRegressionParams {
            learning_rate: 0.2,
            epochs: 400,
            l2: 1e-3,
            seed: 7,
        }
    }
}

impl LogisticRegressionParams {
    pub fn validate(&self) -> MlResult<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(MlError::invalid_hyperparameter(
                "learning_rate",
                format!("must be a finite value > 0, got {}", self.learning_rate),
            ));
        }
        if self.epochs == 0 {
            return Err(MlError::invalid_hyperparameter("epochs", "must be at least 1"));
        }
        if !self.l2.is_finite() || self.l2 < 0.0 {
            return Err(MlError::invalid_hyperparameter(
                "l2",
                format!("must be a finite value >= 0, got {}", self.l2),
            ));
        }
        Ok(())
    }
}

/// Logistic Regression: binary classification via full-batch gradient descent.
///
/// Runs exactly `epochs` updates with no early stopping. Targets must be
/// encoded as `0.0`/`1.0`.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    params: LogisticRegressionParams,
    weights: Option<Vec<f64>>,
    bias: Option<f64>,
    lifecycle: Lifecycle,
}

impl LogisticRegression {
    pub fn new(learning_rate: f64, epochs: usize, l2: f64, seed: u64) -> MlResult<Self> {
        Self::from_params(LogisticRegressionParams {
            learning_rate,
            epochs,
            l2,
            seed,
        })
    }

    pub fn from_params(params: LogisticRegressionParams) -> MlResult<Self> {
        params.validate()?;
        Ok(LogisticRegression {
            params,
            weights: None,
            bias: None,
            lifecycle: Lifecycle::new(),
        })
    }

    pub fn params(&self) -> &LogisticRegressionParams {
        &self.params
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn bias(&self) -> Option<f64> {
        self.bias
    }

    /// Probability of the positive class for each row.
    pub fn predict_proba(&self, x: &Matrix) -> MlResult<Vec<f64>> {
        self.lifecycle.check_input("predict_proba", x)?;
        let (weights, bias) = match (&self.weights, self.bias) {
            (Some(w), Some(b)) => (w, b),
            _ => return Err(MlError::NotFitted("predict_proba")),
        };
        Ok(x.iter_rows().map(|row| sigmoid(dot(row, weights) + bias)).collect())
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        LogisticRegression {
            params: LogisticRegressionParams::default(),
            weights: None,
            bias: None,
            lifecycle: Lifecycle::new(),
        }
    }
}

/// Sigmoid that saturates instead of overflowing `exp`.
pub fn sigmoid(z: f64) -> f64 {
    if z >= SIGMOID_CLIP {
        1.0
    } else if z <= -SIGMOID_CLIP {
        0.0
    } else {
        1.0 / (1.0 + (-z).exp())
    }
}

/// One standard-normal draw (Box-Muller).
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-10);
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn log_loss(x: &Matrix, y: &[f64], weights: &[f64], bias: f64) -> f64 {
    let eps = 1e-15;
    let total: f64 = x
        .iter_rows()
        .zip(y)
        .map(|(row, &yi)| {
            let p = sigmoid(dot(row, weights) + bias);
            -(yi * (p + eps).ln() + (1.0 - yi) * (1.0 - p + eps).ln())
        })
        .sum();
    total / y.len() as f64
}

fn fit_gradient_descent<R: Rng>(
    x: &Matrix,
    y: &[f64],
    params: &LogisticRegressionParams,
    rng: &mut R,
) -> MlResult<(Vec<f64>, f64)> {
    if let Some(bad) = y.iter().find(|&&v| v != 0.0 && v != 1.0) {
        return Err(MlError::InvalidInput(format!(
            "logistic regression expects labels 0 or 1, found {bad}"
        )));
    }

    let n = x.rows() as f64;
    let d = x.cols();
    let mut weights: Vec<f64> = (0..d).map(|_| INIT_SCALE * standard_normal(rng)).collect();
    let mut bias = 0.0;

    for epoch in 0..params.epochs {
        let mut grad_w = vec![0.0; d];
        let mut grad_b = 0.0;

        for (row, &yi) in x.iter_rows().zip(y) {
            let error = sigmoid(dot(row, &weights) + bias) - yi;
            for (g, &xj) in grad_w.iter_mut().zip(row) {
                *g += error * xj;
            }
            grad_b += error;
        }

        for (w, g) in weights.iter_mut().zip(&grad_w) {
            let grad = g / n + params.l2 * *w;
            *w -= params.learning_rate * grad;
        }
        bias -= params.learning_rate * grad_b / n;

        if epoch % 100 == 0 && tracing::enabled!(Level::TRACE) {
            trace!(epoch, loss = log_loss(x, y, &weights, bias), "logistic regression epoch");
        }
    }

    Ok((weights, bias))
}

impl Model for LogisticRegression {
    fn fit(&mut self, x: &Matrix, y: &[f64]) -> MlResult<()> {
        let params = self.params;
        let (weights, bias) = self.lifecycle.fit(NAME, x, y, |x, y| {
            let mut rng = StdRng::seed_from_u64(params.seed);
            fit_gradient_descent(x, y, &params, &mut rng)
        })?;
        self.weights = Some(weights);
        self.bias = Some(bias);
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> MlResult<Vec<f64>> {
        let proba = self.predict_proba(x).map_err(|e| match e {
            MlError::NotFitted(_) => MlError::NotFitted("predict"),
            other => other,
        })?;
        Ok(proba
            .into_iter()
            .map(|p| if p >= 0.5 { 1.0 } else { 0.0 })
            .collect())
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
