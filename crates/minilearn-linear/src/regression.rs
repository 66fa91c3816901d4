use minilearn_core::{Matrix, MlError, MlResult};
use minilearn_linalg::{dot, normal_equations, solve};
use minilearn_metrics::TaskType;
use minilearn_model::{Lifecycle, Model};
use serde::{Deserialize, Serialize};

const NAME: &str = "Linear Regression (closed-form)";

/// Hyperparameters of [`LinearRegression`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearRegressionParams {
    /// Ridge penalty on the feature weights. The bias is never penalised.
    pub l2: f64,
}

impl Default for LinearRegressionParams {
    fn default() -> Self {
        LinearRegressionParams { l2: 1e-3 }
    }
}

impl LinearRegressionParams {
    pub fn validate(&self) -> MlResult<()> {
        if !self.l2.is_finite() || self.l2 < 0.0 {
            return Err(MlError::invalid_hyperparameter(
                "l2",
                format!("must be a finite value >= 0, got {}", self.l2),
            ));
        }
        Ok(())
    }
}

/// Linear Regression solved in closed form with an L2 (ridge) penalty.
///
/// Solves `(XᵀX + λI') w = Xᵀy` where `X` carries an extra column of ones for
/// the bias and `I'` is the identity with a zero in the bias position.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    params: LinearRegressionParams,
    weights: Option<Vec<f64>>,
    bias: Option<f64>,
    lifecycle: Lifecycle,
}

impl LinearRegression {
    pub fn new(l2: f64) -> MlResult<Self> {
        Self::from_params(LinearRegressionParams { l2 })
    }

    pub fn from_params(params: LinearRegressionParams) -> MlResult<Self> {
        params.validate()?;
        Ok(LinearRegression {
            params,
            weights: None,
            bias: None,
            lifecycle: Lifecycle::new(),
        })
    }

    pub fn params(&self) -> &LinearRegressionParams {
        &self.params
    }

    /// Learned feature weights, one per training column.
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn bias(&self) -> Option<f64> {
        self.bias
    }
}

impl Default for LinearRegression {
    fn default() -> Self {
        LinearRegression {
            params: LinearRegressionParams::default(),
            weights: None,
            bias: None,
            lifecycle: Lifecycle::new(),
        }
    }
}

fn fit_ridge(x: &Matrix, y: &[f64], l2: f64) -> MlResult<(Vec<f64>, f64)> {
    let augmented = x.with_constant_column(1.0);
    let (mut xtx, xty) = normal_equations(&augmented, y)?;
    for j in 0..x.cols() {
        let v = xtx.get(j, j);
        xtx.set(j, j, v + l2);
    }
    let mut weights = solve(&xtx, &xty)?;
    // Bias is the last entry, matching the appended column.
    let bias = weights.pop().unwrap_or(0.0);
    Ok((weights, bias))
}

impl Model for LinearRegression {
    fn fit(&mut self, x: &Matrix, y: &[f64]) -> MlResult<()> {
        let l2 = self.params.l2;
        let (weights, bias) = self.lifecycle.fit(NAME, x, y, |x, y| fit_ridge(x, y, l2))?;
        self.weights = Some(weights);
        self.bias = Some(bias);
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> MlResult<Vec<f64>> {
        self.lifecycle.check_input("predict", x)?;
        let (weights, bias) = match (&self.weights, self.bias) {
            (Some(w), Some(b)) => (w, b),
            _ => return Err(MlError::NotFitted("predict")),
        };
        Ok(x.iter_rows().map(|row| dot(row, weights) + bias).collect())
    }

    fn name(&self) -> &str {
        NAME
    }

    fn task(&self) -> TaskType {
        TaskType::Regression
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use minilearn_metrics::{R2, RMSE};

    fn line() -> (Matrix, Vec<f64>) {
        let x = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]).unwrap();
        (x, vec![5.0, 7.0, 9.0, 11.0])
    }

    #[test]
    fn test_recovers_exact_line() {
        let (x, y) = line();
        let mut model = LinearRegression::new(0.0).unwrap();
        model.fit(&x, &y).unwrap();

        assert_abs_diff_eq!(model.weights().unwrap()[0], 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(model.bias().unwrap(), 3.0, epsilon = 1e-3);

        let pred = model.predict(&Matrix::column_vector(&[10.0])).unwrap();
        assert_abs_diff_eq!(pred[0], 23.0, epsilon = 1e-2);
    }

    #[test]
    fn test_multiple_features() {
        // y = 1*x1 + 2*x2 + 3
        let x = Matrix::from_rows(&[
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![2.0, 1.0],
            vec![3.0, 2.0],
            vec![1.0, 3.0],
        ])
        .unwrap();
        let y: Vec<f64> = x.iter_rows().map(|r| r[0] + 2.0 * r[1] + 3.0).collect();

        let mut model = LinearRegression::new(0.0).unwrap();
        model.fit(&x, &y).unwrap();
        let w = model.weights().unwrap();
        assert_abs_diff_eq!(w[0], 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(w[1], 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(model.bias().unwrap(), 3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_penalty_shrinks_weights_not_bias() {
        let (x, y) = line();
        let mut model = LinearRegression::new(1e6).unwrap();
        model.fit(&x, &y).unwrap();

        assert!(model.weights().unwrap()[0].abs() < 1e-3);
        // With the weight driven to zero the bias falls back to mean(y).
        assert_abs_diff_eq!(model.bias().unwrap(), 8.0, epsilon = 1e-3);
    }

    #[test]
    fn test_score_is_regression() {
        let (x, y) = line();
        let mut model = LinearRegression::default();
        model.fit(&x, &y).unwrap();

        let bundle = model.score(&x, &y).unwrap();
        assert_eq!(bundle.task_type(), TaskType::Regression);
        assert!(bundle.get_metric(RMSE) < 1e-2);
        assert!(bundle.get_metric(R2) > 0.999);
    }

    #[test]
    fn test_not_fitted() {
        let model = LinearRegression::default();
        let (x, y) = line();
        assert_eq!(model.predict(&x), Err(MlError::NotFitted("predict")));
        assert_eq!(model.score(&x, &y), Err(MlError::NotFitted("score")));
    }

    #[test]
    fn test_invalid_l2() {
        assert!(matches!(
            LinearRegression::new(-1.0),
            Err(MlError::InvalidHyperparameter { name: "l2", .. })
        ));
        assert!(LinearRegression::new(f64::NAN).is_err());
    }

    #[test]
    fn test_feature_count_checked() {
        let (x, y) = line();
        let mut model = LinearRegression::default();
        model.fit(&x, &y).unwrap();
        let wide = Matrix::from_rows(&[vec![1.0, 2.0]]).unwrap();
        assert_eq!(
            model.predict(&wide),
            Err(MlError::DimensionMismatch { expected: 1, got: 2 })
        );
    }

    #[test]
    fn test_params_deserialize_with_defaults() {
        let params: LinearRegressionParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, LinearRegressionParams::default());
    }
}
