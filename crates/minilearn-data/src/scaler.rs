use minilearn_core::{Matrix, MlError, MlResult};

/// Standard deviations below this are treated as 1 so constant columns pass
/// through centred but unscaled.
pub const MIN_STD: f64 = 1e-8;

/// Standardize features by removing the mean and scaling to unit variance.
///
/// Uses the population standard deviation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardScaler {
    pub mean: Option<Vec<f64>>,
    pub std: Option<Vec<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute per-column mean and std from training data.
    pub fn fit(&mut self, x: &Matrix) -> MlResult<()> {
        if x.is_empty() {
            return Err(MlError::InvalidInput("cannot fit scaler on empty data".into()));
        }
        let n = x.rows() as f64;
        let mut mean = Vec::with_capacity(x.cols());
        let mut std = Vec::with_capacity(x.cols());
        for j in 0..x.cols() {
            let col = x.column(j);
            let m = col.iter().sum::<f64>() / n;
            let var = col.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n;
            let s = var.sqrt();
            mean.push(m);
            std.push(if s < MIN_STD { 1.0 } else { s });
        }
        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    /// Apply the fitted statistics to `x`.
    pub fn transform(&self, x: &Matrix) -> MlResult<Matrix> {
        let (mean, std) = match (&self.mean, &self.std) {
            (Some(m), Some(s)) => (m, s),
            _ => return Err(MlError::NotFitted("transform")),
        };
        if x.cols() != mean.len() {
            return Err(MlError::DimensionMismatch {
                expected: mean.len(),
                got: x.cols(),
            });
        }
        let data = x
            .iter_rows()
            .flat_map(|row| {
                row.iter()
                    .zip(mean.iter().zip(std))
                    .map(|(v, (m, s))| (v - m) / s)
            })
            .collect();
        Matrix::new(data, x.rows(), x.cols())
    }

    pub fn fit_transform(&mut self, x: &Matrix) -> MlResult<Matrix> {
        self.fit(x)?;
        self.transform(x)
    }
}
