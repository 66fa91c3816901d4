use minilearn_core::{Matrix, MlError, MlResult};

/// Dot product of two equal-length slices.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Build the normal equations `XᵀX w = Xᵀy` for a design matrix.
///
/// Returns `(XᵀX, Xᵀy)`.
pub fn normal_equations(x: &Matrix, y: &[f64]) -> MlResult<(Matrix, Vec<f64>)> {
    if x.rows() != y.len() {
        return Err(MlError::InvalidInput(format!(
            "X has {} rows but y has {} values",
            x.rows(),
            y.len()
        )));
    }
    let xt = x.t();
    let xtx = xt.matmul(x)?;
    let xty = xt.matvec(y)?;
    Ok((xtx, xty))
}
