use minilearn_core::{Matrix, MlError, MlResult};

/// Added to every pivot before dividing so near-singular systems still
/// produce finite values. This does not detect rank deficiency.
pub const PIVOT_EPSILON: f64 = 1e-10;

/// Solve the linear system `Ax = b` by Gaussian elimination with partial
/// pivoting followed by back substitution.
///
/// At each step the row with the largest-magnitude entry in the current
/// column is swapped into the pivot position.
pub fn solve(a: &Matrix, b: &[f64]) -> MlResult<Vec<f64>> {
    let n = a.rows();
    if n != a.cols() {
        return Err(MlError::InvalidInput(format!(
            "solve: A must be square, got {}x{}",
            a.rows(),
            a.cols()
        )));
    }
    if b.len() != n {
        return Err(MlError::DimensionMismatch {
            expected: n,
            got: b.len(),
        });
    }

    // Augmented matrix [A | b], one Vec per row so swaps are cheap.
    let mut aug: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let mut row = a.row(i).to_vec();
            row.push(b[i]);
            row
        })
        .collect();

    // Forward elimination
    for k in 0..n {
        let mut max_row = k;
        for i in (k + 1)..n {
            if aug[i][k].abs() > aug[max_row][k].abs() {
                max_row = i;
            }
        }
        aug.swap(k, max_row);

        for i in (k + 1)..n {
            let factor = aug[i][k] / (aug[k][k] + PIVOT_EPSILON);
            for j in k..=n {
                aug[i][j] -= factor * aug[k][j];
            }
        }
    }

    // Back substitution
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = aug[i][n];
        for j in (i + 1)..n {
            sum -= aug[i][j] * x[j];
        }
        x[i] = sum / (aug[i][i] + PIVOT_EPSILON);
    }

    Ok(x)
}
