use crate::{BiopsyError, Float, Matrix, Result, Vector};

/// Feature-wise mean of `x` (length `ncols`).
pub fn column_means(x: &Matrix) -> Vector {
    let n = x.nrows().max(1) as Float;
    Vector::from_iterator(x.ncols(), x.column_iter().map(|c| c.sum() / n))
}

/// Feature-wise population variance (`ddof = 0`) of `x` around `means`.
pub fn column_variances(x: &Matrix, means: &Vector) -> Vector {
    let n = x.nrows().max(1) as Float;
    Vector::from_iterator(
        x.ncols(),
        x.column_iter().zip(means.iter()).map(|(c, &m)| {
            c.iter().map(|&v| (v - m) * (v - m)).sum::<Float>() / n
        }),
    )
}

/// Mean and population standard deviation of a slice; `(0, 0)` when empty.
pub fn mean_std(values: &[Float]) -> (Float, Float) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as Float;
    let mean = values.iter().sum::<Float>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<Float>() / n;
    (mean, var.sqrt())
}

/// Rejects matrices carrying `NaN` or infinite entries.
pub fn ensure_finite(x: &Matrix) -> Result<()> {
    match x.iter().position(|v| !v.is_finite()) {
        Some(pos) => Err(BiopsyError::InvalidValue {
            message: format!(
                "non-finite value at row {}, column {}",
                pos % x.nrows(),
                pos / x.nrows()
            ),
        }),
        None => Ok(()),
    }
}

/// Copies the given rows of `x` into a new matrix, preserving order.
pub fn select_rows(x: &Matrix, rows: &[usize]) -> Matrix {
    Matrix::from_fn(rows.len(), x.ncols(), |i, j| x[(rows[i], j)])
}
