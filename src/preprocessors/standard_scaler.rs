use biopsy_core::utils::{column_means, column_variances, ensure_finite};
use biopsy_core::{BiopsyError, Matrix, Result, Vector};
use serde::{Deserialize, Serialize};

/// Per-feature standardization `z = (x − μ) / σ`.
///
/// `μ` and the population variance `σ²` are captured by [`fit`](StandardScaler::fit)
/// on the training distribution. Constant features (`σ = 0`) get a scale of
/// `1` so they map to `0` instead of `NaN`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Vector>,
    var: Option<Vector>,
    scale: Option<Vector>,
    n_samples_seen: usize,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit(&mut self, x: &Matrix) -> Result<()> {
        if x.nrows() == 0 {
            return Err(BiopsyError::EmptyTrainingData);
        }
        ensure_finite(x)?;

        let mean = column_means(x);
        let var = column_variances(x, &mean);
        let scale = var.map(|v| if v > 0.0 { v.sqrt() } else { 1.0 });

        self.mean = Some(mean);
        self.var = Some(var);
        self.scale = Some(scale);
        self.n_samples_seen = x.nrows();
        Ok(())
    }

    pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
        let (mean, scale) = match (&self.mean, &self.scale) {
            (Some(m), Some(s)) => (m, s),
            _ => return Err(BiopsyError::NotFitted),
        };

        if x.ncols() != mean.len() {
            return Err(BiopsyError::ShapeMismatch {
                expected: format!("{} features", mean.len()),
                got: format!("{} features", x.ncols()),
            });
        }

        Ok(Matrix::from_fn(x.nrows(), x.ncols(), |i, j| {
            (x[(i, j)] - mean[j]) / scale[j]
        }))
    }

    pub fn fit_transform(&mut self, x: &Matrix) -> Result<Matrix> {
        self.fit(x)?;
        self.transform(x)
    }

    pub fn n_features(&self) -> Option<usize> {
        self.mean.as_ref().map(|m| m.len())
    }

    pub fn mean(&self) -> Option<&Vector> {
        self.mean.as_ref()
    }

    pub fn var(&self) -> Option<&Vector> {
        self.var.as_ref()
    }

    pub fn n_samples_seen(&self) -> usize {
        self.n_samples_seen
    }
}
