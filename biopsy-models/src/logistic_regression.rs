#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use biopsy_core::{log_loss, sigmoid, BiopsyError, Float, Label, Matrix, Predictions, Result, Vector};

/// Ridge added to the intercept's Hessian entry so the Newton system stays
/// positive definite when every sample is saturated.
const INTERCEPT_RIDGE: Float = 1e-10;

/// Maximum number of step halvings tried per Newton iteration.
const MAX_BACKTRACKS: usize = 30;

/// Binary **logistic regression** with L2 regularization.
///
/// The model scores a sample `x` with the affine function
///
/// ```text
/// z = xᵀ w + b
/// P(y = positive | x) = σ(z) = 1 / (1 + e^{-z})
/// ```
///
/// # Training objective
///
/// ```text
/// minimize_w,b  ½‖w‖²₂ + C · Σ_i [ log(1 + e^{z_i}) − t_i z_i ]
/// ```
///
/// where `t_i ∈ {0, 1}` marks the positive class and `C` is the inverse
/// regularization strength. The intercept `b` is not penalized.
///
/// # Solver
///
/// Newton's method (iteratively reweighted least squares) on the augmented
/// parameter vector `θ = [w; b]`:
///
/// ```text
/// g = C X̃ᵀ (p − t) + [w; 0]
/// H = C X̃ᵀ diag(p ⊙ (1 − p)) X̃ + diag(1, …, 1, 0)
/// θ ← θ − α H⁻¹ g
/// ```
///
/// with a backtracking step `α ∈ {1, ½, ¼, …}` that never increases the
/// objective. Iteration stops once `max|g| < tol` or after `max_iter` steps.
/// The solver has no random component: equal inputs give bit-identical
/// parameters.
///
/// # Labels
///
/// Any two distinct integer class codes are accepted (e.g. `2`/`4` or `0`/`1`).
/// They are stored sorted; the larger one is the positive class whose
/// probability [`predict_proba`](LogisticRegression::predict_proba) reports.
///
/// # Errors
///
/// - [`BiopsyError::EmptyTrainingData`] if `x` has zero rows
/// - [`BiopsyError::ShapeMismatch`] if label count or feature count disagree
/// - [`BiopsyError::InvalidTrainingData`] if `y` does not hold exactly two classes
/// - [`BiopsyError::InvalidHyperparameter`] if `C <= 0`, `max_iter == 0` or `tol <= 0`
/// - [`BiopsyError::InvalidValue`] if `x` contains `NaN`/infinite entries
/// - [`BiopsyError::SingularMatrix`] if a Newton system cannot be solved
/// - [`BiopsyError::NotFitted`] if prediction is called before fitting
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Coefficients `w` (length `n_features`), `None` until fitted.
    weights: Option<Vector>,
    /// Intercept `b`.
    intercept: Float,
    /// Sorted class codes seen during fit; `classes[1]` is the positive class.
    classes: Vec<Label>,
    /// Inverse regularization strength.
    c: Float,
    /// Iteration cap for the Newton solver.
    max_iter: usize,
    /// Gradient tolerance.
    tol: Float,
    /// Iterations actually performed by the last fit.
    n_iter: usize,
    /// Whether the last fit reached `tol` before `max_iter`.
    converged: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            weights: None,
            intercept: 0.0,
            classes: Vec::new(),
            c: 1.0,
            max_iter: 100,
            tol: 1e-4,
            n_iter: 0,
            converged: false,
        }
    }
}

impl LogisticRegression {
    /// Creates a new, unfitted model with inverse regularization strength `c`
    /// and an iteration cap of `max_iter`.
    ///
    /// ```ignore
    /// let model = LogisticRegression::new(1.0, 1000);
    /// ```
    pub fn new(c: Float, max_iter: usize) -> Self {
        Self {
            c,
            max_iter,
            ..Self::default()
        }
    }

    /// Overrides the gradient tolerance (default `1e-4`).
    pub fn with_tol(mut self, tol: Float) -> Self {
        self.tol = tol;
        self
    }

    /// Returns an unfitted copy carrying the same hyperparameters.
    pub fn unfitted(&self) -> Self {
        Self::new(self.c, self.max_iter).with_tol(self.tol)
    }

    fn validate_hyperparameters(&self) -> Result<()> {
        if !(self.c > 0.0) || !self.c.is_finite() {
            return Err(BiopsyError::InvalidHyperparameter {
                name: "c".into(),
                value: self.c.to_string(),
            });
        }
        if self.max_iter == 0 {
            return Err(BiopsyError::InvalidHyperparameter {
                name: "max_iter".into(),
                value: "0".into(),
            });
        }
        if !(self.tol > 0.0) {
            return Err(BiopsyError::InvalidHyperparameter {
                name: "tol".into(),
                value: self.tol.to_string(),
            });
        }
        Ok(())
    }

    /// Fits `w` and `b` on design matrix `x` (`n × d`) and labels `y` (length `n`).
    pub fn fit(&mut self, x: &Matrix, y: &[Label]) -> Result<()> {
        self.validate_hyperparameters()?;

        let n = x.nrows();
        let d = x.ncols();

        if n == 0 {
            return Err(BiopsyError::EmptyTrainingData);
        }
        if y.len() != n {
            return Err(BiopsyError::ShapeMismatch {
                expected: format!("{} labels", n),
                got: format!("{} labels", y.len()),
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(BiopsyError::InvalidValue {
                message: "non-finite value in training matrix".into(),
            });
        }

        let mut classes: Vec<Label> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() != 2 {
            return Err(BiopsyError::InvalidTrainingData {
                message: format!("expected exactly 2 classes, found {:?}", classes),
            });
        }

        let t = Vector::from_iterator(n, y.iter().map(|&l| if l == classes[1] { 1.0 } else { 0.0 }));

        // X̃ = [X | 1]
        let xt = Matrix::from_fn(n, d + 1, |i, j| if j < d { x[(i, j)] } else { 1.0 });

        let mut theta = Vector::zeros(d + 1);
        let mut objective = self.objective(&xt, &t, &theta);
        let mut converged = false;
        let mut n_iter = 0;

        for _ in 0..self.max_iter {
            let z = &xt * &theta;
            let p = z.map(sigmoid);

            let mut grad = xt.tr_mul(&(&p - &t)) * self.c;
            for j in 0..d {
                grad[j] += theta[j];
            }

            if grad.amax() < self.tol {
                converged = true;
                break;
            }

            let weights = p.map(|pi| pi * (1.0 - pi));
            let xw = Matrix::from_fn(n, d + 1, |i, j| xt[(i, j)] * weights[i]);
            let mut hessian = xt.tr_mul(&xw) * self.c;
            for j in 0..d {
                hessian[(j, j)] += 1.0;
            }
            hessian[(d, d)] += INTERCEPT_RIDGE;

            let step = hessian
                .cholesky()
                .ok_or(BiopsyError::SingularMatrix)?
                .solve(&grad);

            let mut alpha = 1.0;
            let mut accepted = false;
            for _ in 0..MAX_BACKTRACKS {
                let candidate = &theta - &step * alpha;
                let candidate_objective = self.objective(&xt, &t, &candidate);
                if candidate_objective <= objective {
                    theta = candidate;
                    objective = candidate_objective;
                    accepted = true;
                    break;
                }
                alpha *= 0.5;
            }

            n_iter += 1;

            // No descent possible along the Newton direction: already at the optimum
            // up to floating-point resolution.
            if !accepted {
                converged = true;
                break;
            }
        }

        self.weights = Some(theta.rows(0, d).into_owned());
        self.intercept = theta[d];
        self.classes = classes;
        self.n_iter = n_iter;
        self.converged = converged;
        Ok(())
    }

    fn objective(&self, xt: &Matrix, t: &Vector, theta: &Vector) -> Float {
        let d = theta.len() - 1;
        let penalty = 0.5 * theta.rows(0, d).norm_squared();
        let z = xt * theta;
        let data: Float = z.iter().zip(t.iter()).map(|(&zi, &ti)| log_loss(zi, ti)).sum();
        penalty + self.c * data
    }

    /// Linear scores `z = X w + b`, one per row of `x`.
    pub fn decision_function(&self, x: &Matrix) -> Result<Vector> {
        let w = self.weights.as_ref().ok_or(BiopsyError::NotFitted)?;

        if x.ncols() != w.nrows() {
            return Err(BiopsyError::ShapeMismatch {
                expected: format!("{} features", w.nrows()),
                got: format!("{} features", x.ncols()),
            });
        }

        let mut scores = x * w;
        scores.add_scalar_mut(self.intercept);
        // inf - inf on extreme rows
        if let Some(row) = scores.iter().position(|z| z.is_nan()) {
            return Err(BiopsyError::InvalidValue {
                message: format!("decision score of row {row} is NaN"),
            });
        }
        Ok(scores)
    }

    /// `(negative, positive)` class codes.
    fn binary_classes(&self) -> Result<(Label, Label)> {
        if self.weights.is_none() {
            return Err(BiopsyError::NotFitted);
        }
        match self.classes.as_slice() {
            &[negative, positive] => Ok((negative, positive)),
            other => Err(BiopsyError::InvalidTrainingData {
                message: format!("expected 2 class labels, model holds {other:?}"),
            }),
        }
    }

    /// Probability of the positive class (`classes()[1]`) for each row of `x`.
    pub fn predict_proba(&self, x: &Matrix) -> Result<Vector> {
        self.binary_classes()?;
        Ok(self.decision_function(x)?.map(sigmoid))
    }

    /// Predicted class code for each row of `x`.
    pub fn predict(&self, x: &Matrix) -> Result<Predictions> {
        let (negative, positive) = self.binary_classes()?;
        let scores = self.decision_function(x)?;
        Ok(scores
            .iter()
            .map(|&z| if z > 0.0 { positive } else { negative })
            .collect())
    }

    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }

    /// Number of features the model was fitted on.
    pub fn n_features(&self) -> Option<usize> {
        self.weights.as_ref().map(|w| w.len())
    }

    pub fn coefficients(&self) -> Option<&Vector> {
        self.weights.as_ref()
    }

    pub fn intercept(&self) -> Float {
        self.intercept
    }

    /// Sorted class codes; empty before fitting.
    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    pub fn c(&self) -> Float {
        self.c
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}
