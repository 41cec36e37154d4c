use crate::Float;

/// Logistic function `σ(z) = 1 / (1 + e^{-z})`.
///
/// Evaluated in the form that never exponentiates a large positive number, so
/// the result stays finite and inside `[0, 1]` for any finite `z`.
///
/// ```rust
/// use biopsy_core::sigmoid;
///
/// assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
/// assert!(sigmoid(800.0) <= 1.0);
/// assert!(sigmoid(-800.0) >= 0.0);
/// ```
pub fn sigmoid(z: Float) -> Float {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Binary cross-entropy of a single sample given its linear score `z` and
/// target `y ∈ {0, 1}`.
///
/// Uses `log(1 + e^z) - y·z`, which avoids taking `log(0)` for saturated
/// probabilities.
pub fn log_loss(z: Float, y: Float) -> Float {
    softplus(z) - y * z
}

fn softplus(z: Float) -> Float {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_symmetry() {
        for z in [-5.0, -1.0, 0.3, 2.0, 7.5] {
            assert!((sigmoid(z) + sigmoid(-z) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sigmoid_saturates_without_nan() {
        assert_eq!(sigmoid(1e6), 1.0);
        assert_eq!(sigmoid(-1e6), 0.0);
    }

    #[test]
    fn test_log_loss_matches_definition() {
        let z: Float = 0.7;
        let p = sigmoid(z);
        let expected = -(p.ln());
        assert!((log_loss(z, 1.0) - expected).abs() < 1e-12);

        let expected_neg = -((1.0 - p).ln());
        assert!((log_loss(z, 0.0) - expected_neg).abs() < 1e-12);
    }

    #[test]
    fn test_log_loss_large_scores_finite() {
        assert!(log_loss(1000.0, 0.0).is_finite());
        assert!(log_loss(-1000.0, 1.0).is_finite());
        assert!(log_loss(1000.0, 1.0).abs() < 1e-12);
    }
}
