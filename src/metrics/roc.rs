use biopsy_core::{BiopsyError, Float, Label, Result};

use super::check_lengths;

/// Area under the ROC curve for scores of the `positive` class.
///
/// Computed as the Mann–Whitney statistic
///
/// ```text
/// AUC = (R₊ − n₊(n₊ + 1)/2) / (n₊ · n₋)
/// ```
///
/// where `R₊` is the sum of the (tie-averaged) ranks of positive samples.
/// This equals the trapezoidal area under the ROC curve, ties included.
///
/// # Errors
///
/// - [`BiopsyError::ShapeMismatch`] if the slices differ in length
/// - [`BiopsyError::InvalidValue`] if only one class is present or a score is `NaN`
pub fn roc_auc_score(y_true: &[Label], scores: &[Float], positive: Label) -> Result<Float> {
    check_lengths(y_true.len(), scores.len())?;

    if scores.iter().any(|s| s.is_nan()) {
        return Err(BiopsyError::InvalidValue {
            message: "NaN score passed to roc_auc_score".into(),
        });
    }

    let n_pos = y_true.iter().filter(|&&l| l == positive).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(BiopsyError::InvalidValue {
            message: "ROC AUC is undefined when only one class is present".into(),
        });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut rank_sum_pos = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // ranks start..end (0-based) share the average 1-based rank
        let avg_rank = (start + 1 + end) as Float / 2.0;
        let tied_pos = order[start..end]
            .iter()
            .filter(|&&i| y_true[i] == positive)
            .count();
        rank_sum_pos += avg_rank * tied_pos as Float;
        start = end;
    }

    let n_pos_f = n_pos as Float;
    Ok((rank_sum_pos - n_pos_f * (n_pos_f + 1.0) / 2.0) / (n_pos_f * n_neg as Float))
}
