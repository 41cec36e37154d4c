//! Held-out evaluation of a binary classifier.
//!
//! - **Confusion matrix** over the sorted union of observed labels
//! - **Classification report**: per-class precision, recall, F1 and support,
//!   plus accuracy and macro / support-weighted averages
//! - **ROC-AUC** from positive-class scores (rank statistic, ties averaged)

pub mod confusion;
pub mod report;
pub mod roc;

pub use confusion::ConfusionMatrix;
pub use report::{ClassMetrics, ClassificationReport};
pub use roc::roc_auc_score;

use biopsy_core::{BiopsyError, Float, Label, Result};

/// Fraction of positions where `y_pred` equals `y_true`.
pub fn accuracy_score(y_true: &[Label], y_pred: &[Label]) -> Result<Float> {
    check_lengths(y_true.len(), y_pred.len())?;
    if y_true.is_empty() {
        return Err(BiopsyError::EmptyTrainingData);
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(correct as Float / y_true.len() as Float)
}

pub(crate) fn check_lengths(n_true: usize, n_pred: usize) -> Result<()> {
    if n_true != n_pred {
        return Err(BiopsyError::ShapeMismatch {
            expected: format!("{} predictions", n_true),
            got: format!("{} predictions", n_pred),
        });
    }
    Ok(())
}

/// Sorted, de-duplicated union of the labels in both slices.
pub(crate) fn unique_labels(y_true: &[Label], y_pred: &[Label]) -> Vec<Label> {
    let mut labels: Vec<Label> = y_true.iter().chain(y_pred).copied().collect();
    labels.sort_unstable();
    labels.dedup();
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_score() {
        assert_eq!(accuracy_score(&[0, 1, 1, 0], &[0, 1, 0, 0]).unwrap(), 0.75);
    }

    #[test]
    fn test_accuracy_score_length_mismatch() {
        assert!(matches!(
            accuracy_score(&[0, 1], &[0]),
            Err(BiopsyError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_unique_labels_union_sorted() {
        assert_eq!(unique_labels(&[4, 2, 4], &[2, 3]), vec![2, 3, 4]);
    }
}
