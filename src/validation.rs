//! K-fold cross-validation of a [`LogisticRegression`] template.

use biopsy_core::utils::{mean_std, select_rows};
use biopsy_core::{BiopsyError, Float, Label, Matrix, Result};
use biopsy_models::LogisticRegression;
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::metrics::{accuracy_score, roc_auc_score};

/// How each held-out fold is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    Accuracy,
    RocAuc,
}

/// Per-fold scores with their mean and population standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossValidation {
    pub scoring: Scoring,
    pub folds: Vec<Float>,
    pub mean: Float,
    pub std: Float,
}

/// One train/test index pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Stratified k-fold partitioning without shuffling.
///
/// Sorted labels are dealt round-robin to the `k` folds to decide how many
/// samples of each class every fold receives; then, class by class, samples in
/// their original order fill fold 0, fold 1, … up to those allocations. Each
/// fold therefore keeps the class proportions of `y` as closely as possible,
/// and the partition depends only on `y`.
///
/// # Errors
///
/// - [`BiopsyError::InvalidHyperparameter`] if `k < 2`, `k > n`, or every class
///   has fewer than `k` members
pub fn stratified_k_fold(y: &[Label], k: usize) -> Result<Vec<Fold>> {
    let n = y.len();
    if k < 2 || k > n {
        return Err(BiopsyError::InvalidHyperparameter {
            name: "cv_folds".into(),
            value: format!("{k} (samples: {n})"),
        });
    }

    let mut classes: Vec<Label> = y.to_vec();
    classes.sort_unstable();
    classes.dedup();

    let encoded: Vec<usize> = y
        .iter()
        .map(|l| classes.binary_search(l).unwrap_or_default())
        .collect();

    let mut class_counts = vec![0usize; classes.len()];
    for &c in &encoded {
        class_counts[c] += 1;
    }
    if class_counts.iter().all(|&c| c < k) {
        return Err(BiopsyError::InvalidHyperparameter {
            name: "cv_folds".into(),
            value: format!("{k} exceeds the size of every class {class_counts:?}"),
        });
    }

    let mut sorted = encoded.clone();
    sorted.sort_unstable();

    // allocation[fold][class]
    let mut allocation = vec![vec![0usize; classes.len()]; k];
    for (pos, &c) in sorted.iter().enumerate() {
        allocation[pos % k][c] += 1;
    }

    let mut test_fold = vec![0usize; n];
    for class in 0..classes.len() {
        let members = encoded
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == class)
            .map(|(i, _)| i);
        let assignments = (0..k).flat_map(|fold| std::iter::repeat(fold).take(allocation[fold][class]));
        for (sample, fold) in members.zip(assignments) {
            test_fold[sample] = fold;
        }
    }

    Ok((0..k)
        .map(|fold| {
            let (test, train): (Vec<usize>, Vec<usize>) = (0..n).partition(|&i| test_fold[i] == fold);
            Fold { train, test }
        })
        .collect())
}

fn score_fold(
    template: &LogisticRegression,
    x: &Matrix,
    y: &[Label],
    fold: &Fold,
    scoring: Scoring,
) -> Result<Float> {
    let x_train = select_rows(x, &fold.train);
    let y_train: Vec<Label> = fold.train.iter().map(|&i| y[i]).collect();
    let x_test = select_rows(x, &fold.test);
    let y_test: Vec<Label> = fold.test.iter().map(|&i| y[i]).collect();

    let mut model = template.unfitted();
    model.fit(&x_train, &y_train)?;

    match scoring {
        Scoring::Accuracy => accuracy_score(&y_test, &model.predict(&x_test)?),
        Scoring::RocAuc => {
            let proba = model.predict_proba(&x_test)?;
            roc_auc_score(&y_test, proba.as_slice(), model.classes()[1])
        }
    }
}

/// Refits an unfitted copy of `template` on each stratified fold of `(x, y)`
/// and scores it on the held-out part.
///
/// With the `parallel` feature folds are evaluated on the rayon pool; scores
/// are always returned in fold order.
pub fn cross_val_score(
    template: &LogisticRegression,
    x: &Matrix,
    y: &[Label],
    k: usize,
    scoring: Scoring,
) -> Result<CrossValidation> {
    if y.len() != x.nrows() {
        return Err(BiopsyError::ShapeMismatch {
            expected: format!("{} labels", x.nrows()),
            got: format!("{} labels", y.len()),
        });
    }

    let folds = stratified_k_fold(y, k)?;

    #[cfg(feature = "parallel")]
    let scores = folds
        .par_iter()
        .map(|fold| score_fold(template, x, y, fold, scoring))
        .collect::<Result<Vec<Float>>>()?;

    #[cfg(not(feature = "parallel"))]
    let scores = folds
        .iter()
        .map(|fold| score_fold(template, x, y, fold, scoring))
        .collect::<Result<Vec<Float>>>()?;

    let (mean, std) = mean_std(&scores);
    Ok(CrossValidation {
        scoring,
        folds: scores,
        mean,
        std,
    })
}
