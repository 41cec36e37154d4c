use biopsy_core::utils::select_rows;
use biopsy_core::{BiopsyError, Float, Label, Matrix, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Held-out partitioning of a dataset.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Matrix,
    pub x_test: Matrix,
    pub y_train: Vec<Label>,
    pub y_test: Vec<Label>,
}

/// Shuffles row indices with a `seed`-ed generator and carves off
/// `ceil(test_size · n)` rows for testing; the rest is the training partition.
///
/// Equal `seed`, `test_size` and inputs always produce the same partition.
///
/// # Errors
///
/// - [`BiopsyError::ShapeMismatch`] if `y.len() != x.nrows()`
/// - [`BiopsyError::InvalidParameter`] if `test_size` is outside `(0, 1)` or
///   either partition would be empty
pub fn train_test_split(x: &Matrix, y: &[Label], test_size: Float, seed: u64) -> Result<TrainTestSplit> {
    let n = x.nrows();
    if y.len() != n {
        return Err(BiopsyError::ShapeMismatch {
            expected: format!("{} labels", n),
            got: format!("{} labels", y.len()),
        });
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(BiopsyError::InvalidParameter(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    let n_test = (test_size * n as Float).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(BiopsyError::InvalidParameter(format!(
            "test_size {test_size} leaves an empty partition for {n} samples"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);

    Ok(TrainTestSplit {
        x_train: select_rows(x, train_idx),
        x_test: select_rows(x, test_idx),
        y_train: train_idx.iter().map(|&i| y[i]).collect(),
        y_test: test_idx.iter().map(|&i| y[i]).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed(n: usize) -> (Matrix, Vec<Label>) {
        let x = Matrix::from_fn(n, 2, |i, j| (i * 10 + j) as Float);
        let y = (0..n).map(|i| i % 2).collect();
        (x, y)
    }

    #[test]
    fn test_split_sizes_round_test_up() {
        let (x, y) = indexed(11);
        let split = train_test_split(&x, &y, 0.2, 0).unwrap();
        assert_eq!(split.x_test.nrows(), 3);
        assert_eq!(split.x_train.nrows(), 8);
        assert_eq!(split.y_test.len(), 3);
        assert_eq!(split.y_train.len(), 8);
    }

    #[test]
    fn test_split_is_a_partition() {
        let (x, y) = indexed(20);
        let split = train_test_split(&x, &y, 0.25, 7).unwrap();

        let mut ids: Vec<usize> = split
            .x_train
            .column(0)
            .iter()
            .chain(split.x_test.column(0).iter())
            .map(|v| (*v as usize) / 10)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_rows_keep_their_labels() {
        let (x, y) = indexed(15);
        let split = train_test_split(&x, &y, 0.3, 3).unwrap();
        for (i, label) in split.y_train.iter().enumerate() {
            let id = split.x_train[(i, 0)] as usize / 10;
            assert_eq!(*label, id % 2);
        }
    }

    #[test]
    fn test_split_deterministic_for_seed() {
        let (x, y) = indexed(30);
        let a = train_test_split(&x, &y, 0.2, 42).unwrap();
        let b = train_test_split(&x, &y, 0.2, 42).unwrap();
        assert_eq!(a.x_test, b.x_test);
        assert_eq!(a.y_train, b.y_train);
    }

    #[test]
    fn test_split_differs_across_seeds() {
        let (x, y) = indexed(50);
        let a = train_test_split(&x, &y, 0.2, 1).unwrap();
        let b = train_test_split(&x, &y, 0.2, 2).unwrap();
        assert_ne!(a.x_test, b.x_test);
    }

    #[test]
    fn test_split_invalid_test_size() {
        let (x, y) = indexed(10);
        for size in [0.0, 1.0, -0.5, Float::NAN] {
            assert!(matches!(
                train_test_split(&x, &y, size, 0),
                Err(BiopsyError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_split_label_mismatch() {
        let (x, _) = indexed(4);
        assert!(matches!(
            train_test_split(&x, &[0, 1], 0.5, 0),
            Err(BiopsyError::ShapeMismatch { .. })
        ));
    }
}
