use std::fmt;

use biopsy_core::{Label, Result};
use serde::{Deserialize, Serialize};

use super::{check_lengths, unique_labels};

/// Square count matrix: `counts[i][j]` is the number of samples whose true
/// label is `labels[i]` and whose predicted label is `labels[j]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<Label>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn from_predictions(y_true: &[Label], y_pred: &[Label]) -> Result<Self> {
        check_lengths(y_true.len(), y_pred.len())?;

        let labels = unique_labels(y_true, y_pred);
        let k = labels.len();
        let mut counts = vec![vec![0usize; k]; k];

        for (t, p) in y_true.iter().zip(y_pred) {
            // both present: labels is the union of y_true and y_pred
            let i = labels.binary_search(t).unwrap_or_default();
            let j = labels.binary_search(p).unwrap_or_default();
            counts[i][j] += 1;
        }

        Ok(Self { labels, counts })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Correct predictions (trace).
    pub fn correct(&self) -> usize {
        (0..self.labels.len()).map(|i| self.counts[i][i]).sum()
    }

    /// Samples whose true label is `labels[i]`.
    pub fn row_total(&self, i: usize) -> usize {
        self.counts[i].iter().sum()
    }

    /// Samples predicted as `labels[j]`.
    pub fn column_total(&self, j: usize) -> usize {
        self.counts.iter().map(|row| row[j]).sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);

        for (i, row) in self.counts.iter().enumerate() {
            let open = if i == 0 { "[[" } else { " [" };
            let cells: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
            let close = if i + 1 == self.counts.len() { "]]" } else { "]" };
            writeln!(f, "{open}{}{close}", cells.join(" "))?;
        }
        Ok(())
    }
}
