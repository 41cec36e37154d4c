use std::fmt;

use biopsy_core::{Float, Label, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::ConfusionMatrix;

/// Precision, recall, F1 and support of one class (or of an average row).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: Float,
    pub recall: Float,
    #[serde(rename = "f1-score")]
    pub f1_score: Float,
    pub support: usize,
}

/// Per-class scores plus accuracy and macro / weighted averages.
///
/// Serializes to a flat map keyed by class code, `"accuracy"`, `"macro avg"`
/// and `"weighted avg"`. Undefined ratios (zero denominators) are reported
/// as `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes: Vec<(Label, ClassMetrics)>,
    pub accuracy: Float,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

fn ratio(num: usize, den: usize) -> Float {
    if den == 0 {
        0.0
    } else {
        num as Float / den as Float
    }
}

fn f1(precision: Float, recall: Float) -> Float {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ClassificationReport {
    pub fn from_predictions(y_true: &[Label], y_pred: &[Label]) -> Result<Self> {
        let cm = ConfusionMatrix::from_predictions(y_true, y_pred)?;
        Ok(Self::from_confusion_matrix(&cm))
    }

    pub fn from_confusion_matrix(cm: &ConfusionMatrix) -> Self {
        let classes: Vec<(Label, ClassMetrics)> = cm
            .labels
            .iter()
            .enumerate()
            .map(|(i, &label)| {
                let tp = cm.counts[i][i];
                let precision = ratio(tp, cm.column_total(i));
                let recall = ratio(tp, cm.row_total(i));
                let metrics = ClassMetrics {
                    precision,
                    recall,
                    f1_score: f1(precision, recall),
                    support: cm.row_total(i),
                };
                (label, metrics)
            })
            .collect();

        let total = cm.total();
        let k = classes.len().max(1) as Float;

        let macro_avg = ClassMetrics {
            precision: classes.iter().map(|(_, m)| m.precision).sum::<Float>() / k,
            recall: classes.iter().map(|(_, m)| m.recall).sum::<Float>() / k,
            f1_score: classes.iter().map(|(_, m)| m.f1_score).sum::<Float>() / k,
            support: total,
        };

        let weight = |m: &ClassMetrics| ratio(m.support, total);
        let weighted_avg = ClassMetrics {
            precision: classes.iter().map(|(_, m)| m.precision * weight(m)).sum(),
            recall: classes.iter().map(|(_, m)| m.recall * weight(m)).sum(),
            f1_score: classes.iter().map(|(_, m)| m.f1_score * weight(m)).sum(),
            support: total,
        };

        Self {
            classes,
            accuracy: ratio(cm.correct(), total),
            macro_avg,
            weighted_avg,
        }
    }

    pub fn class(&self, label: Label) -> Option<&ClassMetrics> {
        self.classes.iter().find(|(l, _)| *l == label).map(|(_, m)| m)
    }
}

impl Serialize for ClassificationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.classes.len() + 3))?;
        for (label, metrics) in &self.classes {
            map.serialize_entry(&label.to_string(), metrics)?;
        }
        map.serialize_entry("accuracy", &self.accuracy)?;
        map.serialize_entry("macro avg", &self.macro_avg)?;
        map.serialize_entry("weighted avg", &self.weighted_avg)?;
        map.end()
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, w: usize, name: &str, m: &ClassMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>w$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
        name, m.precision, m.recall, m.f1_score, m.support
    )
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self
            .classes
            .iter()
            .map(|(l, _)| l.to_string().len())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(12);

        writeln!(
            f,
            "{:>w$}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;

        for (label, metrics) in &self.classes {
            write_row(f, w, &label.to_string(), metrics)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>w$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        write_row(f, w, "macro avg", &self.macro_avg)?;
        write_row(f, w, "weighted avg", &self.weighted_avg)
    }
}
