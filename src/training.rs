//! Offline training pipeline: load → (standardize) → split → fit → evaluate →
//! cross-validate → persist.

use biopsy_core::{BiopsyError, Float, Label, Result};
use biopsy_models::LogisticRegression;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::TrainConfig;
use crate::datasets::{load_dataset, train_test_split, Dataset, Variant};
use crate::io::save_json;
use crate::metrics::{roc_auc_score, ClassificationReport, ConfusionMatrix};
use crate::preprocessors::StandardScaler;
use crate::validation::{cross_val_score, CrossValidation, Scoring};

/// Held-out evaluation of the fitted model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestMetrics {
    /// Row/column order of `confusion_matrix`.
    pub labels: Vec<Label>,
    pub confusion_matrix: Vec<Vec<usize>>,
    pub classification_report: ClassificationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roc_auc: Option<Float>,
}

/// Contents of the metrics JSON file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub variant: Variant,
    pub n_train: usize,
    pub n_test: usize,
    pub test_metrics: TestMetrics,
    pub cross_validation_metrics: CrossValidation,
}

/// Everything a training run produces.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: LogisticRegression,
    pub scaler: Option<StandardScaler>,
    pub metrics: MetricsReport,
}

/// Fits and evaluates a model for `variant` on an already loaded dataset.
///
/// Performs no I/O.
pub fn train(variant: Variant, dataset: &Dataset, config: &TrainConfig) -> Result<TrainingOutcome> {
    config.validate()?;

    let schema = variant.schema();
    if dataset.n_features() != schema.len() {
        return Err(BiopsyError::ShapeMismatch {
            expected: format!("{} features for {variant}", schema.len()),
            got: format!("{} features", dataset.n_features()),
        });
    }
    if !dataset.y.contains(&schema.malignant_label) {
        return Err(BiopsyError::InvalidTrainingData {
            message: format!(
                "class {} (malignant) missing from labels {:?}",
                schema.malignant_label,
                dataset.class_counts()
            ),
        });
    }

    let (x, scaler) = if variant.uses_scaler() {
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&dataset.x)?;
        (scaled, Some(scaler))
    } else {
        (dataset.x.clone(), None)
    };

    let split = train_test_split(&x, &dataset.y, config.test_size, config.seed)?;
    info!(
        train = split.y_train.len(),
        test = split.y_test.len(),
        seed = config.seed,
        "Split dataset"
    );

    let template = LogisticRegression::new(config.c, config.max_iter);
    let mut model = template.unfitted();
    model.fit(&split.x_train, &split.y_train)?;
    if model.converged() {
        info!(iterations = model.n_iter(), "Logistic regression converged");
    } else {
        warn!(
            max_iter = config.max_iter,
            "Logistic regression hit the iteration cap before converging"
        );
    }

    let y_pred = model.predict(&split.x_test)?;
    let cm = ConfusionMatrix::from_predictions(&split.y_test, &y_pred)?;
    let report = ClassificationReport::from_confusion_matrix(&cm);

    let (roc_auc, scoring) = match variant {
        Variant::Clump => (None, Scoring::Accuracy),
        Variant::Wdbc => {
            let proba = model.predict_proba(&split.x_test)?;
            let auc = roc_auc_score(&split.y_test, proba.as_slice(), model.classes()[1])?;
            (Some(auc), Scoring::RocAuc)
        }
    };

    let cv = cross_val_score(&template, &split.x_train, &split.y_train, config.cv_folds, scoring)?;
    info!(scoring = ?cv.scoring, mean = cv.mean, std = cv.std, "Cross-validation finished");

    let metrics = MetricsReport {
        variant,
        n_train: split.y_train.len(),
        n_test: split.y_test.len(),
        test_metrics: TestMetrics {
            labels: cm.labels.clone(),
            confusion_matrix: cm.counts.clone(),
            classification_report: report,
            roc_auc,
        },
        cross_validation_metrics: cv,
    };

    Ok(TrainingOutcome {
        model,
        scaler,
        metrics,
    })
}

/// Human-readable evaluation summary printed after training.
pub fn render_summary(metrics: &MetricsReport) -> String {
    let test = &metrics.test_metrics;
    let cm = ConfusionMatrix {
        labels: test.labels.clone(),
        counts: test.confusion_matrix.clone(),
    };

    let mut out = String::new();
    out.push_str("\nModel Evaluation:\n");
    out.push_str("Confusion Matrix:\n");
    out.push_str(&cm.to_string());
    out.push_str("\nClassification Report:\n");
    out.push_str(&test.classification_report.to_string());
    if let Some(auc) = test.roc_auc {
        out.push_str(&format!("\nROC AUC Score: {auc:.4}\n"));
    }

    let cv = &metrics.cross_validation_metrics;
    let name = match cv.scoring {
        Scoring::Accuracy => "Accuracy",
        Scoring::RocAuc => "ROC AUC",
    };
    out.push_str(&format!(
        "\nCross Validation {name}: {:.2}%\nStandard Deviation: {:.2}%\n",
        cv.mean * 100.0,
        cv.std * 100.0
    ));
    out
}

/// Writes the model, the scaler (if any) and the metrics report.
pub fn save_artifacts(outcome: &TrainingOutcome, config: &TrainConfig) -> Result<()> {
    save_json(&outcome.model, &config.model_path)?;

    match (&outcome.scaler, &config.scaler_path) {
        (Some(scaler), Some(path)) => save_json(scaler, path)?,
        (Some(_), None) => {
            return Err(BiopsyError::InvalidParameter(
                "a scaler was fitted but no scaler_path is configured".into(),
            ))
        }
        _ => {}
    }

    save_json(&outcome.metrics, &config.metrics_path)?;
    info!(
        model = %config.model_path.display(),
        metrics = %config.metrics_path.display(),
        "Saved artifacts"
    );
    Ok(())
}

/// Full training run for `variant`: load the configured dataset, train,
/// print the summary and persist all artifacts.
pub fn run(variant: Variant, config: &TrainConfig) -> Result<TrainingOutcome> {
    config.validate()?;

    let dataset = load_dataset(variant, &config.dataset)?;
    let outcome = train(variant, &dataset, config)?;

    print!("{}", render_summary(&outcome.metrics));
    save_artifacts(&outcome, config)?;

    match &config.scaler_path {
        Some(scaler) if outcome.scaler.is_some() => println!(
            "\nModel, scaler and metrics saved to {}, {} and {}",
            config.model_path.display(),
            scaler.display(),
            config.metrics_path.display()
        ),
        _ => println!(
            "\nModel and metrics saved to {} and {}",
            config.model_path.display(),
            config.metrics_path.display()
        ),
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use biopsy_core::Matrix;

    /// 9-feature cytology-like data: malignant rows score high on every feature.
    fn clump_dataset(n: usize) -> Dataset {
        let x = Matrix::from_fn(n, 9, |i, j| {
            let base = if i % 3 == 0 { 7.0 } else { 2.0 };
            base + ((i * 7 + j * 3) % 5) as Float * 0.6
        });
        let y = (0..n).map(|i| if i % 3 == 0 { 4 } else { 2 }).collect();
        Dataset {
            x,
            y,
            feature_names: Vec::new(),
        }
    }

    fn clump_config() -> TrainConfig {
        TrainConfig {
            cv_folds: 3,
            ..TrainConfig::defaults(Variant::Clump)
        }
    }

    #[test]
    fn test_train_clump_reports_accuracy_cv() {
        let dataset = clump_dataset(60);
        let outcome = train(Variant::Clump, &dataset, &clump_config()).unwrap();

        assert!(outcome.scaler.is_none());
        assert_eq!(outcome.model.classes(), &[2, 4]);
        assert_eq!(outcome.metrics.n_test, 12);
        assert_eq!(outcome.metrics.n_train, 48);
        assert_eq!(outcome.metrics.test_metrics.roc_auc, None);
        assert_eq!(outcome.metrics.cross_validation_metrics.scoring, Scoring::Accuracy);
        assert_eq!(outcome.metrics.cross_validation_metrics.folds.len(), 3);
    }

    #[test]
    fn test_train_rejects_wrong_feature_count() {
        let mut dataset = clump_dataset(30);
        dataset.x = dataset.x.columns(0, 4).into_owned();
        assert!(matches!(
            train(Variant::Clump, &dataset, &clump_config()),
            Err(BiopsyError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_train_requires_malignant_class() {
        let mut dataset = clump_dataset(30);
        dataset.y = dataset.y.iter().map(|&l| if l == 4 { 3 } else { 2 }).collect();
        assert!(matches!(
            train(Variant::Clump, &dataset, &clump_config()),
            Err(BiopsyError::InvalidTrainingData { .. })
        ));
    }

    #[test]
    fn test_train_is_deterministic() {
        let dataset = clump_dataset(90);
        let a = train(Variant::Clump, &dataset, &clump_config()).unwrap();
        let b = train(Variant::Clump, &dataset, &clump_config()).unwrap();
        assert_eq!(a.metrics, b.metrics);
    }

    #[test]
    fn test_render_summary_mentions_sections() {
        let dataset = clump_dataset(60);
        let outcome = train(Variant::Clump, &dataset, &clump_config()).unwrap();
        let text = render_summary(&outcome.metrics);

        assert!(text.contains("Confusion Matrix:"));
        assert!(text.contains("Classification Report:"));
        assert!(text.contains("Cross Validation Accuracy:"));
        assert!(!text.contains("ROC AUC Score"));
    }

    #[test]
    fn test_metrics_json_layout() {
        let dataset = clump_dataset(60);
        let outcome = train(Variant::Clump, &dataset, &clump_config()).unwrap();
        let json = serde_json::to_value(&outcome.metrics).unwrap();

        assert_eq!(json["variant"], "clump");
        assert!(json["test_metrics"]["confusion_matrix"].is_array());
        assert!(json["test_metrics"]["classification_report"]["4"].is_object());
        assert!(json["test_metrics"].get("roc_auc").is_none());
        assert_eq!(json["cross_validation_metrics"]["scoring"], "accuracy");
    }
}
