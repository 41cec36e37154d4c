//! YAML configuration for the trainer and the predictor service.
//!
//! Every field is optional; omitted values fall back to the per-variant
//! defaults in [`TrainConfig::defaults`] and [`ServeConfig::default`].

use std::path::{Path, PathBuf};

use biopsy_core::{BiopsyError, Float, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::datasets::Variant;

/// Remote copy of the Wisconsin Diagnostic dataset.
pub const WDBC_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/breast-cancer-wisconsin/wdbc.data";

/// Fully resolved trainer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Local path or `http(s)://` URL.
    pub dataset: String,
    pub model_path: PathBuf,
    /// Only written by variants that standardize features.
    pub scaler_path: Option<PathBuf>,
    pub metrics_path: PathBuf,
    pub test_size: Float,
    pub seed: u64,
    pub cv_folds: usize,
    pub max_iter: usize,
    /// Inverse L2 regularization strength.
    pub c: Float,
}

impl TrainConfig {
    pub fn defaults(variant: Variant) -> Self {
        match variant {
            Variant::Clump => Self {
                dataset: "data/breast_cancer.csv".into(),
                model_path: "clump_model.json".into(),
                scaler_path: None,
                metrics_path: "clump_model_metrics.json".into(),
                test_size: 0.2,
                seed: 0,
                cv_folds: 10,
                max_iter: 100,
                c: 1.0,
            },
            Variant::Wdbc => Self {
                dataset: WDBC_URL.into(),
                model_path: "wdbc_model.json".into(),
                scaler_path: Some("wdbc_scaler.json".into()),
                metrics_path: "wdbc_model_metrics.json".into(),
                test_size: 0.2,
                seed: 42,
                cv_folds: 5,
                max_iter: 1000,
                c: 1.0,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(BiopsyError::InvalidParameter(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.cv_folds < 2 {
            return Err(BiopsyError::InvalidParameter(format!(
                "cv_folds must be at least 2, got {}",
                self.cv_folds
            )));
        }
        if self.max_iter == 0 {
            return Err(BiopsyError::InvalidParameter("max_iter must be positive".into()));
        }
        if !(self.c > 0.0) {
            return Err(BiopsyError::InvalidParameter(format!("c must be positive, got {}", self.c)));
        }
        Ok(())
    }
}

/// Partial trainer settings as written in the YAML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainOverrides {
    pub dataset: Option<String>,
    pub model_path: Option<PathBuf>,
    pub scaler_path: Option<PathBuf>,
    pub metrics_path: Option<PathBuf>,
    pub test_size: Option<Float>,
    pub seed: Option<u64>,
    pub cv_folds: Option<usize>,
    pub max_iter: Option<usize>,
    pub c: Option<Float>,
}

impl TrainOverrides {
    pub fn apply(&self, mut base: TrainConfig) -> TrainConfig {
        if let Some(v) = &self.dataset {
            base.dataset = v.clone();
        }
        if let Some(v) = &self.model_path {
            base.model_path = v.clone();
        }
        // a scaler path only means something where a scaler is fitted
        if base.scaler_path.is_some() {
            if let Some(v) = &self.scaler_path {
                base.scaler_path = Some(v.clone());
            }
        }
        if let Some(v) = &self.metrics_path {
            base.metrics_path = v.clone();
        }
        if let Some(v) = self.test_size {
            base.test_size = v;
        }
        if let Some(v) = self.seed {
            base.seed = v;
        }
        if let Some(v) = self.cv_folds {
            base.cv_folds = v;
        }
        if let Some(v) = self.max_iter {
            base.max_iter = v;
        }
        if let Some(v) = self.c {
            base.c = v;
        }
        base
    }
}

/// Predictor service settings.
///
/// Unset artifact paths resolve to the trainer's defaults for the served
/// variant, so `train` and `serve` pair up without configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    pub listen_addr: String,
    pub model_path: Option<PathBuf>,
    /// Ignored by variants without a scaler.
    pub scaler_path: Option<PathBuf>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5000".into(),
            model_path: None,
            scaler_path: None,
        }
    }
}

impl ServeConfig {
    pub fn model_path(&self, variant: Variant) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| TrainConfig::defaults(variant).model_path)
    }

    /// `None` for variants that serve without a scaler.
    pub fn scaler_path(&self, variant: Variant) -> Option<PathBuf> {
        let default = TrainConfig::defaults(variant).scaler_path?;
        Some(self.scaler_path.clone().unwrap_or(default))
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub variant: Variant,
    pub train: TrainOverrides,
    pub serve: ServeConfig,
}

impl Config {
    /// Trainer settings for `variant`, with this file's overrides applied.
    pub fn train_config(&self, variant: Variant) -> TrainConfig {
        self.train.apply(TrainConfig::defaults(variant))
    }
}

/// Load a [`Config`] from a YAML file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the YAML is invalid.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;
    let config: Config = serde_yaml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config YAML: {}", e))?;
    Ok(config)
}

/// Loads `path` when given, otherwise returns the defaults.
pub fn load_or_default(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration from file");
            load_config(path)
        }
        None => {
            info!("No config file specified, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_yaml(yaml: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(yaml.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_defaults_per_variant() {
        let clump = TrainConfig::defaults(Variant::Clump);
        assert_eq!(clump.seed, 0);
        assert_eq!(clump.cv_folds, 10);
        assert_eq!(clump.scaler_path, None);
        assert!(clump.validate().is_ok());

        let wdbc = TrainConfig::defaults(Variant::Wdbc);
        assert_eq!(wdbc.dataset, WDBC_URL);
        assert_eq!(wdbc.scaler_path, Some(PathBuf::from("wdbc_scaler.json")));
        assert!(wdbc.validate().is_ok());
    }

    #[test]
    fn test_load_config_empty_uses_defaults() {
        let f = write_yaml("{}\n");
        let config = load_config(f.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.serve.listen_addr, "127.0.0.1:5000");
    }

    #[test]
    fn test_load_config_overrides() {
        let f = write_yaml(
            r#"
variant: clump
train:
  dataset: "fixtures/cells.csv"
  seed: 7
  cv_folds: 4
serve:
  listen_addr: "0.0.0.0:8080"
"#,
        );
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.variant, Variant::Clump);
        assert_eq!(config.serve.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.serve.model_path, None);
        assert_eq!(
            config.serve.model_path(Variant::Clump),
            PathBuf::from("clump_model.json")
        );

        let train = config.train_config(Variant::Clump);
        assert_eq!(train.dataset, "fixtures/cells.csv");
        assert_eq!(train.seed, 7);
        assert_eq!(train.cv_folds, 4);
        assert_eq!(train.test_size, 0.2);
    }

    #[test]
    fn test_scaler_override_ignored_without_scaler() {
        let overrides = TrainOverrides {
            scaler_path: Some("s.json".into()),
            ..TrainOverrides::default()
        };
        assert_eq!(overrides.apply(TrainConfig::defaults(Variant::Clump)).scaler_path, None);
        assert_eq!(
            overrides.apply(TrainConfig::defaults(Variant::Wdbc)).scaler_path,
            Some(PathBuf::from("s.json"))
        );
    }

    #[test]
    fn test_variants_default_to_distinct_artifacts() {
        let clump = TrainConfig::defaults(Variant::Clump);
        let wdbc = TrainConfig::defaults(Variant::Wdbc);
        assert_ne!(clump.model_path, wdbc.model_path);
        assert_ne!(clump.metrics_path, wdbc.metrics_path);

        let serve = ServeConfig::default();
        assert_eq!(serve.model_path(Variant::Clump), clump.model_path);
        assert_eq!(serve.model_path(Variant::Wdbc), wdbc.model_path);
        assert_eq!(serve.scaler_path(Variant::Clump), None);
        assert_eq!(serve.scaler_path(Variant::Wdbc), wdbc.scaler_path);
    }

    #[test]
    fn test_serve_paths_override_defaults() {
        let serve = ServeConfig {
            model_path: Some("models/m.json".into()),
            scaler_path: Some("models/s.json".into()),
            ..ServeConfig::default()
        };
        assert_eq!(serve.model_path(Variant::Wdbc), PathBuf::from("models/m.json"));
        assert_eq!(serve.scaler_path(Variant::Wdbc), Some(PathBuf::from("models/s.json")));
        assert_eq!(serve.scaler_path(Variant::Clump), None);
    }

    #[test]
    fn test_load_config_rejects_unknown_fields() {
        let f = write_yaml("train:\n  folds: 3\n");
        assert!(load_config(f.path()).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Path::new("/nonexistent/biopsy.yaml")).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = TrainConfig::defaults(Variant::Wdbc);
        config.test_size = 1.5;
        assert!(matches!(config.validate(), Err(BiopsyError::InvalidParameter(_))));

        let mut config = TrainConfig::defaults(Variant::Wdbc);
        config.cv_folds = 1;
        assert!(config.validate().is_err());

        let mut config = TrainConfig::defaults(Variant::Clump);
        config.c = 0.0;
        assert!(config.validate().is_err());
    }
}
