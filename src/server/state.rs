use biopsy_core::{BiopsyError, Result};
use biopsy_models::LogisticRegression;
use tracing::info;

use crate::config::ServeConfig;
use crate::datasets::{FeatureSchema, Variant};
use crate::io::load_json;
use crate::preprocessors::StandardScaler;

/// Artifacts loaded once at startup and shared read-only by every request.
#[derive(Debug)]
pub struct AppState {
    pub variant: Variant,
    pub model: LogisticRegression,
    pub scaler: Option<StandardScaler>,
}

impl AppState {
    /// Checks that the artifacts fit the variant's feature vector.
    pub fn new(variant: Variant, model: LogisticRegression, scaler: Option<StandardScaler>) -> Result<Self> {
        let expected = variant.schema().len();

        match model.n_features() {
            None => return Err(BiopsyError::NotFitted),
            Some(n) if n != expected => {
                return Err(BiopsyError::ShapeMismatch {
                    expected: format!("model with {expected} features for {variant}"),
                    got: format!("model with {n} features"),
                })
            }
            Some(_) => {}
        }

        let scaler = if variant.uses_scaler() {
            let scaler = scaler.ok_or_else(|| {
                BiopsyError::InvalidParameter(format!("{variant} requires a fitted scaler"))
            })?;
            match scaler.n_features() {
                None => return Err(BiopsyError::NotFitted),
                Some(n) if n != expected => {
                    return Err(BiopsyError::ShapeMismatch {
                        expected: format!("scaler with {expected} features for {variant}"),
                        got: format!("scaler with {n} features"),
                    })
                }
                Some(_) => Some(scaler),
            }
        } else {
            None
        };

        let malignant = variant.schema().malignant_label;
        if model.classes().len() != 2 || !model.classes().contains(&malignant) {
            return Err(BiopsyError::InvalidParameter(format!(
                "{variant} model must hold two classes including {malignant}, found {:?}",
                model.classes()
            )));
        }

        Ok(Self {
            variant,
            model,
            scaler,
        })
    }

    /// Deserializes the model (and scaler, where the variant uses one).
    pub fn load(variant: Variant, config: &ServeConfig) -> Result<Self> {
        let model_path = config.model_path(variant);
        let model: LogisticRegression = load_json(&model_path)?;
        let scaler = match config.scaler_path(variant) {
            Some(path) => Some(load_json::<StandardScaler>(&path)?),
            None => None,
        };

        info!(
            %variant,
            model = %model_path.display(),
            scaler = scaler.is_some(),
            "Loaded artifacts"
        );
        Self::new(variant, model, scaler)
    }

    pub fn schema(&self) -> &'static FeatureSchema {
        self.variant.schema()
    }
}
