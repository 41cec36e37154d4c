use std::collections::HashMap;

use biopsy_core::utils::ensure_finite;
use biopsy_core::{Float, Matrix};
use serde::Serialize;

use super::error::PredictError;
use super::state::AppState;
use crate::datasets::schema::{CLUMP_SCHEMA, WDBC_SCHEMA};

/// Coarse bucket of the positive-class probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    /// `High` when the probability is above 0.9 or below 0.1.
    pub fn from_probability(p: Float) -> Self {
        if p > 0.9 || p < 0.1 {
            Confidence::High
        } else {
            Confidence::Medium
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClumpVerdict {
    pub result: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WdbcVerdict {
    pub result: &'static str,
    pub probability: Float,
    pub confidence: Confidence,
}

/// Reads the 9 cytology fields without validation; the first absent or
/// non-numeric field aborts the conversion.
pub fn read_clump_features(form: &HashMap<String, String>) -> Result<Vec<Float>, PredictError> {
    CLUMP_SCHEMA
        .fields
        .iter()
        .map(|&field| {
            let raw = form
                .get(field)
                .ok_or_else(|| PredictError::Conversion(format!("missing form field '{field}'")))?;
            raw.trim().parse::<Float>().map_err(|_| {
                PredictError::Conversion(format!("could not convert string to float: '{raw}'"))
            })
        })
        .collect()
}

/// Validates the 30 diagnostic fields.
///
/// 1. every field present and non-blank, else [`PredictError::MissingFields`]
///    listing all offenders in schema order;
/// 2. every value a finite number, else [`PredictError::InvalidField`] naming
///    the first offender in schema order.
pub fn validate_wdbc_features(form: &HashMap<String, String>) -> Result<Vec<Float>, PredictError> {
    let missing: Vec<String> = WDBC_SCHEMA
        .fields
        .iter()
        .filter(|&&field| form.get(field).map_or(true, |v| v.trim().is_empty()))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PredictError::MissingFields(missing));
    }

    WDBC_SCHEMA
        .fields
        .iter()
        .map(|&field| {
            form[field]
                .trim()
                .parse::<Float>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| PredictError::InvalidField(field.to_string()))
        })
        .collect()
}

fn single_row(features: &[Float]) -> Matrix {
    Matrix::from_row_slice(1, features.len(), features)
}

impl AppState {
    pub fn predict_clump(&self, features: &[Float]) -> Result<ClumpVerdict, PredictError> {
        let label = self.model.predict(&single_row(features))?[0];
        let result = if label == CLUMP_SCHEMA.malignant_label {
            "Malignant (Cancerous)"
        } else {
            "Benign (Non-Cancerous)"
        };
        Ok(ClumpVerdict { result })
    }

    pub fn predict_wdbc(&self, features: &[Float]) -> Result<WdbcVerdict, PredictError> {
        let raw = single_row(features);
        let x = match &self.scaler {
            Some(scaler) => scaler.transform(&raw)?,
            None => raw,
        };
        ensure_finite(&x)?;

        let label = self.model.predict(&x)?[0];
        let probability = self.model.predict_proba(&x)?[0];
        if !(0.0..=1.0).contains(&probability) {
            return Err(PredictError::Inference(format!(
                "probability {probability} outside [0, 1]"
            )));
        }

        let result = if label == WDBC_SCHEMA.malignant_label {
            "Malignant"
        } else {
            "Benign"
        };
        Ok(WdbcVerdict {
            result,
            probability,
            confidence: Confidence::from_probability(probability),
        })
    }
}
