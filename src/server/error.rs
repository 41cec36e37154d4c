use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use biopsy_core::BiopsyError;
use serde_json::json;
use tracing::{error, warn};

/// Failures surfaced by `POST /predict`.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictError {
    /// Required fields absent or empty, in schema order (400).
    MissingFields(Vec<String>),
    /// First field whose value is not a finite number (400).
    InvalidField(String),
    /// Unvalidated form conversion failure (500).
    Conversion(String),
    /// Scaling or model evaluation failure (500).
    Inference(String),
}

impl PredictError {
    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::MissingFields(_) | PredictError::InvalidField(_) => StatusCode::BAD_REQUEST,
            PredictError::Conversion(_) | PredictError::Inference(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<BiopsyError> for PredictError {
    fn from(err: BiopsyError) -> Self {
        PredictError::Inference(err.to_string())
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            PredictError::MissingFields(fields) => {
                warn!(missing = ?fields, "Rejected prediction request");
                json!({
                    "error": "Missing required fields",
                    "missing_fields": fields,
                })
            }
            PredictError::InvalidField(field) => {
                warn!(field = %field, "Rejected prediction request");
                json!({
                    "error": format!("Invalid value for field {field}"),
                    "invalid_field": field,
                })
            }
            PredictError::Conversion(msg) | PredictError::Inference(msg) => {
                error!(error = %msg, "Prediction failed");
                json!({ "error": msg })
            }
        };
        (status, Json(body)).into_response()
    }
}
