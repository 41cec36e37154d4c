use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::debug;

use super::error::PredictError;
use super::page::render_index;
use super::prediction::{read_clump_features, validate_wdbc_features};
use super::state::AppState;
use crate::datasets::Variant;

/// `GET /` – static input form.
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_index(state.variant))
}

/// `GET /health`
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "variant": state.variant,
        "n_features": state.schema().len(),
    }))
}

/// `POST /predict` – form-encoded feature values in, JSON verdict out.
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, PredictError> {
    match state.variant {
        Variant::Clump => {
            let features = read_clump_features(&form)?;
            let verdict = state.predict_clump(&features)?;
            debug!(result = verdict.result, "Prediction served");
            Ok(Json(verdict).into_response())
        }
        Variant::Wdbc => {
            let features = validate_wdbc_features(&form)?;
            let verdict = state.predict_wdbc(&features)?;
            debug!(
                result = verdict.result,
                probability = verdict.probability,
                "Prediction served"
            );
            Ok(Json(verdict).into_response())
        }
    }
}
