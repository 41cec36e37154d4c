//! Predictor service.
//!
//! Artifacts are deserialized once into an [`AppState`] and shared read-only
//! through an `Arc`; every request is a pure function of its form fields.
//!
//! Routes:
//! - `GET /` – HTML form for the configured variant
//! - `GET /health` – liveness probe
//! - `POST /predict` – form-encoded features → JSON verdict

mod error;
mod handlers;
mod page;
mod prediction;
mod state;

pub use error::PredictError;
pub use handlers::{health_handler, index_handler, predict_handler};
pub use page::render_index;
pub use prediction::{read_clump_features, validate_wdbc_features, ClumpVerdict, Confidence, WdbcVerdict};
pub use state::AppState;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tracing::info;

/// Build the axum [`Router`] with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .with_state(state)
}

/// Bind `listen_addr` and serve until the process is stopped.
pub async fn serve(state: Arc<AppState>, listen_addr: &str) -> anyhow::Result<()> {
    let variant = state.variant;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!(%listen_addr, %variant, "Predictor service listening");
    axum::serve(listener, app).await?;
    Ok(())
}
