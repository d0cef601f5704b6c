//! Axum HTTP layer.

pub mod models;
pub mod params;
pub mod predictions;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/models", get(models::select_model))
        .route("/models/", get(models::select_model))
        .route("/predictions", get(predictions::predict_defects))
        .route("/predictions/", get(predictions::predict_defects))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html("<h1>Welcome to our server !!</h1>")
}

/// GET /health - Liveness plus the languages that have a catalog.
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "languages": state.catalog.languages(),
    }))
}
