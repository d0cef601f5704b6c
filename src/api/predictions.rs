use axum::extract::{Query, State};
use axum::Json;

use crate::api::params::{self, QueryParams};
use crate::engine::predict;
use crate::error::ServiceError;
use crate::models::PredictionResponse;
use crate::state::AppState;

/// GET /predictions/ - Run every category model of `model_id` on the given
/// metrics. Every parameter other than `language` and `model_id` is a metric;
/// features a model needs but the caller omitted count as 0.
pub async fn predict_defects(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<PredictionResponse>, ServiceError> {
    let language = params::language(&params)?;
    let model_id = params::model_id(&params);
    let metrics = params::prediction_metrics(&params);

    let catalog = state.catalog.clone();
    let loader = state.loader.clone();
    let response = tokio::task::spawn_blocking(move || {
        predict(&catalog, loader.as_ref(), language, model_id, &metrics)
    })
    .await
    .map_err(|e| ServiceError::Internal(format!("Prediction task failed: {e}")))??;

    Ok(Json(response))
}
