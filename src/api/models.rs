use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::path::PathBuf;

use crate::api::params::{self, QueryParams};
use crate::engine::{describe_models, select};
use crate::error::ServiceError;
use crate::models::SelectionResponse;
use crate::state::AppState;

/// GET /models/ - Pick the catalog project most similar to the caller's.
///
/// Returns its id, similarity and rule dumps, or with `return_model` set the
/// raw artifact file of one of its models (`defect_type`, or the last
/// category available).
pub async fn select_model(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ServiceError> {
    let language = params::language(&params)?;
    let query = params::project_metrics(&params);
    let return_model = params
        .get("return_model")
        .is_some_and(|v| params::is_truthy(v));

    let Some(selection) = select(&state.catalog, language, &query)? else {
        if return_model {
            return Err(ServiceError::NoModelAvailable(format!(
                "no {language} project is similar to the query"
            )));
        }
        return Ok(Json(SelectionResponse::default()).into_response());
    };

    if return_model {
        let defect_type = params::defect_type(&params)?;
        let path = selection
            .project
            .download_artifact(defect_type)
            .ok_or_else(|| {
                ServiceError::NoModelAvailable(format!(
                    "project {} has no {} model",
                    selection.project.id,
                    defect_type.map_or("trained", |t| t.as_str())
                ))
            })?
            .to_path_buf();
        return download(path).await;
    }

    let project = selection.project.clone();
    let loader = state.loader.clone();
    let max_depth = state.config.rules_max_depth;
    let models = tokio::task::spawn_blocking(move || describe_models(&project, loader.as_ref(), max_depth))
        .await
        .map_err(|e| ServiceError::Internal(format!("Model description task failed: {e}")))??;

    Ok(Json(SelectionResponse {
        model_id: Some(selection.project.id),
        similarity: Some(selection.similarity),
        models,
    })
    .into_response())
}

/// Send an artifact file as an attachment.
async fn download(path: PathBuf) -> Result<Response, ServiceError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ServiceError::Artifact {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());

    tracing::info!("Sending model artifact {} ({} bytes)", path.display(), bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
