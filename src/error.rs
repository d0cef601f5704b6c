//! Error taxonomy shared by the selector, the predictor and the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::Language;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Language argument missing or not a supported ecosystem tag.
    #[error("Set a valid language. Got '{0}'")]
    InvalidLanguage(String),

    /// `defect_type` given but not a known category.
    #[error("Set a valid defect type. Got '{0}'")]
    InvalidDefectType(String),

    /// Language is known but no catalog is loaded for it.
    #[error("Language not supported: {0}")]
    UnsupportedOperation(Language),

    #[error("Model not found. No {language} model with id {id}")]
    ModelNotFound { language: Language, id: i64 },

    /// Nothing can be downloaded for the request.
    #[error("No model available: {0}")]
    NoModelAvailable(String),

    #[error("Failed to load model artifact {path}: {message}")]
    Artifact { path: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidLanguage(_) | ServiceError::InvalidDefectType(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::UnsupportedOperation(_) => StatusCode::NOT_IMPLEMENTED,
            ServiceError::ModelNotFound { .. } | ServiceError::NoModelAvailable(_) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Artifact { .. } | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::debug!("Rejected request: {self}");
        }
        (status, Json(json!({ "ERROR": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_kind_has_a_distinct_status() {
        assert_eq!(
            ServiceError::InvalidLanguage("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InvalidDefectType("servce".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::UnsupportedOperation(Language::Tosca).status(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            ServiceError::ModelNotFound {
                language: Language::Ansible,
                id: 999
            }
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_keep_reference_wording() {
        let err = ServiceError::ModelNotFound {
            language: Language::Ansible,
            id: 999,
        };
        assert!(err.to_string().starts_with("Model not found."));
        assert!(err.to_string().contains("999"));
        assert!(ServiceError::InvalidLanguage("".into())
            .to_string()
            .starts_with("Set a valid language."));
    }
}
