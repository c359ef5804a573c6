use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::editor::EditError;
use crate::export::ExportError;
use crate::session::SessionError;
use crate::store_client::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => AppError::NotFound(format!("Resume {id} not found")),
            other => AppError::Store(other),
        }
    }
}

impl From<EditError> for AppError {
    fn from(e: EditError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Edit(e) => e.into(),
            SessionError::Store(e) => e.into(),
            e @ (SessionError::Unconfirmed(_) | SessionError::BlankTemplate) => {
                AppError::Validation(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "STORE_ERROR",
                    "The resume store could not complete the request".to_string(),
                )
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_ERROR",
                    "The export could not be completed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Section;

    #[test]
    fn test_store_not_found_maps_to_404() {
        let err: AppError = StoreError::NotFound("abc".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_failure_maps_to_bad_gateway() {
        let err: AppError = StoreError::Api {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_edit_and_confirmation_errors_are_validation() {
        let edit: AppError = SessionError::Edit(EditError::IndexOutOfRange {
            section: Section::Skills,
            index: 2,
            len: 0,
        })
        .into();
        assert!(matches!(edit, AppError::Validation(_)));

        let unconfirmed: AppError = SessionError::Unconfirmed("abc".into()).into();
        assert_eq!(unconfirmed.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_export_failure_maps_to_500() {
        let err: AppError = ExportError::Raster("no canvas".into()).into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
