use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::ApiError;
use crate::session::SessionError;

/// Host-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Session(SessionError::Validation(e)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                e.reason().to_string(),
            ),
            AppError::Session(e @ SessionError::Busy(_)) => {
                (StatusCode::CONFLICT, "BUSY", e.to_string())
            }
            AppError::Session(e @ SessionError::InvalidTransition { .. }) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", e.to_string())
            }
            AppError::Session(e @ SessionError::AttemptActive) => {
                (StatusCode::CONFLICT, "ATTEMPT_ACTIVE", e.to_string())
            }
            AppError::Session(e @ SessionError::Superseded(_)) => {
                (StatusCode::CONFLICT, "SUPERSEDED", e.to_string())
            }
            AppError::Session(SessionError::Api(e)) => {
                match e {
                    ApiError::Api { .. } => {
                        tracing::warn!(upstream_status = ?e.status(), "Upstream error: {e}")
                    }
                    other => tracing::error!("Upstream failure: {other}"),
                }
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string())
            }
            AppError::Session(SessionError::Export(e)) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_ERROR",
                    "Failed to generate the report. Please try again.".to_string(),
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
