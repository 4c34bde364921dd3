//! Error types for the pet store server
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::FieldError;

// == App Error Enum ==
/// Unified error type for the pet store server.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested entity is absent
    #[error("{0}")]
    NotFound(String),

    /// Payload failed structural validation
    #[error("Validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Request was well-formed but rejected (duplicate email, bad credentials)
    #[error("{0}")]
    BadRequest(String),

    /// No bearer token was presented
    #[error("{0}")]
    Unauthorized(String),

    /// Token invalid or role insufficient
    #[error("{0}")]
    Forbidden(String),

    /// Client exceeded its request budget
    #[error("{0}")]
    TooManyRequests(String),

    /// Cache collaborator failed
    #[error("Cache error: {0}")]
    Cache(String),

    /// Persistence collaborator failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Cache(_) | AppError::Persistence(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, "request failed on a collaborator");
        }

        let body = match self {
            AppError::Validation(errors) => json!({ "errors": errors }),
            AppError::Cache(_) | AppError::Persistence(_) | AppError::Internal(_) => {
                json!({ "message": "Server error" })
            }
            other => json!({ "message": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(vec![FieldError::new("query", rejection.body_text())])
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("Serialization failed: {}", err))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the pet store server.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let (status, body) = body_json(AppError::NotFound("Pet not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Pet not found");
    }

    #[tokio::test]
    async fn test_collaborator_failures_hide_details() {
        let (status, body) = body_json(AppError::Cache("connection refused".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Server error");

        let (status, _) = body_json(AppError::Persistence("gone".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_validation_lists_field_errors() {
        let err = AppError::Validation(vec![FieldError::new("age", "too old")]);
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "age");
        assert_eq!(body["errors"][0]["message"], "too old");
    }

    #[test]
    fn test_auth_statuses() {
        assert_eq!(
            AppError::Unauthorized("Token missing".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("Invalid token".into()).status(),
            StatusCode::FORBIDDEN
        );
    }
}
