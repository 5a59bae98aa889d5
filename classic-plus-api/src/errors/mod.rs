//! Error types for the API service.
//!
//! [`ApiError`] is what handlers return; its `IntoResponse` impl renders the
//! JSON error body `{"error": CODE, "message": ..., "detail"?: ...}`.
//! [`StartupError`] covers everything that can stop the service from starting.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use classic_plus_repository::{PinsRepositoryError, SchemaError, SurveyRepositoryError};
use classic_plus_shared::ValidationError;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

use crate::identity::IdentityError;

/// Errors returned to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The identity provider failed or refused the request. `detail` carries
    /// the provider's own response body when there is one.
    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        detail: Option<Value>,
    },

    /// Already logged where it was raised; the client only sees a generic message.
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None),
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg,
                None,
            ),
            ApiError::Upstream { message, detail } => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", message, detail)
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
                None,
            ),
        };

        let mut body = json!({
            "error": code,
            "message": message,
        });
        if let Some(detail) = detail {
            body["detail"] = detail;
        }

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PinsRepositoryError> for ApiError {
    fn from(err: PinsRepositoryError) -> Self {
        match err {
            PinsRepositoryError::PinNotFound(pin_id) => {
                ApiError::NotFound(format!("Pin not found: {pin_id}"))
            }
            err if err.is_consistency_failure() => {
                error!(error = %err, "Vote ledger and pin counters are inconsistent");
                ApiError::Internal
            }
            err => {
                error!(error = %err, "Pins repository failure");
                ApiError::Internal
            }
        }
    }
}

impl From<SurveyRepositoryError> for ApiError {
    fn from(err: SurveyRepositoryError) -> Self {
        error!(error = %err, "Survey repository failure");
        ApiError::Internal
    }
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        error!(error = %err, "Schema operation failed");
        ApiError::Internal
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        let message = err.to_string();
        match err {
            IdentityError::Rejected { payload, .. } => ApiError::Upstream {
                message,
                detail: Some(payload),
            },
            IdentityError::Unreachable(_)
            | IdentityError::MissingAccessToken
            | IdentityError::MalformedResponse(_) => ApiError::Upstream {
                message,
                detail: None,
            },
        }
    }
}

/// Errors that can stop the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Schema error: {0}")]
    SchemaError(#[from] SchemaError),

    #[error("Server error: {0}")]
    ServerError(#[from] std::io::Error),
}

impl StartupError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ExchangeStage;
    use axum::body::to_bytes;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_is_bad_request() {
        let (status, body) = render(ValidationError::InvalidVoteDirection("sideways".into()).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BAD_REQUEST");
        assert_eq!(body["message"], "Invalid vote type: 'sideways'. Must be 'up' or 'down'.");
        assert!(body.get("detail").is_none());
    }

    #[tokio::test]
    async fn test_missing_pin_is_not_found() {
        let (status, body) = render(PinsRepositoryError::PinNotFound(7).into()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Pin not found: 7");
    }

    #[tokio::test]
    async fn test_consistency_failure_is_opaque() {
        let (status, body) = render(PinsRepositoryError::NegativeCounter(3).into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "INTERNAL_ERROR");
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_rejected_exchange_carries_provider_payload() {
        let err = IdentityError::Rejected {
            stage: ExchangeStage::Token,
            status: 400,
            payload: json!({"error": "invalid_grant"}),
        };
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "UPSTREAM_ERROR");
        assert_eq!(body["detail"], json!({"error": "invalid_grant"}));
    }

    #[tokio::test]
    async fn test_missing_access_token_is_upstream_error() {
        let (status, body) = render(IdentityError::MissingAccessToken.into()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.get("detail").is_none());
    }
}
