//! HTTP error responses.
//!
//! Every library error maps to exactly one status code. Internal failures are logged with
//! their detail and answered with an opaque message.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::types::ErrorBody;
use crate::Error;
use crate::auth::AuthError;
use crate::catalog::CatalogError;
use crate::identity::StoreError;

/// Message sent for any failure whose detail must stay server-side.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Structured API error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                message: message.into(),
                code: Some(code.to_string()),
            },
        }
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_failure",
            INTERNAL_MESSAGE,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Auth(e) => e.into(),
            Error::Store(e) => e.into(),
            Error::Catalog(e) => e.into(),
            other => {
                tracing::error!(module = other.module(), "Request failed: {other}");
                ApiError::internal()
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = if err.is_unauthenticated() {
            StatusCode::UNAUTHORIZED
        } else if err.is_permission_denied() {
            StatusCode::FORBIDDEN
        } else {
            tracing::error!("Auth failure: {err}");
            return ApiError::internal();
        };
        ApiError::new(status, err.code(), err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let (status, code) = match &err {
            StoreError::AlreadyExists { .. } => (StatusCode::CONFLICT, "already_exists"),
            StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            StoreError::InvalidRole { .. } => (StatusCode::BAD_REQUEST, "invalid_role"),
            StoreError::MissingFields { .. } => (StatusCode::BAD_REQUEST, "missing_fields"),
            _ => {
                tracing::error!("Credential store failure: {err}");
                return ApiError::internal();
            }
        };
        ApiError::new(status, code, err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let (status, code) = match &err {
            CatalogError::AlreadyExists { .. } => (StatusCode::CONFLICT, "already_exists"),
            CatalogError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            CatalogError::InvalidPrice { .. } => (StatusCode::BAD_REQUEST, "invalid_price"),
            CatalogError::MissingId => (StatusCode::BAD_REQUEST, "missing_id"),
        };
        ApiError::new(status, code, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) if message.contains("missing field") => {
                ApiError::new(StatusCode::BAD_REQUEST, "missing_fields", message)
            }
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                ApiError::new(StatusCode::BAD_REQUEST, "invalid_body", message)
            }
            JsonRejection::MissingJsonContentType(_) => ApiError::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                message,
            ),
            other => ApiError::new(other.status(), "invalid_body", message),
        }
    }
}
