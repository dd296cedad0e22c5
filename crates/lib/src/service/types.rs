//! JSON bodies exchanged by the services and the remote trust delegate.

use serde::{Deserialize, Serialize};

use crate::auth::{Role, SessionClaims};

/// Body of every error response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    /// Stable snake_case error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Plain acknowledgement body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Successful login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

/// The authority's answer for a valid token on `GET /auth/validate`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub email: String,
    pub role: Role,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<SessionClaims> for ValidationResponse {
    fn from(claims: SessionClaims) -> Self {
        Self {
            email: claims.subject,
            role: claims.role,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
        }
    }
}

impl From<ValidationResponse> for SessionClaims {
    fn from(response: ValidationResponse) -> Self {
        Self {
            subject: response.email,
            role: response.role,
            issued_at: response.issued_at,
            expires_at: response.expires_at,
        }
    }
}

/// Body of `POST /auth/validate-token`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TokenCheck {
    pub token: Option<String>,
}

/// Body of `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub time: String,
}
