//! Authentication error types for the Warden library.
//!
//! Every way a presented credential can fail has its own variant, so callers can tell a
//! missing header from a malformed one and a forged token from an expired one.

use thiserror::Error as ThisError;

use crate::Error;

/// Errors that can occur while authenticating or authorizing a caller.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum AuthError {
    /// No `Authorization` header was presented.
    #[error("Missing token")]
    MissingToken,

    /// The `Authorization` header is not of the form `Bearer <token>`.
    #[error("Malformed authorization header: {reason}")]
    MalformedHeader {
        /// Description of what is wrong with the header
        reason: &'static str,
    },

    /// The token is not well formed or its signature does not match.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// The token is correctly signed but its expiry has passed.
    #[error("Token has expired")]
    Expired,

    /// The caller is authenticated but their role is not allowed to perform the operation.
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// Login failed: unknown identity or wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The signing secret cannot be used.
    #[error("Invalid signing secret: {reason}")]
    InvalidSecret {
        /// Description of why the secret was rejected
        reason: &'static str,
    },

    /// Signing a token failed.
    #[error("Token signing failed: {reason}")]
    SigningFailed {
        /// Description of the signing failure
        reason: String,
    },
}

impl AuthError {
    /// Check if this error means the caller could not be authenticated.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::MalformedHeader { .. }
                | AuthError::InvalidSignature
                | AuthError::Expired
                | AuthError::InvalidCredentials
        )
    }

    /// Check if this error indicates permission was denied.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, AuthError::InsufficientPermissions)
    }

    /// Check if this error indicates the token had expired.
    pub fn is_expired(&self) -> bool {
        matches!(self, AuthError::Expired)
    }

    /// Check if this error indicates invalid signature.
    pub fn is_invalid_signature(&self) -> bool {
        matches!(self, AuthError::InvalidSignature)
    }

    /// Stable machine-readable code for this error.
    ///
    /// The authority sends this code to remote services, which map it back with
    /// [`AuthError::from_code`].
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedHeader { .. } => "malformed_header",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "expired",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidSecret { .. } => "invalid_secret",
            AuthError::SigningFailed { .. } => "signing_failed",
        }
    }

    /// Map a code received from a remote authority back to a verification failure.
    ///
    /// `expired` and `missing_token` keep their meaning; every other rejection of a
    /// presented token is reported as an invalid signature.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("expired") => AuthError::Expired,
            Some("missing_token") => AuthError::MissingToken,
            _ => AuthError::InvalidSignature,
        }
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        Error::Auth(err)
    }
}
