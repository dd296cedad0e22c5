//! Remote trust delegation.
//!
//! A resource service that does not hold the signing secret verifies tokens by forwarding
//! them to the authority's `GET /auth/validate` endpoint and trusting the role the
//! authority reports. The delegate fails closed: a timeout, a refused connection, an error
//! status or an unreadable body never results in access being granted.

pub mod errors;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use url::Url;

pub use errors::RemoteError;

use crate::auth::{AuthError, Role, SessionClaims, TokenVerifier};
use crate::service::types::{ErrorBody, ValidationResponse};

/// Path of the authority's token validation endpoint.
pub const VALIDATE_PATH: &str = "auth/validate";

/// Timeout applied to every validation call unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Verifies tokens by asking the authority.
#[derive(Clone, Debug)]
pub struct RemoteTrustDelegate {
    validate_url: Url,
    client: reqwest::Client,
}

impl RemoteTrustDelegate {
    /// Delegate to the authority at `authority_url` with the default timeout.
    pub fn new(authority_url: &str) -> Result<Self, RemoteError> {
        Self::with_timeout(authority_url, DEFAULT_TIMEOUT)
    }

    /// Delegate to the authority at `authority_url`; each call gives up after `timeout`.
    pub fn with_timeout(authority_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let base = format!("{}/", authority_url.trim_end_matches('/'));
        let validate_url = Url::parse(&base)
            .and_then(|base| base.join(VALIDATE_PATH))
            .map_err(|e| RemoteError::InvalidUrl {
                url: authority_url.to_string(),
                reason: e.to_string(),
            })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Client {
                reason: e.to_string(),
            })?;

        Ok(Self {
            validate_url,
            client,
        })
    }

    pub fn validate_url(&self) -> &Url {
        &self.validate_url
    }

    /// Ask the authority for the claims behind `token`.
    ///
    /// The token is forwarded unchanged as `Authorization: Bearer <token>`.
    pub async fn fetch_claims(&self, token: &str) -> Result<SessionClaims, RemoteError> {
        let url = self.validate_url.as_str();
        let response = self
            .client
            .get(self.validate_url.clone())
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    RemoteError::Transport {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.ok();
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                code: body.as_ref().and_then(|b| b.code.clone()),
                message: body
                    .map(|b| b.message)
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        let validated: ValidationResponse =
            response
                .json()
                .await
                .map_err(|e| RemoteError::MalformedBody {
                    reason: e.to_string(),
                })?;

        Ok(validated.into())
    }

    /// True only if the authority confirms `token` belongs to an [`Role::Admin`].
    ///
    /// Every failure, including an unreachable authority, is "not admin".
    pub async fn validate_admin(&self, token: &str) -> bool {
        match self.fetch_claims(token).await {
            Ok(claims) => claims.role == Role::Admin,
            Err(e) => {
                tracing::warn!("Authority validation failed, treating as not admin: {e}");
                false
            }
        }
    }
}

#[async_trait]
impl TokenVerifier for RemoteTrustDelegate {
    /// A 401 from the authority keeps its meaning (expired vs invalid). Anything else that
    /// prevents establishing the caller's identity is reported as
    /// [`AuthError::InsufficientPermissions`].
    async fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        match self.fetch_claims(token).await {
            Ok(claims) => Ok(claims),
            Err(RemoteError::Rejected {
                status: 401, code, ..
            }) => Err(AuthError::from_code(code.as_deref())),
            Err(e) => {
                tracing::warn!("Authority validation failed, denying: {e}");
                Err(AuthError::InsufficientPermissions)
            }
        }
    }
}
