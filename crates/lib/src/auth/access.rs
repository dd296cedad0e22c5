//! Access control around protected operations.
//!
//! An [`AccessGate`] runs one linear pass over an inbound credential and stops at the first
//! failing check:
//!
//! 1. the `Authorization` header must be present ([`AuthError::MissingToken`]),
//! 2. it must be exactly `Bearer <token>` ([`AuthError::MalformedHeader`]),
//! 3. the token must verify ([`AuthError::InvalidSignature`] / [`AuthError::Expired`]),
//! 4. the verified role must be in the required set ([`AuthError::InsufficientPermissions`]).
//!
//! Only then does the wrapped operation run, with the verified claims.

use std::future::Future;
use std::sync::Arc;

use axum::http::{HeaderMap, header::AUTHORIZATION};

use super::authority::TokenVerifier;
use super::claims::{Role, SessionClaims};
use super::errors::AuthError;

/// Authentication scheme accepted in the `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer";

/// Pull the token out of an `Authorization` header value.
///
/// An absent or blank header is [`AuthError::MissingToken`]. Anything present that is not
/// exactly two space-separated parts with the `Bearer` scheme is
/// [`AuthError::MalformedHeader`].
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = match header {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Err(AuthError::MissingToken),
    };

    let mut parts = header.split(' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next();

    if scheme != BEARER_SCHEME {
        return Err(AuthError::MalformedHeader {
            reason: "expected Bearer scheme",
        });
    }
    let token = match token {
        Some(token) if !token.is_empty() => token,
        _ => {
            return Err(AuthError::MalformedHeader {
                reason: "missing token",
            });
        }
    };
    if parts.next().is_some() {
        return Err(AuthError::MalformedHeader {
            reason: "unexpected trailing segments",
        });
    }

    Ok(token)
}

/// Read the `Authorization` header from a request's headers.
///
/// A header that is not valid visible ASCII counts as malformed, not missing.
pub fn authorization_header(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    headers
        .get(AUTHORIZATION)
        .map(|value| {
            value.to_str().map_err(|_| AuthError::MalformedHeader {
                reason: "header is not valid text",
            })
        })
        .transpose()
}

/// Roles allowed through a gate. Empty means any authenticated identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredRoles(Vec<Role>);

impl RequiredRoles {
    /// Any authenticated identity.
    pub fn any() -> Self {
        Self(Vec::new())
    }

    /// Only the listed roles.
    pub fn only(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut roles: Vec<Role> = roles.into_iter().collect();
        roles.dedup();
        Self(roles)
    }

    /// Only [`Role::Admin`].
    pub fn admin() -> Self {
        Self::only([Role::Admin])
    }

    pub fn admits(&self, role: Role) -> bool {
        self.0.is_empty() || self.0.contains(&role)
    }

    pub fn is_any(&self) -> bool {
        self.0.is_empty()
    }
}

/// Verifies a bearer credential and enforces a role requirement.
#[derive(Clone)]
pub struct AccessGate {
    verifier: Arc<dyn TokenVerifier>,
    required: RequiredRoles,
}

impl AccessGate {
    /// A gate that admits any identity `verifier` accepts.
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            verifier,
            required: RequiredRoles::any(),
        }
    }

    /// The same verifier, with a different role requirement.
    pub fn requiring(&self, required: RequiredRoles) -> Self {
        Self {
            verifier: self.verifier.clone(),
            required,
        }
    }

    pub fn required_roles(&self) -> &RequiredRoles {
        &self.required
    }

    /// Run the checks against a raw `Authorization` header value.
    pub async fn authorize(&self, authorization: Option<&str>) -> Result<SessionClaims, AuthError> {
        let token = extract_bearer(authorization)?;
        let claims = self.verifier.verify(token).await?;

        if !self.required.admits(claims.role) {
            tracing::info!(
                subject = %claims.subject,
                role = %claims.role,
                "Denied: role not permitted"
            );
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(claims)
    }

    /// Run the checks against request headers.
    pub async fn authorize_headers(&self, headers: &HeaderMap) -> Result<SessionClaims, AuthError> {
        let header = authorization_header(headers)?;
        self.authorize(header).await
    }

    /// Wrap `operation`: it runs only if the credential passes, and receives the claims.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use warden::auth::{AccessGate, RequiredRoles, Role, SigningSecret, TokenAuthority, TokenLifetime};
    /// # tokio_test_block(async {
    /// let secret = SigningSecret::new("secret")?;
    /// let authority = Arc::new(TokenAuthority::new(&secret, TokenLifetime::Session));
    /// let token = authority.issue("a@x.com", Role::Admin)?;
    ///
    /// let gate = AccessGate::new(authority).requiring(RequiredRoles::admin());
    /// let header = format!("Bearer {token}");
    /// let who = gate
    ///     .guard(Some(&header), |claims| async move { Ok(claims.subject) })
    ///     .await?;
    /// assert_eq!(who, "a@x.com");
    /// # Ok::<(), warden::Error>(())
    /// # });
    /// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
    /// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
    /// # }
    /// ```
    pub async fn guard<F, Fut, T>(&self, authorization: Option<&str>, operation: F) -> crate::Result<T>
    where
        F: FnOnce(SessionClaims) -> Fut,
        Fut: Future<Output = crate::Result<T>>,
    {
        let claims = self.authorize(authorization).await?;
        operation(claims).await
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}
