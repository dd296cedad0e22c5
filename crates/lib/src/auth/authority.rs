//! Token issuance and local verification.
//!
//! The [`TokenAuthority`] holds the signing secret. It issues HS256 JWTs carrying
//! [`SessionClaims`] and verifies presented tokens in two ordered steps: the MAC is checked
//! first and the expiry second, so a forged token is never reported as merely expired.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{Role, SessionClaims, TokenLifetime};
use super::errors::AuthError;
use super::secret::SigningSecret;
use crate::clock::{Clock, SystemClock};

/// Anything that can turn a presented bearer token into verified claims.
///
/// Implemented by [`TokenAuthority`] for local verification and by
/// [`crate::remote::RemoteTrustDelegate`] for services that ask the authority over HTTP.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token` and return its claims, or the reason it was rejected.
    async fn verify(&self, token: &str) -> Result<SessionClaims, AuthError>;
}

/// Issues and verifies signed session tokens.
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: TokenLifetime,
    clock: Arc<dyn Clock>,
}

impl TokenAuthority {
    /// Create an authority using the system clock.
    pub fn new(secret: &SigningSecret, lifetime: TokenLifetime) -> Self {
        Self::with_clock(secret, lifetime, Arc::new(SystemClock))
    }

    /// Create an authority reading time from `clock`.
    pub fn with_clock(
        secret: &SigningSecret,
        lifetime: TokenLifetime,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `verify` against the injected clock, after the signature.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
            clock,
        }
    }

    pub fn lifetime(&self) -> TokenLifetime {
        self.lifetime
    }

    /// Issue a token for `subject` holding `role`, valid for the configured lifetime.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, AuthError> {
        let issued_at = self.clock.now_secs();
        let claims = SessionClaims {
            subject: subject.to_string(),
            role,
            issued_at,
            expires_at: issued_at + self.lifetime.duration().as_secs() as i64,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(
            |e| AuthError::SigningFailed {
                reason: e.to_string(),
            },
        )
    }

    /// Verify a presented token.
    ///
    /// Returns [`AuthError::InvalidSignature`] for anything that is not a token signed with
    /// this authority's secret (including garbage input and unknown roles), and
    /// [`AuthError::Expired`] only for correctly signed tokens past their expiry.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let claims =
            jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
                .map_err(|e| {
                    tracing::debug!("Rejected token: {e}");
                    AuthError::InvalidSignature
                })?
                .claims;

        if claims.is_expired_at(self.clock.now_secs()) {
            tracing::debug!(subject = %claims.subject, "Rejected expired token");
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}

#[async_trait]
impl TokenVerifier for TokenAuthority {
    async fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        TokenAuthority::verify(self, token)
    }
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("lifetime", &self.lifetime)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
