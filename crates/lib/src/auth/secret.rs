//! The process-wide token signing secret.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::errors::AuthError;

/// Symmetric secret used to sign and verify session tokens.
///
/// Configured once at startup and never mutated. The bytes are wiped when the value is
/// dropped and never appear in `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wrap raw secret bytes. An empty secret is rejected.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, AuthError> {
        let bytes = secret.into();
        if bytes.is_empty() {
            return Err(AuthError::InvalidSecret {
                reason: "secret must not be empty",
            });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(***)")
    }
}
