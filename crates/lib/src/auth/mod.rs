//! Authentication and authorization for Warden
//!
//! This module issues and verifies session tokens and gates protected operations on the
//! verified role.

pub mod access;
pub mod authority;
pub mod claims;
pub mod errors;
pub mod secret;

// Re-export main types for easier access
pub use access::{AccessGate, BEARER_SCHEME, RequiredRoles, extract_bearer};
pub use authority::{TokenAuthority, TokenVerifier};
pub use claims::{Role, SessionClaims, TokenLifetime, UnknownRole};
pub use errors::AuthError;
pub use secret::SigningSecret;
