//!
//! Warden: token issuance and delegated access control for cooperating services.
//!
//! ## Core Concepts
//!
//! * **Credential Store (`identity::CredentialStore`)**: identities keyed by email, each with a
//!   display name, a closed [`auth::Role`] and an Argon2id password verifier. Persisted as a
//!   JSON snapshot that is rewritten on every mutation.
//! * **Token Authority (`auth::TokenAuthority`)**: issues HS256-signed session tokens and
//!   verifies them, checking the signature before the expiry.
//! * **Access Control (`auth::AccessGate`)**: extracts a bearer token, verifies it through a
//!   [`auth::TokenVerifier`] and enforces a required role set before running an operation.
//! * **Remote Trust Delegate (`remote::RemoteTrustDelegate`)**: verifies tokens by asking the
//!   authority over HTTP. Every failure is treated as "not authorized".
//! * **Destination Catalog (`catalog::DestinationCatalog`)**: the resource collection whose
//!   mutations are gated on the `Admin` role.
//! * **Services (`service`)**: axum routers for the authority and the destination service.

pub mod auth;
pub mod catalog;
pub mod clock;
pub mod identity;
pub mod remote;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};

/// Result type used throughout the Warden library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Warden library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structured authentication errors from the auth module
    #[error(transparent)]
    Auth(auth::AuthError),

    /// Structured credential store errors from the identity module
    #[error(transparent)]
    Store(identity::StoreError),

    /// Structured catalog errors from the catalog module
    #[error(transparent)]
    Catalog(catalog::CatalogError),

    /// Structured errors from calls to a remote authority
    #[error(transparent)]
    Remote(remote::RemoteError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Auth(_) => "auth",
            Error::Store(_) => "identity",
            Error::Catalog(_) => "catalog",
            Error::Remote(_) => "remote",
            Error::Io(_) => "io",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_not_found(),
            Error::Catalog(catalog_err) => catalog_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (already exists).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_already_exists(),
            Error::Catalog(catalog_err) => catalog_err.is_already_exists(),
            _ => false,
        }
    }

    /// Check if the caller could not be authenticated.
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            Error::Auth(auth_err) => auth_err.is_unauthenticated(),
            _ => false,
        }
    }

    /// Check if this error indicates permission was denied.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Error::Auth(auth_err) => auth_err.is_permission_denied(),
            _ => false,
        }
    }

    /// Check if this error is a malformed client request.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_invalid_input(),
            Error::Catalog(catalog_err) => catalog_err.is_invalid_input(),
            _ => false,
        }
    }

    /// Check if this error is an internal failure that must not leak detail to callers.
    pub fn is_internal(&self) -> bool {
        !(self.is_not_found()
            || self.is_conflict()
            || self.is_unauthenticated()
            || self.is_permission_denied()
            || self.is_invalid_input())
    }
}
