//! Credential store for Warden
//!
//! Holds identities (email, display name, role, password verifier), verifies passwords with
//! Argon2id and persists the whole store as a JSON snapshot.

pub mod crypto;
pub mod errors;
mod persistence;
pub mod store;
pub mod types;

pub use errors::StoreError;
pub use store::CredentialStore;
pub use types::{Credentials, Identity, IdentityProfile, IdentitySummary, Registration};
