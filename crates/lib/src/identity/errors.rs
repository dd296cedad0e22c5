//! Error types for the credential store

use thiserror::Error;

use crate::Error;
use crate::auth::UnknownRole;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("User already exists: {email}")]
    AlreadyExists { email: String },

    #[error("User not found: {email}")]
    NotFound { email: String },

    #[error("Invalid role '{value}'. Must be one of: Admin, User")]
    InvalidRole { value: String },

    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },

    #[error("Password hashing failed: {reason}")]
    PasswordHashing { reason: String },

    #[error("Snapshot I/O failed: {source}")]
    FileIo {
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot serialization failed: {source}")]
    SerializationFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Snapshot deserialization failed: {source}")]
    DeserializationFailed {
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Check if this error indicates the identity key is taken.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }

    /// Check if this error was caused by the caller's input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidRole { .. } | StoreError::MissingFields { .. }
        )
    }

    /// Check if this error came from reading or writing the snapshot.
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            StoreError::FileIo { .. }
                | StoreError::SerializationFailed { .. }
                | StoreError::DeserializationFailed { .. }
        )
    }
}

impl From<UnknownRole> for StoreError {
    fn from(err: UnknownRole) -> Self {
        StoreError::InvalidRole { value: err.value }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Store(err)
    }
}
