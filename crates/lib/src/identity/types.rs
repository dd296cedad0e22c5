//! Core data types for the credential store

use std::fmt;

use serde::{Deserialize, Serialize};

use super::crypto::{hash_password, hash_password_async, verify_password};
use super::errors::StoreError;
use crate::auth::Role;

/// An identity record.
///
/// The email is the identity key. The password is only ever held as an Argon2id hash,
/// and the hash never leaves the store through the projections below.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password_hash: String,
}

impl Identity {
    /// Build an identity, hashing `password`.
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        password: &str,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            email: email.into(),
            name: name.into(),
            role,
            password_hash: hash_password(password)?,
        })
    }

    /// Check a candidate password against the stored verifier.
    pub fn verify_password(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash)
    }

    /// Profile view without the verifier.
    pub fn profile(&self) -> IdentityProfile {
        IdentityProfile {
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }

    /// List view without the verifier; the email is the key it is listed under.
    pub fn summary(&self) -> IdentitySummary {
        IdentitySummary {
            name: self.name.clone(),
            role: self.role,
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Safe projection returned for the current identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Safe projection used in identity listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySummary {
    pub name: String,
    pub role: Role,
}

/// Registration request body: `{email, password, name, role}`.
///
/// Fields are optional here so that a missing field is reported as such instead of as a
/// generic body parse failure.
#[derive(Clone, Default, Deserialize)]
pub struct Registration {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

impl Registration {
    /// Validate the request and hash its password on the blocking pool.
    ///
    /// Missing or empty fields are reported together; the role must parse exactly.
    pub async fn into_identity(self) -> Result<Identity, StoreError> {
        let mut missing = Vec::new();
        let email = require(self.email, "email", &mut missing);
        let password = require(self.password, "password", &mut missing);
        let name = require(self.name, "name", &mut missing);
        let role = require(self.role, "role", &mut missing);
        if !missing.is_empty() {
            return Err(StoreError::MissingFields { fields: missing });
        }

        let role: Role = role.parse()?;
        Ok(Identity {
            email,
            name,
            role,
            password_hash: hash_password_async(password).await?,
        })
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Login request body: `{email, password}`.
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Split into `(email, password)`, reporting missing fields.
    pub fn into_parts(self) -> Result<(String, String), StoreError> {
        let mut missing = Vec::new();
        let email = require(self.email, "email", &mut missing);
        let password = require(self.password, "password", &mut missing);
        if !missing.is_empty() {
            return Err(StoreError::MissingFields { fields: missing });
        }
        Ok((email, password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn require(value: Option<String>, field: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => {
            missing.push(field);
            String::new()
        }
    }
}
