//! Roles and session claims carried inside signed tokens.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of roles an identity can hold.
///
/// Serialized exactly as `"Admin"` / `"User"`; any other string is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Role; 2] = [Role::Admin, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role string that is not one of [`Role::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid role '{value}'. Must be one of: Admin, User")]
pub struct UnknownRole {
    pub value: String,
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "User" => Ok(Role::User),
            other => Err(UnknownRole {
                value: other.to_string(),
            }),
        }
    }
}

/// The decoded payload of a session token.
///
/// Field names on the wire are the registered JWT claim names. Timestamps are seconds
/// since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Identity key (email) of the token holder
    #[serde(rename = "sub")]
    pub subject: String,
    pub role: Role,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl SessionClaims {
    /// A claim is live strictly before its expiry second.
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        self.expires_at <= now_secs
    }
}

/// Validity window applied to issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenLifetime {
    /// 24 hours, used by the user-facing authority.
    #[default]
    Session,
    /// 1 hour, for short-lived service tokens.
    Short,
}

impl TokenLifetime {
    pub fn duration(&self) -> Duration {
        match self {
            TokenLifetime::Session => Duration::from_secs(24 * 60 * 60),
            TokenLifetime::Short => Duration::from_secs(60 * 60),
        }
    }
}
