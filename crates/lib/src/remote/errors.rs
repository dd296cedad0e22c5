//! Errors from calls to a remote authority.

use thiserror::Error;

use crate::Error;

/// Ways a validation call to the authority can fail.
///
/// None of these ever grant access; see [`super::RemoteTrustDelegate`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Invalid authority URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {reason}")]
    Client { reason: String },

    #[error("Authority at {url} did not answer in time")]
    Timeout { url: String },

    #[error("Failed to reach authority at {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Authority rejected token ({status}): {message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Malformed authority response: {reason}")]
    MalformedBody { reason: String },
}

impl RemoteError {
    /// The authority was never heard from (as opposed to answering "no").
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            RemoteError::Timeout { .. } | RemoteError::Transport { .. }
        )
    }

    /// The authority answered that the token is not valid.
    pub fn is_rejection(&self) -> bool {
        matches!(self, RemoteError::Rejected { status: 401, .. })
    }
}

impl From<RemoteError> for Error {
    fn from(err: RemoteError) -> Self {
        Error::Remote(err)
    }
}
