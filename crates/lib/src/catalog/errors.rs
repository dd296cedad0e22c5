//! Error types for the destination catalog

use thiserror::Error;

use crate::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Destination already exists: {id}")]
    AlreadyExists { id: String },

    #[error("Destination not found: {id}")]
    NotFound { id: String },

    #[error("Invalid price per night: {price}")]
    InvalidPrice { price: f64 },

    #[error("Destination id must not be empty")]
    MissingId,
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, CatalogError::AlreadyExists { .. })
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CatalogError::InvalidPrice { .. } | CatalogError::MissingId
        )
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        Error::Catalog(err)
    }
}
