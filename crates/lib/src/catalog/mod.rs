//! Destination catalog
//!
//! The resource collection served by the destination service. Reads are public; inserts,
//! replacements and deletions are gated on [`crate::auth::Role::Admin`] by the service layer.

pub mod errors;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

pub use errors::CatalogError;

/// A bookable destination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// Taken from the path on replacement, so it may be omitted from a body.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub price_per_night: f64,
}

impl Destination {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        price_per_night: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            location: location.into(),
            price_per_night,
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.id.is_empty() {
            return Err(CatalogError::MissingId);
        }
        if !self.price_per_night.is_finite() || self.price_per_night < 0.0 {
            return Err(CatalogError::InvalidPrice {
                price: self.price_per_night,
            });
        }
        Ok(())
    }
}

/// Destinations keyed by id.
#[derive(Debug, Default)]
pub struct DestinationCatalog {
    destinations: RwLock<BTreeMap<String, Destination>>,
}

impl DestinationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the two stock destinations.
    pub fn seeded() -> Self {
        let destinations = [
            Destination::new(
                "1",
                "Maldives Resort",
                "Luxurious tropical paradise",
                "Maldives",
                500.0,
            ),
            Destination::new(
                "2",
                "Tokyo City Hotel",
                "Modern urban experience",
                "Japan",
                250.0,
            ),
        ];
        Self {
            destinations: RwLock::new(
                destinations
                    .into_iter()
                    .map(|d| (d.id.clone(), d))
                    .collect(),
            ),
        }
    }

    /// All destinations, ordered by id.
    pub async fn get_all(&self) -> Vec<Destination> {
        self.destinations.read().await.values().cloned().collect()
    }

    pub async fn get(&self, id: &str) -> Option<Destination> {
        self.destinations.read().await.get(id).cloned()
    }

    /// Add a destination whose id is not yet used.
    pub async fn insert(&self, destination: Destination) -> Result<(), CatalogError> {
        destination.validate()?;
        let mut destinations = self.destinations.write().await;
        if destinations.contains_key(&destination.id) {
            return Err(CatalogError::AlreadyExists { id: destination.id });
        }
        tracing::info!("Destination created: {}", destination.id);
        destinations.insert(destination.id.clone(), destination);
        Ok(())
    }

    /// Replace (or create) the destination with this id. Returns the previous record.
    pub async fn upsert(&self, destination: Destination) -> Result<Option<Destination>, CatalogError> {
        destination.validate()?;
        let mut destinations = self.destinations.write().await;
        tracing::info!("Destination replaced: {}", destination.id);
        Ok(destinations.insert(destination.id.clone(), destination))
    }

    /// Remove a destination, returning it if it existed.
    pub async fn delete(&self, id: &str) -> Option<Destination> {
        let removed = self.destinations.write().await.remove(id);
        if removed.is_some() {
            tracing::info!("Destination deleted: {id}");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.destinations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.destinations.read().await.is_empty()
    }
}
