//! The credential store.
//!
//! Identities live in memory behind a single lock. Every mutation holds the write lock for
//! the whole check-insert-persist sequence, so two concurrent registrations of the same
//! email cannot both succeed and a snapshot never misses a committed identity.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

use super::crypto::verify_password_async;
use super::errors::StoreError;
use super::persistence::{read_snapshot, save_snapshot};
use super::types::Identity;
use crate::auth::AuthError;

/// Identity records keyed by email.
#[derive(Debug)]
pub struct CredentialStore {
    identities: RwLock<BTreeMap<String, Identity>>,
    /// Snapshot file; `None` for an ephemeral store
    snapshot_path: Option<PathBuf>,
}

impl CredentialStore {
    /// An empty store that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            identities: RwLock::new(BTreeMap::new()),
            snapshot_path: None,
        }
    }

    /// Open a store backed by the snapshot at `path`.
    ///
    /// A missing snapshot starts an empty store. An unreadable or corrupt snapshot is logged
    /// and also starts an empty store; the bad file is overwritten on the next mutation.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let identities = match read_snapshot(&path).await {
            Ok(identities) => {
                tracing::info!(
                    "Loaded {} identities from {}",
                    identities.len(),
                    path.display()
                );
                identities
            }
            Err(e) => {
                tracing::error!(
                    "Failed to load identities from {}: {e}. Starting empty.",
                    path.display()
                );
                BTreeMap::new()
            }
        };

        Self {
            identities: RwLock::new(identities),
            snapshot_path: Some(path),
        }
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Insert a new identity and persist the store.
    ///
    /// Fails with [`StoreError::AlreadyExists`] if the email (exact, case-sensitive) is taken.
    /// If the snapshot cannot be written the insert is undone.
    pub async fn create(&self, identity: Identity) -> Result<(), StoreError> {
        let mut identities = self.identities.write().await;
        if identities.contains_key(&identity.email) {
            return Err(StoreError::AlreadyExists {
                email: identity.email,
            });
        }

        let email = identity.email.clone();
        identities.insert(email.clone(), identity);

        if let Err(e) = self.persist(&identities).await {
            identities.remove(&email);
            tracing::error!("Failed to persist identity {email}: {e}");
            return Err(e);
        }

        tracing::info!("Identity created: {email}");
        Ok(())
    }

    /// Look up an identity by email.
    pub async fn lookup(&self, email: &str) -> Option<Identity> {
        self.identities.read().await.get(email).cloned()
    }

    /// Check whether an email is registered.
    pub async fn contains(&self, email: &str) -> bool {
        self.identities.read().await.contains_key(email)
    }

    /// All identities, ordered by email.
    ///
    /// The records include the verifier; use [`Identity::summary`] or
    /// [`Identity::profile`] for anything leaving the process.
    pub async fn list_all(&self) -> Vec<Identity> {
        self.identities.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.identities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.identities.read().await.is_empty()
    }

    /// Check a login attempt.
    ///
    /// Unknown email and wrong password give the same [`AuthError::InvalidCredentials`].
    /// Argon2 verification runs on the blocking pool.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        if let Some(identity) = self.lookup(email).await {
            let matched =
                verify_password_async(password.to_string(), identity.password_hash.clone()).await;
            if matched {
                return Ok(identity);
            }
        }
        tracing::info!("Failed login for {email}");
        Err(AuthError::InvalidCredentials)
    }

    /// Write the current state to the snapshot.
    pub async fn save(&self) -> Result<(), StoreError> {
        let identities = self.identities.write().await;
        self.persist(&identities).await
    }

    async fn persist(&self, identities: &BTreeMap<String, Identity>) -> Result<(), StoreError> {
        match &self.snapshot_path {
            Some(path) => {
                save_snapshot(path, identities).await?;
                tracing::debug!("Saved {} identities to {}", identities.len(), path.display());
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
