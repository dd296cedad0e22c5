//! Snapshot persistence for the credential store
//!
//! The whole identity map is serialized to one JSON file on every mutation. Writes go to a
//! sibling temporary file that is then renamed over the snapshot, so a crash mid-write
//! leaves the previous snapshot intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use super::errors::StoreError;
use super::types::Identity;
use crate::auth::Role;

/// The current snapshot file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const SNAPSHOT_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the snapshot version during deserialization.
fn validate_snapshot_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != SNAPSHOT_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported snapshot version {version}; only version {SNAPSHOT_VERSION} is supported"
        )));
    }
    Ok(version)
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    /// File format version for compatibility checking
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_snapshot_version"
    )]
    version: u8,
    identities: BTreeMap<String, StoredIdentity>,
}

#[derive(Serialize, Deserialize)]
struct StoredIdentity {
    name: String,
    role: Role,
    password_hash: String,
}

impl Snapshot {
    fn from_identities(identities: &BTreeMap<String, Identity>) -> Self {
        let identities = identities
            .iter()
            .map(|(email, identity)| {
                (
                    email.clone(),
                    StoredIdentity {
                        name: identity.name.clone(),
                        role: identity.role,
                        password_hash: identity.password_hash.clone(),
                    },
                )
            })
            .collect();
        Self {
            version: SNAPSHOT_VERSION,
            identities,
        }
    }

    fn into_identities(self) -> BTreeMap<String, Identity> {
        self.identities
            .into_iter()
            .map(|(email, stored)| {
                let identity = Identity {
                    email: email.clone(),
                    name: stored.name,
                    role: stored.role,
                    password_hash: stored.password_hash,
                };
                (email, identity)
            })
            .collect()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes the full identity map to `path`, replacing any previous snapshot.
pub(crate) async fn save_snapshot(
    path: &Path,
    identities: &BTreeMap<String, Identity>,
) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(&Snapshot::from_identities(identities))
        .map_err(|source| StoreError::SerializationFailed { source })?;

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, json)
        .await
        .map_err(|source| StoreError::FileIo { source })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|source| StoreError::FileIo { source })
}

/// Reads a snapshot from `path`.
///
/// A missing file is an empty store. Read and parse failures are returned so the caller
/// can decide how to degrade.
pub(crate) async fn read_snapshot(path: &Path) -> Result<BTreeMap<String, Identity>, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(json) => {
            let snapshot: Snapshot = serde_json::from_str(&json)
                .map_err(|source| StoreError::DeserializationFailed { source })?;
            Ok(snapshot.into_identities())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(source) => Err(StoreError::FileIo { source }),
    }
}
