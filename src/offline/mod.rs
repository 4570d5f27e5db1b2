// Offline message delivery contract
//
// Storage backends live outside this crate. Callers store the ciphertext,
// then publish the returned pointer into the discovery layer under the
// recipient's id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Where a stored ciphertext can be fetched from (e.g. a multiaddr)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationDescriptor(String);

impl LocationDescriptor {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persists already-encrypted messages somewhere the recipient can reach
#[async_trait]
pub trait OfflineMessageStorage: Send + Sync {
    async fn store(&self, peer_id: &str, ciphertext: &[u8]) -> AppResult<LocationDescriptor>;
}

/// Record the caller publishes so the recipient can find its message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePointer {
    /// Recipient peer id the pointer is keyed by
    pub key: String,
    pub location: LocationDescriptor,
    pub timestamp: DateTime<Utc>,
}

/// Store a ciphertext for an offline peer and build its pointer
pub async fn prepare_offline_delivery(
    storage: &dyn OfflineMessageStorage,
    peer_id: &str,
    ciphertext: &[u8],
    now: DateTime<Utc>,
) -> AppResult<MessagePointer> {
    if peer_id.trim().is_empty() {
        return Err(AppError::OfflineStorage("recipient peer id is empty".to_string()));
    }
    if ciphertext.is_empty() {
        return Err(AppError::OfflineStorage("refusing to store empty message".to_string()));
    }

    let location = storage.store(peer_id, ciphertext).await?;
    debug!("Stored {} byte message for {} at {}", ciphertext.len(), peer_id, location);

    Ok(MessagePointer {
        key: peer_id.to_string(),
        location,
        timestamp: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingStorage {
        stored: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl OfflineMessageStorage for RecordingStorage {
        async fn store(&self, peer_id: &str, ciphertext: &[u8]) -> AppResult<LocationDescriptor> {
            let mut stored = self.stored.lock();
            stored.push((peer_id.to_string(), ciphertext.to_vec()));
            Ok(LocationDescriptor::new(format!("/ipfs/msg-{}", stored.len())))
        }
    }

    #[tokio::test]
    async fn test_pointer_is_keyed_by_recipient() {
        let storage = RecordingStorage::default();
        let now = Utc::now();

        let pointer = prepare_offline_delivery(&storage, "QmPeer", b"sealed", now)
            .await
            .unwrap();

        assert_eq!(pointer.key, "QmPeer");
        assert_eq!(pointer.location.as_str(), "/ipfs/msg-1");
        assert_eq!(pointer.timestamp, now);
        assert_eq!(storage.stored.lock()[0].1, b"sealed".to_vec());
    }

    #[tokio::test]
    async fn test_rejects_empty_input_without_storing() {
        let storage = RecordingStorage::default();

        assert!(prepare_offline_delivery(&storage, "", b"sealed", Utc::now()).await.is_err());
        assert!(prepare_offline_delivery(&storage, "QmPeer", b"", Utc::now()).await.is_err());
        assert!(storage.stored.lock().is_empty());
    }
}
