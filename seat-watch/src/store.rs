//! Watch record storage.
//!
//! Records are kept in their encoded form and decoded by the scanner, so a
//! corrupt record only affects itself. Each record expires when the watched
//! train departs.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::Watch;

/// Key prefix for watch records.
const KEY_PREFIX: &str = "watchdog:";

/// Error from the watch store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached
    #[error("watch store unavailable: {0}")]
    Unavailable(String),

    /// The expiry is already in the past
    #[error("watch would expire immediately (at {0})")]
    AlreadyExpired(DateTime<Utc>),
}

/// Key of a stored watch record (`watchdog:{uuid}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchKey(String);

impl WatchKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        WatchKey(format!("{KEY_PREFIX}{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage of watch records with expiry.
pub trait WatchStore: Send + Sync {
    /// Store a watch until `expires_at`.
    fn insert(
        &self,
        watch: &Watch,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<WatchKey, StoreError>> + Send;

    /// All records that have not expired, as stored.
    fn active(&self) -> impl Future<Output = Result<Vec<(WatchKey, String)>, StoreError>> + Send;
}

#[derive(Debug, Clone)]
struct StoredWatch {
    key: WatchKey,
    raw: String,
    expires_at: DateTime<Utc>,
}

/// In-process watch store.
///
/// Records are returned in insertion order. Expired records are purged
/// whenever the active set is read.
#[derive(Debug, Clone, Default)]
pub struct MemoryWatchStore {
    records: Arc<RwLock<Vec<StoredWatch>>>,
}

impl MemoryWatchStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an already-encoded record.
    pub async fn insert_raw(
        &self,
        raw: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Result<WatchKey, StoreError> {
        if expires_at <= Utc::now() {
            return Err(StoreError::AlreadyExpired(expires_at));
        }

        let key = WatchKey::generate();
        self.records.write().await.push(StoredWatch {
            key: key.clone(),
            raw: raw.into(),
            expires_at,
        });

        Ok(key)
    }

    /// Records active at `now`, purging the rest.
    pub async fn active_at(&self, now: DateTime<Utc>) -> Vec<(WatchKey, String)> {
        let mut records = self.records.write().await;

        let before = records.len();
        records.retain(|r| r.expires_at > now);
        let purged = before - records.len();
        if purged > 0 {
            debug!(purged, "purged expired watches");
        }

        records
            .iter()
            .map(|r| (r.key.clone(), r.raw.clone()))
            .collect()
    }

    /// Number of stored records, expired or not.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl WatchStore for MemoryWatchStore {
    async fn insert(&self, watch: &Watch, expires_at: DateTime<Utc>) -> Result<WatchKey, StoreError> {
        self.insert_raw(watch.encode(), expires_at).await
    }

    async fn active(&self) -> Result<Vec<(WatchKey, String)>, StoreError> {
        Ok(self.active_at(Utc::now()).await)
    }
}
