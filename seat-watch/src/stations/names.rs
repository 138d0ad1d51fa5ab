//! Station name lookup.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::StationId;

use super::client::StationClient;
use super::error::StationError;

/// Thread-safe station name lookup.
///
/// Readers take a [`snapshot`](Self::snapshot) of the whole map, so a
/// refresh never changes names in the middle of rendering.
#[derive(Clone)]
pub struct StationNames {
    inner: Arc<RwLock<Arc<HashMap<StationId, String>>>>,
    client: StationClient,
}

impl StationNames {
    /// Create a new StationNames by fetching from the API.
    ///
    /// This will fail if the API is unreachable.
    pub async fn fetch(client: StationClient) -> Result<Self, StationError> {
        let map = client.fetch_all().await?;
        Ok(Self::from_map(client, map))
    }

    /// Create a lookup from a known map.
    pub fn from_map(client: StationClient, map: HashMap<StationId, String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(map))),
            client,
        }
    }

    /// The current mapping.
    pub async fn snapshot(&self) -> Arc<HashMap<StationId, String>> {
        Arc::clone(&*self.inner.read().await)
    }

    /// Look up a station name.
    pub async fn get(&self, station: StationId) -> Option<String> {
        self.inner.read().await.get(&station).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Refresh the station data from the API.
    ///
    /// On success, replaces the current mapping. On failure, the existing
    /// mapping is preserved and the error is returned.
    pub async fn refresh(&self) -> Result<usize, StationError> {
        let map = self.client.fetch_all().await?;
        let count = map.len();

        *self.inner.write().await = Arc::new(map);

        Ok(count)
    }
}
