//! Map synchronization snapshot.
//!
//! One process-wide snapshot: the admin pushes whole-object replacements,
//! guests poll. Reset on restart, no history.

use serde::Serialize;
use tokio::sync::RwLock;

/// The current map state plus the Unix-millisecond time it was pushed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MapSnapshot {
    pub data: Option<serde_json::Value>,
    pub timestamp: i64,
}

/// Single-writer snapshot store guarding the shared map state.
pub struct MapSyncStore {
    snapshot: RwLock<MapSnapshot>,
}

impl MapSyncStore {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(MapSnapshot::default()),
        }
    }

    /// Replace the snapshot wholesale and return the new timestamp.
    pub async fn replace(&self, data: serde_json::Value) -> i64 {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let mut guard = self.snapshot.write().await;
        *guard = MapSnapshot {
            data: Some(data),
            timestamp,
        };
        timestamp
    }

    pub async fn snapshot(&self) -> MapSnapshot {
        self.snapshot.read().await.clone()
    }
}

impl Default for MapSyncStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn starts_empty() {
        let store = MapSyncStore::new();
        let snapshot = store.snapshot().await;
        assert!(snapshot.data.is_none());
        assert_eq!(snapshot.timestamp, 0);
    }

    #[tokio::test]
    async fn replace_overwrites_the_whole_snapshot() {
        let store = MapSyncStore::new();
        store.replace(json!({"tokens": [1, 2]})).await;
        let stamp = store.replace(json!({"tokens": []})).await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.data, Some(json!({"tokens": []})));
        assert_eq!(snapshot.timestamp, stamp);
    }
}
