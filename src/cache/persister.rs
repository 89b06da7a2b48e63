//! Persists query results across runs, with version and age checks.
//!
//! The snapshot is one JSON document under a single storage key. Restore
//! drops the snapshot entirely when it is unreadable, from another cache
//! version, or older than the configured max age; per-entry timestamps are
//! preserved so callers can apply their own staleness rules.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::helpers::time::now_u64;
use crate::storage::KvStorage;
use crate::utils::constants::QUERY_CACHE_KEY;

/// One cached query result; the payload is opaque to the persister.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedQuery {
    pub key: String,
    pub updated_at_unix_ts: u64,
    pub payload: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: String,
    stored_at_unix_ts: u64,
    queries: Vec<PersistedQuery>,
}

pub struct CachePersister {
    storage: Arc<dyn KvStorage>,
    version: String,
    max_age_seconds: u64,
    denied_prefixes: Vec<String>,
}

impl CachePersister {
    pub fn new(storage: Arc<dyn KvStorage>, version: impl Into<String>, max_age_seconds: u64) -> Self {
        Self {
            storage,
            version: version.into(),
            max_age_seconds,
            denied_prefixes: Vec::new(),
        }
    }

    /// Queries whose key starts with this prefix are never persisted
    /// (auth state, transient UI queries).
    pub fn deny_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.denied_prefixes.push(prefix.into());
        self
    }

    pub async fn persist(&self, queries: &[PersistedQuery]) -> Result<()> {
        let kept: Vec<PersistedQuery> = queries
            .iter()
            .filter(|q| !self.is_denied(&q.key))
            .cloned()
            .collect();
        let snapshot = Snapshot {
            version: self.version.clone(),
            stored_at_unix_ts: now_u64(),
            queries: kept,
        };
        self.storage
            .set(QUERY_CACHE_KEY, &serde_json::to_string(&snapshot)?)
            .await
    }

    /// Restore the persisted snapshot, if there is a usable one.
    pub async fn restore(&self) -> Result<Option<Vec<PersistedQuery>>> {
        let raw = match self.storage.get(QUERY_CACHE_KEY).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let snapshot: Snapshot = match serde_json::from_str(&raw) {
            Ok(s) => s,
            Err(e) => {
                warn!("dropping unreadable query cache: {e}");
                self.storage.remove(QUERY_CACHE_KEY).await?;
                return Ok(None);
            }
        };

        if snapshot.version != self.version {
            debug!(
                stored = %snapshot.version,
                expected = %self.version,
                "dropping query cache from another version"
            );
            self.storage.remove(QUERY_CACHE_KEY).await?;
            return Ok(None);
        }

        if now_u64().saturating_sub(snapshot.stored_at_unix_ts) > self.max_age_seconds {
            debug!("dropping expired query cache");
            self.storage.remove(QUERY_CACHE_KEY).await?;
            return Ok(None);
        }

        Ok(Some(snapshot.queries))
    }

    fn is_denied(&self, key: &str) -> bool {
        self.denied_prefixes.iter().any(|p| key.starts_with(p))
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStorage;

    fn query(key: &str) -> PersistedQuery {
        PersistedQuery {
            key: key.to_owned(),
            updated_at_unix_ts: now_u64(),
            payload: json!({"k": key}),
        }
    }

    #[tokio::test]
    async fn roundtrip() {
        let storage = Arc::new(MemoryStorage::new());
        let persister = CachePersister::new(storage, "v1", 3600);

        persister.persist(&[query("catalog"), query("sessions")]).await.unwrap();
        let restored = persister.restore().await.unwrap().unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].key, "catalog");
    }

    #[tokio::test]
    async fn missing_snapshot_restores_none() {
        let persister = CachePersister::new(Arc::new(MemoryStorage::new()), "v1", 3600);
        assert!(persister.restore().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn version_mismatch_drops_snapshot() {
        let storage = Arc::new(MemoryStorage::new());
        CachePersister::new(storage.clone(), "v1", 3600)
            .persist(&[query("catalog")])
            .await
            .unwrap();

        let upgraded = CachePersister::new(storage.clone(), "v2", 3600);
        assert!(upgraded.restore().await.unwrap().is_none());
        // snapshot removed from storage, not just skipped
        assert!(storage.get(QUERY_CACHE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_snapshot_drops() {
        let storage = Arc::new(MemoryStorage::new());
        // write a snapshot stamped in the past, bypassing persist()
        let stale = serde_json::to_string(&Snapshot {
            version: "v1".into(),
            stored_at_unix_ts: now_u64() - 120,
            queries: vec![query("catalog")],
        })
        .unwrap();
        storage.set(QUERY_CACHE_KEY, &stale).await.unwrap();

        let persister = CachePersister::new(storage.clone(), "v1", 60);
        assert!(persister.restore().await.unwrap().is_none());
        assert!(storage.get(QUERY_CACHE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unreadable_snapshot_drops() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(QUERY_CACHE_KEY, "not json").await.unwrap();

        let persister = CachePersister::new(storage.clone(), "v1", 3600);
        assert!(persister.restore().await.unwrap().is_none());
        assert!(storage.get(QUERY_CACHE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn denied_prefixes_are_never_persisted() {
        let storage = Arc::new(MemoryStorage::new());
        let persister =
            CachePersister::new(storage, "v1", 3600).deny_prefix("auth.");

        persister
            .persist(&[query("auth.session"), query("catalog")])
            .await
            .unwrap();
        let restored = persister.restore().await.unwrap().unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].key, "catalog");
    }
}
