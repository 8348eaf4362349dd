//! Reference in-memory storage adapter.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{Store, StoreError};
use crate::ratelimit::RateRecord;

/// In-memory store backed by a concurrent map.
///
/// Intended for tests and single-process setups. Records live only as
/// long as the instance, there is no eviction, and nothing is shared
/// across processes — do not use it behind a multi-process deployment.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, RateRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop all records.
    ///
    /// This is primarily useful for testing.
    pub fn clear(&self) {
        self.records.clear();
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<RateRecord>, StoreError> {
        Ok(self.records.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, record: &RateRecord) -> Result<(), StoreError> {
        self.records.insert(key.to_string(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_get_absent_key() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryStore::new();
        let record = RateRecord::first_contact("client-1", 5, Duration::seconds(1), Utc::now());

        store.set("ns-client-1", &record).await.unwrap();

        let loaded = store.get("ns-client-1").await.unwrap();
        assert_eq!(loaded, Some(record));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_set_replaces_existing_record() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut record = RateRecord::first_contact("client-1", 5, Duration::seconds(1), now);

        store.set("ns-client-1", &record).await.unwrap();
        record.count = 7;
        store.set("ns-client-1", &record).await.unwrap();

        let loaded = store.get("ns-client-1").await.unwrap().unwrap();
        assert_eq!(loaded.count, 7);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryStore::new();
        let record = RateRecord::first_contact("client-1", 5, Duration::seconds(1), Utc::now());
        store.set("a", &record).await.unwrap();
        store.set("b", &record).await.unwrap();

        store.clear();
        assert!(store.is_empty());
    }
}
