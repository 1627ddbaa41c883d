//! In-memory record store for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::traits::store::RecordStore;
use crate::types::record::ProductRecord;

/// In-memory storage keyed by canonical URL.
///
/// Useful for testing and development. Not suitable for production as
/// data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, ProductRecord>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored records.
    pub fn clear(&self) {
        self.records.write().unwrap().clear();
    }

    /// Number of stored records.
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn upsert(&self, record: &ProductRecord) -> Result<()> {
        self.records
            .write()
            .unwrap()
            .insert(record.url.clone(), record.clone());
        Ok(())
    }

    async fn get_by_url(&self, url: &str) -> Result<Option<ProductRecord>> {
        Ok(self.records.read().unwrap().get(url).cloned())
    }

    async fn get_by_sku(&self, sku: &str) -> Result<Option<ProductRecord>> {
        Ok(self
            .records
            .read()
            .unwrap()
            .values()
            .find(|r| r.sku.as_deref() == Some(sku))
            .cloned())
    }

    async fn delete(&self, url: &str) -> Result<()> {
        self.records.write().unwrap().remove(url);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().unwrap().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::{CoreSpecs, Family, ProductPrices};
    use indexmap::IndexMap;

    fn record(url: &str, sku: Option<&str>) -> ProductRecord {
        ProductRecord {
            sku: sku.map(String::from),
            url: url.to_string(),
            title: Some("Test".to_string()),
            family: Family::Tile,
            prices: ProductPrices::default(),
            core: CoreSpecs::default(),
            attributes: IndexMap::new(),
            resources: vec![],
            content_hash: "h".to_string(),
            incomplete: false,
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_wholesale() {
        let store = MemoryStore::new();
        let url = "https://catalog.example/p/1";

        let mut first = record(url, Some("100"));
        first
            .attributes
            .insert("color".to_string(), "Grey".to_string());
        store.upsert(&first).await.unwrap();

        // re-extraction with fewer fields leaves no stale entries behind
        let second = record(url, Some("100"));
        store.upsert(&second).await.unwrap();

        let stored = store.get_by_url(url).await.unwrap().unwrap();
        assert!(stored.attributes.is_empty());
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn test_get_by_sku() {
        let store = MemoryStore::new();
        store
            .upsert(&record("https://catalog.example/p/1", Some("100456789")))
            .await
            .unwrap();

        let found = store.get_by_sku("100456789").await.unwrap();
        assert!(found.is_some());
        assert!(store.get_by_sku("999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let url = "https://catalog.example/p/1";
        store.upsert(&record(url, None)).await.unwrap();
        store.delete(url).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
