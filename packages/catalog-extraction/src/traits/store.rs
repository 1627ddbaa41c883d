//! Storage trait for finished product records.
//!
//! The pipeline's only outbound side effect is an upsert keyed by
//! canonical URL. Storage technology is unconstrained beyond atomic
//! per-URL replace semantics; the open side-map travels with the record
//! as a tagged key/value document.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::record::ProductRecord;

/// Store for normalized product records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or replace the record for its canonical URL.
    ///
    /// Replace is wholesale: no field-level merging with a prior record.
    async fn upsert(&self, record: &ProductRecord) -> Result<()>;

    /// Get a record by canonical URL.
    async fn get_by_url(&self, url: &str) -> Result<Option<ProductRecord>>;

    /// Get a record by catalog SKU.
    async fn get_by_sku(&self, sku: &str) -> Result<Option<ProductRecord>>;

    /// Delete a record by canonical URL.
    async fn delete(&self, url: &str) -> Result<()>;

    /// Count stored records.
    async fn count(&self) -> Result<usize>;
}
