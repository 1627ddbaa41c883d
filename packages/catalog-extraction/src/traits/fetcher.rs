//! SectionFetcher trait for pluggable page delivery.
//!
//! The pipeline never talks to the network for page content itself; a
//! fetch collaborator delivers each product page as a bundle of named
//! sections ("main", "specifications", "resources"). Sections succeed or
//! fail independently and the pipeline proceeds with whatever arrived.
//! Anti-blocking measures, proxies, and rate/backoff policy all live
//! behind this trait.
//!
//! # Usage
//!
//! ```rust,ignore
//! use catalog_extraction::traits::fetcher::SectionFetcher;
//!
//! let sections = fetcher.fetch_sections("https://catalog.example/p/100456789").await?;
//! for (name, _) in sections.healthy() {
//!     println!("got section: {name}");
//! }
//! ```

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::types::sections::PageSections;

/// Fetch collaborator delivering named page sections.
///
/// Implementations:
/// - `HttpSectionFetcher` - plain HTTP convenience implementation
/// - `MockSectionFetcher` - canned bundles for tests
#[async_trait]
pub trait SectionFetcher: Send + Sync {
    /// Fetch all known sections for a product URL.
    ///
    /// Individual section failures are recorded inside the returned
    /// bundle; `Err` is reserved for total transport failure (and even
    /// that is downgraded by the pipeline to an empty bundle).
    async fn fetch_sections(&self, url: &str) -> FetchResult<PageSections>;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
