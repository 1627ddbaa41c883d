//! Mock section fetcher for testing.
//!
//! Allows configuring canned section bundles per URL and tracking calls
//! for verification.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::SectionFetcher;
use crate::types::sections::PageSections;

/// Mock fetcher returning canned bundles.
///
/// Unknown URLs yield an empty bundle (every section absent), matching a
/// total fetch failure; `failing()` makes the transport itself error.
///
/// # Example
///
/// ```rust
/// use catalog_extraction::fetchers::MockSectionFetcher;
/// use catalog_extraction::types::sections::{PageSections, SECTION_MAIN};
///
/// let fetcher = MockSectionFetcher::new().with_bundle(
///     PageSections::new("https://catalog.example/p/1")
///         .with_fetched(SECTION_MAIN, "<h1>Porcelain Tile</h1>"),
/// );
/// ```
#[derive(Default)]
pub struct MockSectionFetcher {
    bundles: Arc<RwLock<HashMap<String, PageSections>>>,
    calls: Arc<RwLock<Vec<String>>>,
    fail_transport: bool,
}

impl MockSectionFetcher {
    /// Create an empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canned bundle for its URL.
    pub fn add_bundle(&self, bundle: PageSections) {
        self.bundles
            .write()
            .unwrap()
            .insert(bundle.url.clone(), bundle);
    }

    /// Add a canned bundle (builder pattern).
    pub fn with_bundle(self, bundle: PageSections) -> Self {
        self.add_bundle(bundle);
        self
    }

    /// Make every fetch fail at the transport level.
    pub fn failing(mut self) -> Self {
        self.fail_transport = true;
        self
    }

    /// URLs requested so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Number of fetches performed.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

impl Clone for MockSectionFetcher {
    fn clone(&self) -> Self {
        Self {
            bundles: Arc::clone(&self.bundles),
            calls: Arc::clone(&self.calls),
            fail_transport: self.fail_transport,
        }
    }
}

#[async_trait]
impl SectionFetcher for MockSectionFetcher {
    async fn fetch_sections(&self, url: &str) -> FetchResult<PageSections> {
        self.calls.write().unwrap().push(url.to_string());

        if self.fail_transport {
            return Err(FetchError::Http("mock transport failure".into()));
        }

        let bundles = self.bundles.read().unwrap();
        Ok(bundles
            .get(url)
            .cloned()
            .unwrap_or_else(|| PageSections::new(url)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sections::SECTION_MAIN;

    #[tokio::test]
    async fn test_canned_bundle_round_trip() {
        let fetcher = MockSectionFetcher::new().with_bundle(
            PageSections::new("https://catalog.example/p/1")
                .with_fetched(SECTION_MAIN, "<h1>Tile</h1>"),
        );

        let sections = fetcher
            .fetch_sections("https://catalog.example/p/1")
            .await
            .unwrap();
        assert_eq!(sections.healthy_count(), 1);
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_url_yields_empty_bundle() {
        let fetcher = MockSectionFetcher::new();
        let sections = fetcher
            .fetch_sections("https://catalog.example/p/missing")
            .await
            .unwrap();
        assert!(!sections.has_content());
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let fetcher = MockSectionFetcher::new().failing();
        assert!(fetcher
            .fetch_sections("https://catalog.example/p/1")
            .await
            .is_err());
    }
}
