//! LinkChecker trait for resource existence probes.

use async_trait::async_trait;

use crate::error::FetchResult;

/// Lightweight reachability check for predicted document URLs.
///
/// Implementations:
/// - `HttpLinkChecker` - HEAD request with a bounded timeout
/// - `MockLinkChecker` - canned answers for tests
#[async_trait]
pub trait LinkChecker: Send + Sync {
    /// Whether the URL currently resolves to an existing document.
    ///
    /// Errors are treated by the resolver as "unverified", never as run
    /// failures.
    async fn exists(&self, url: &str) -> FetchResult<bool>;

    /// Get the checker name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
