//! Section fetcher implementations.

pub mod http;
pub mod mock;

pub use http::{HttpLinkChecker, HttpSectionFetcher, SectionRoute};
pub use mock::MockSectionFetcher;
