//! Typed errors for the catalog extraction pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Most extraction-level failures (missing sections, ambiguous
//! classification, unresolved fields, unverifiable resources) are *soft*:
//! they are resolved locally and surface only in the provenance report. The
//! variants here cover the failures that genuinely stop a run (storage,
//! reference data, cancellation) plus the per-section fetch errors recorded
//! inside [`PageSections`](crate::types::sections::PageSections).

use thiserror::Error;

/// Errors that can stop an extraction run.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Section fetch failed at the transport level (all sections lost)
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Reference data could not be loaded or is malformed
    #[error("reference data error: {reason}")]
    ReferenceData { reason: String },

    /// Two canonical names were found to refer to the same concept.
    ///
    /// The only operator-facing condition: the alias table has diverged and
    /// needs a reference-data correction.
    #[error("schema conflict: '{incoming}' and '{existing}' resolve to the same concept")]
    SchemaConflict { existing: String, incoming: String },

    /// Operation was cancelled before assembly
    #[error("operation cancelled")]
    Cancelled,
}

/// Errors that can occur while fetching page sections.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A named section failed to fetch; recoverable per section
    #[error("section unavailable: {section}")]
    SectionUnavailable { section: String },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Connection timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
