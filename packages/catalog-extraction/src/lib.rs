//! Product Page Intelligence & Extraction Pipeline
//!
//! Ingests retail product pages from a single surfaces catalog and turns
//! loosely structured page content into one normalized, search-ready
//! record per URL.
//!
//! # Design Philosophy
//!
//! **"Every run yields a record"**
//!
//! - Sections fail independently; extraction proceeds with what arrived
//! - Three ordered passes per family: structured data > patterns > heuristics
//! - One canonicalization authority; aliases can never fork a field
//! - The schema grows append-only through the open side-map
//! - Partial data is flagged `incomplete`, never rejected
//!
//! # Usage
//!
//! ```rust,ignore
//! use catalog_extraction::{MemoryStore, Pipeline};
//! use catalog_extraction::fetchers::{HttpLinkChecker, HttpSectionFetcher};
//!
//! let pipeline = Pipeline::new(
//!     HttpSectionFetcher::new(),
//!     MemoryStore::new(),
//!     HttpLinkChecker::new(),
//! );
//!
//! let outcome = pipeline.run("https://catalog.example/p/100456789").await?;
//! assert!(!outcome.record.incomplete);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator abstractions (SectionFetcher, RecordStore, LinkChecker)
//! - [`types`] - Domain types (sections, observations, record, reference data)
//! - [`classify`] - Page-family classification
//! - [`parsers`] - Family strategies over the shared extraction passes
//! - [`normalize`] - Canonicalization, collapsing, and the name registry
//! - [`resources`] - Auxiliary document resolution
//! - [`expand`] - Open-schema growth management
//! - [`assemble`] - Final record assembly
//! - [`pipeline`] - The run orchestrator
//! - [`stores`] - Storage implementations
//! - [`fetchers`] - Section fetcher implementations
//! - [`testing`] - Mocks and page fixtures

pub mod assemble;
pub mod classify;
pub mod error;
pub mod expand;
pub mod fetchers;
pub mod html;
pub mod normalize;
pub mod parsers;
pub mod pipeline;
pub mod resources;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ExtractionError, FetchError};
pub use traits::{checker::LinkChecker, fetcher::SectionFetcher, store::RecordStore};
pub use types::{
    config::PipelineConfig,
    observation::{fields, CanonicalField, RawFieldObservation, SourcePass},
    provenance::{DiscardedObservation, FieldOrigin, ProvenanceReport},
    record::{
        CoreSpecs, DocumentKind, Family, ProductPrices, ProductRecord, ResourceLink,
    },
    reference::{DocumentTemplate, ReferenceData},
    sections::{PageSections, Section, SECTION_MAIN, SECTION_RESOURCES, SECTION_SPECIFICATIONS},
};

// Re-export pipeline components
pub use assemble::RecordAssembler;
pub use classify::{ClassificationResult, PageClassifier};
pub use expand::SchemaExpander;
pub use normalize::{
    canonical_key, CanonicalNameRegistry, Canonicalizer, RegisterOutcome, SpecificationNormalizer,
};
pub use pipeline::{ExtractionOutcome, Pipeline};
pub use resources::{ResourceContext, ResourceResolver};

// Re-export implementations
pub use fetchers::{HttpLinkChecker, HttpSectionFetcher, MockSectionFetcher};
pub use stores::MemoryStore;
