//! The extraction pipeline façade.
//!
//! Orchestrates one run per URL, strictly top-to-bottom: fetch sections →
//! classify → family parse → normalize → resolve resources → expand
//! schema → assemble → upsert. No component calls back upstream, runs
//! share no mutable state beyond the append-only name registry, and the
//! final upsert is the only side effect.
//!
//! # Usage
//!
//! ```rust,ignore
//! use catalog_extraction::{MemoryStore, Pipeline};
//! use catalog_extraction::testing::{MockLinkChecker, MockSectionFetcher};
//!
//! let pipeline = Pipeline::new(fetcher, MemoryStore::new(), checker);
//! let outcome = pipeline.run("https://catalog.example/p/100456789").await?;
//! println!("{} ({})", outcome.record.url, outcome.record.family);
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::assemble::{is_fixed_field, AssembleInput, RecordAssembler};
use crate::classify::PageClassifier;
use crate::error::{ExtractionError, Result};
use crate::expand::SchemaExpander;
use crate::normalize::{CanonicalNameRegistry, Canonicalizer, SpecificationNormalizer};
use crate::parsers::ParserSet;
use crate::resources::{origin_of, slugify, ResourceContext, ResourceResolver};
use crate::traits::checker::LinkChecker;
use crate::traits::fetcher::SectionFetcher;
use crate::traits::store::RecordStore;
use crate::types::config::PipelineConfig;
use crate::types::observation::{fields, CanonicalField};
use crate::types::provenance::ProvenanceReport;
use crate::types::record::{Family, ProductRecord};
use crate::types::reference::ReferenceData;
use crate::types::sections::PageSections;

/// Open-map names known from the start; everything else is registered as
/// the catalog introduces it.
const SEED_ATTRIBUTES: &[&str] = &[
    fields::CATEGORY,
    fields::COLOR,
    fields::FINISH,
    fields::ORIGIN,
    fields::LENGTH_IN,
    fields::WEAR_LAYER_MIL,
    fields::INSTALLATION_METHOD,
    "brand",
];

/// What one run returns: the record that was upserted plus its report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub record: ProductRecord,
    pub report: ProvenanceReport,
}

/// The product page intelligence pipeline.
///
/// Generic over its three collaborators: the section fetcher (transport),
/// the record store (persistence), and the link checker (resource
/// probes).
pub struct Pipeline<F, S, C> {
    fetcher: F,
    store: S,
    checker: C,
    classifier: PageClassifier,
    parsers: ParserSet,
    normalizer: SpecificationNormalizer,
    resolver: ResourceResolver,
    expander: SchemaExpander,
    registry: Arc<CanonicalNameRegistry>,
    config: PipelineConfig,
}

impl<F, S, C> Pipeline<F, S, C>
where
    F: SectionFetcher,
    S: RecordStore,
    C: LinkChecker,
{
    /// Create a pipeline with built-in reference data and defaults.
    pub fn new(fetcher: F, store: S, checker: C) -> Self {
        Self::with_config(
            fetcher,
            store,
            checker,
            ReferenceData::builtin(),
            PipelineConfig::default(),
        )
    }

    /// Create a pipeline with explicit reference data and configuration.
    pub fn with_config(
        fetcher: F,
        store: S,
        checker: C,
        reference: ReferenceData,
        config: PipelineConfig,
    ) -> Self {
        let reference = Arc::new(reference);
        let canon = Arc::new(Canonicalizer::new(&reference));
        let registry = Arc::new(CanonicalNameRegistry::new(
            Arc::clone(&canon),
            SEED_ATTRIBUTES.iter().map(|s| s.to_string()),
        ));

        Self {
            fetcher,
            store,
            checker,
            classifier: PageClassifier::with_thresholds(config.confidence_floor, config.tie_margin),
            parsers: ParserSet::new(Arc::clone(&canon)),
            normalizer: SpecificationNormalizer::new(Arc::clone(&canon)),
            resolver: ResourceResolver::new(
                Arc::clone(&reference),
                Duration::from_millis(config.probe_timeout_ms),
            ),
            expander: SchemaExpander::new(Arc::clone(&registry)),
            registry,
            config,
        }
    }

    /// The shared canonical-name registry.
    pub fn registry(&self) -> Arc<CanonicalNameRegistry> {
        Arc::clone(&self.registry)
    }

    /// Read access for downstream consumers: record by canonical URL.
    pub async fn record_by_url(&self, url: &str) -> Result<Option<ProductRecord>> {
        self.store.get_by_url(url).await
    }

    /// Read access for downstream consumers: record by catalog SKU.
    pub async fn record_by_sku(&self, sku: &str) -> Result<Option<ProductRecord>> {
        self.store.get_by_sku(sku).await
    }

    /// Run one full extraction for a URL, ending in an upsert.
    ///
    /// Always yields a record (possibly `incomplete`); `Err` is reserved
    /// for storage faults and cancellation.
    pub async fn run(&self, url: &str) -> Result<ExtractionOutcome> {
        self.run_with_cancel(url, &CancellationToken::new()).await
    }

    /// Run one extraction, abandoning without side effects if the token
    /// fires before assembly.
    pub async fn run_with_cancel(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<ExtractionOutcome> {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, url = %url, "extraction run starting");

        if cancel.is_cancelled() {
            return Err(ExtractionError::Cancelled);
        }

        let mut diagnostics = Vec::new();

        // 1. Fetch sections; total transport failure degrades to an empty
        //    bundle so the run still produces a record (presence tracking)
        let sections = match self.fetcher.fetch_sections(url).await {
            Ok(sections) => sections,
            Err(e) => {
                warn!(run_id = %run_id, url = %url, error = %e, "section fetch failed entirely");
                diagnostics.push(format!("fetch failed: {e}"));
                PageSections::new(url)
            }
        };
        for name in sections.failed_names() {
            debug!(run_id = %run_id, section = %name, "section unavailable, partial extraction");
        }
        if !sections.has_content() {
            diagnostics.push("classification failed: no healthy sections".to_string());
        }

        // 2. Classify
        let classification = self.classifier.classify(&sections);
        if classification.family == Family::Unknown && sections.has_content() {
            debug!(
                run_id = %run_id,
                confidence = classification.confidence,
                "classification ambiguous, using default parser"
            );
        }

        // 3. Family passes
        let output = self.parsers.extract(classification.family, &sections);

        // 4. Normalize
        let specs = self.normalizer.collapse(&output.observations);

        if cancel.is_cancelled() {
            return Err(ExtractionError::Cancelled);
        }

        // 5. Resources (the only network-blocking step, bounded per probe)
        let ctx = ResourceContext {
            family: classification.family,
            origin: origin_of(url),
            sku: specs.value(fields::SKU).map(String::from),
            slug: specs.value(fields::TITLE).map(slugify),
            material: specs.value(fields::MATERIAL).map(String::from),
        };
        let resources = self.resolver.resolve(&self.checker, &ctx).await;

        // 6. Grow the open schema
        let extras: Vec<CanonicalField> = specs
            .fields
            .values()
            .filter(|f| !is_fixed_field(&f.name))
            .cloned()
            .collect();
        let expanded = self.expander.expand(extras);
        diagnostics.extend(expanded.conflicts);

        // Abandonment point: nothing has been persisted yet
        if cancel.is_cancelled() {
            return Err(ExtractionError::Cancelled);
        }

        // 7. Assemble and upsert
        let failed_sections = sections
            .failed_names()
            .into_iter()
            .map(String::from)
            .collect();
        let (record, report) = RecordAssembler::assemble(AssembleInput {
            url,
            content_hash: sections.content_hash(),
            classification,
            specs: &specs,
            unresolved: output.unresolved,
            attributes: expanded.attributes,
            resources,
            failed_sections,
            diagnostics,
        });

        self.store.upsert(&record).await?;

        info!(
            run_id = %run_id,
            url = %url,
            family = %record.family,
            incomplete = record.incomplete,
            fields = report.fields.len(),
            unresolved = report.unresolved.len(),
            "extraction run complete"
        );

        Ok(ExtractionOutcome { record, report })
    }

    /// Run many URLs with bounded concurrency.
    ///
    /// Results are returned in input order; individual failures do not
    /// stop the batch.
    pub async fn run_many(&self, urls: &[String]) -> Vec<Result<ExtractionOutcome>> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));

        let runs = urls.iter().map(|url| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                self.run(url).await
            }
        });

        futures::future::join_all(runs).await
    }
}
