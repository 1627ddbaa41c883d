//! Per-run provenance: which pass produced each field, what stayed
//! unresolved, and anything an operator needs to look at.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::observation::SourcePass;
use super::record::Family;

/// Origin of one resolved canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOrigin {
    /// The pass that produced the winning observation
    pub pass: SourcePass,

    /// Confidence of the winning observation
    pub confidence: f32,
}

/// A same-tier alternative the normalizer discarded.
///
/// Kept for diagnostics only; never surfaced on the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscardedObservation {
    /// Canonical name the observations collapsed under
    pub canonical: String,

    /// The value that was kept (first seen)
    pub kept: String,

    /// The value that was discarded
    pub discarded: String,

    /// The tier both observations came from
    pub pass: SourcePass,
}

/// The per-run provenance and completeness report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvenanceReport {
    /// Resolved family
    #[serde(default)]
    pub family: Family,

    /// Classification confidence in [0, 1]
    pub family_confidence: f32,

    /// How many family features matched during classification
    pub matched_features: usize,

    /// Origin per resolved canonical field, insertion-ordered
    #[serde(default)]
    pub fields: IndexMap<String, FieldOrigin>,

    /// Mandatory fields with no observation from any pass
    #[serde(default)]
    pub unresolved: Vec<String>,

    /// Same-tier alternatives discarded during collapsing
    #[serde(default)]
    pub discarded: Vec<DiscardedObservation>,

    /// Sections that failed to fetch
    #[serde(default)]
    pub failed_sections: Vec<String>,

    /// Operator-facing diagnostics (schema conflicts, classification
    /// failure on empty input)
    #[serde(default)]
    pub diagnostics: Vec<String>,
}

impl ProvenanceReport {
    /// Whether every mandatory field was resolved.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Record the origin of a resolved field.
    pub fn record_field(&mut self, name: impl Into<String>, pass: SourcePass, confidence: f32) {
        self.fields.insert(name.into(), FieldOrigin { pass, confidence });
    }

    /// Add an operator diagnostic.
    pub fn add_diagnostic(&mut self, diagnostic: impl Into<String>) {
        self.diagnostics.push(diagnostic.into());
    }
}
