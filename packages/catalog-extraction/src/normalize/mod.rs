//! Specification normalization.
//!
//! Parsers observe the same semantic field under many spellings
//! ("boxWeight", "Box Weight", "box_weight"). One canonicalization
//! function is the single authority for collapsing spellings, shared by
//! the normalizer and the schema expander so the two can never disagree
//! about where a value lives.

pub mod registry;

pub use registry::{CanonicalNameRegistry, RegisterOutcome};

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::types::observation::{CanonicalField, RawFieldObservation};
use crate::types::provenance::DiscardedObservation;
use crate::types::reference::ReferenceData;

/// Reduce a raw field spelling to its canonical key form.
///
/// Lower-cases, splits camelCase, and turns every separator run into a
/// single underscore: `"boxWeight"`, `"Box Weight"`, and `"box_weight"`
/// all become `box_weight`.
pub fn canonical_key(raw: &str) -> String {
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() && prev_lower {
                tokens.push(std::mem::take(&mut current));
            }
            current.extend(ch.to_lowercase());
            prev_lower = ch.is_lowercase() || ch.is_numeric();
        } else {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = false;
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens.join("_")
}

/// Canonical-name authority: key reduction plus the alias table.
pub struct Canonicalizer {
    aliases: HashMap<String, String>,
}

impl Canonicalizer {
    /// Build from reference data.
    pub fn new(reference: &ReferenceData) -> Self {
        Self {
            aliases: reference.aliases.clone(),
        }
    }

    /// Canonical name for a raw field spelling.
    pub fn canonicalize(&self, raw: &str) -> String {
        let key = canonical_key(raw);
        match self.aliases.get(&key) {
            Some(canonical) => canonical.clone(),
            None => key,
        }
    }
}

/// Result of collapsing one run's observations.
#[derive(Debug, Clone, Default)]
pub struct NormalizedSpecs {
    /// At most one field per canonical name, first-seen order
    pub fields: IndexMap<String, CanonicalField>,

    /// Same-tier disagreements, kept for diagnostics only
    pub discarded: Vec<DiscardedObservation>,
}

impl NormalizedSpecs {
    /// Value of a canonical field, if resolved.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|f| f.value.as_str())
    }

    /// Whether a canonical field was resolved.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// Collapses raw observations into canonical fields by source-pass
/// priority.
pub struct SpecificationNormalizer {
    canon: Arc<Canonicalizer>,
}

impl SpecificationNormalizer {
    /// Create a normalizer sharing the given canonical-name authority.
    pub fn new(canon: Arc<Canonicalizer>) -> Self {
        Self { canon }
    }

    /// Collapse observations: group by canonical name, pick the
    /// highest-priority pass per group, first-seen wins ties.
    ///
    /// Same-tier disagreements keep the first value and record the loser;
    /// lower-tier values are simply outranked. Empty values are dropped
    /// (a parser must not fabricate, and neither does the normalizer).
    pub fn collapse(&self, observations: &[RawFieldObservation]) -> NormalizedSpecs {
        let mut out = NormalizedSpecs::default();

        for obs in observations {
            let value = obs.value.trim();
            if value.is_empty() {
                continue;
            }
            let name = self.canon.canonicalize(&obs.field);
            if name.is_empty() {
                continue;
            }

            match out.fields.entry(name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(CanonicalField {
                        name,
                        value: value.to_string(),
                        pass: obs.pass,
                        confidence: obs.confidence,
                    });
                }
                Entry::Occupied(mut slot) => {
                    let existing = slot.get_mut();
                    if obs.pass.priority() < existing.pass.priority() {
                        existing.value = value.to_string();
                        existing.pass = obs.pass;
                        existing.confidence = obs.confidence;
                    } else if obs.pass.priority() == existing.pass.priority()
                        && existing.value != value
                    {
                        out.discarded.push(DiscardedObservation {
                            canonical: name,
                            kept: slot.get().value.clone(),
                            discarded: value.to_string(),
                            pass: obs.pass,
                        });
                    }
                }
            }
        }

        out
    }
}
