//! Open-schema growth management.
//!
//! Canonical fields without a fixed column land in the record's open
//! side-map. The expander routes every such field through the append-only
//! name registry so that re-running extraction never creates a second
//! slot for a field already tracked under another spelling. Schema-level
//! behavior is append-only: new names may be recognized over time, none
//! are ever removed or renamed.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::error;

use crate::error::ExtractionError;
use crate::normalize::{CanonicalNameRegistry, RegisterOutcome};
use crate::types::observation::CanonicalField;

/// The expanded side-map plus any operator-facing conflicts.
#[derive(Debug, Clone, Default)]
pub struct ExpandedAttributes {
    /// Canonical name → value, insertion-ordered
    pub attributes: IndexMap<String, String>,

    /// Schema conflicts needing reference-data correction
    pub conflicts: Vec<String>,
}

/// Routes off-schema canonical fields into the open side-map.
pub struct SchemaExpander {
    registry: Arc<CanonicalNameRegistry>,
}

impl SchemaExpander {
    /// Create an expander over the shared registry.
    pub fn new(registry: Arc<CanonicalNameRegistry>) -> Self {
        Self { registry }
    }

    /// Place each field into its recognized slot, registering new slots
    /// as needed.
    ///
    /// A [`SchemaConflict`](ExtractionError::SchemaConflict) is the only
    /// escalated condition: the value is parked under the pre-existing
    /// slot so nothing is lost, and the conflict is reported for
    /// reference-data correction rather than resolved silently.
    pub fn expand(&self, extras: impl IntoIterator<Item = CanonicalField>) -> ExpandedAttributes {
        let mut out = ExpandedAttributes::default();

        for field in extras {
            match self.registry.register(&field.name) {
                Ok(RegisterOutcome::Registered) | Ok(RegisterOutcome::Existing) => {
                    out.attributes.entry(field.name).or_insert(field.value);
                }
                Ok(RegisterOutcome::Collapsed { canonical }) => {
                    out.attributes.entry(canonical).or_insert(field.value);
                }
                Err(ExtractionError::SchemaConflict { existing, incoming }) => {
                    error!(
                        existing = %existing,
                        incoming = %incoming,
                        "schema conflict: reference data needs correction"
                    );
                    out.conflicts.push(format!(
                        "schema conflict: '{incoming}' and '{existing}' resolve to the same concept"
                    ));
                    out.attributes.entry(existing).or_insert(field.value);
                }
                Err(e) => {
                    out.conflicts.push(e.to_string());
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Canonicalizer;
    use crate::types::observation::SourcePass;
    use crate::types::reference::ReferenceData;

    fn field(name: &str, value: &str) -> CanonicalField {
        CanonicalField {
            name: name.to_string(),
            value: value.to_string(),
            pass: SourcePass::Structured,
            confidence: 1.0,
        }
    }

    fn expander_with(seed: &[&str]) -> SchemaExpander {
        let canon = Arc::new(Canonicalizer::new(&ReferenceData::builtin()));
        let registry = Arc::new(CanonicalNameRegistry::new(
            canon,
            seed.iter().map(|s| s.to_string()),
        ));
        SchemaExpander::new(registry)
    }

    #[test]
    fn test_new_slots_register_once() {
        let expander = expander_with(&[]);

        let first = expander.expand([field("shade_variation", "V3")]);
        assert_eq!(first.attributes.get("shade_variation").unwrap(), "V3");

        // second run: same slot, no duplicate, no conflict
        let second = expander.expand([field("shade_variation", "V3")]);
        assert_eq!(second.attributes.len(), 1);
        assert!(second.conflicts.is_empty());
    }

    #[test]
    fn test_alias_spelling_lands_in_canonical_slot() {
        let expander = expander_with(&[]);
        let out = expander.expand([field("colour", "Grey")]);

        assert_eq!(out.attributes.get("color").unwrap(), "Grey");
        assert!(!out.attributes.contains_key("colour"));
    }

    #[test]
    fn test_conflict_is_escalated_not_silent() {
        // "colour" already lives as its own slot from before the alias
        let expander = expander_with(&["colour"]);
        let out = expander.expand([field("colour", "Grey")]);

        assert_eq!(out.conflicts.len(), 1);
        assert!(out.conflicts[0].contains("schema conflict"));
        // value parked under the pre-existing slot
        assert_eq!(out.attributes.get("colour").unwrap(), "Grey");
    }
}
