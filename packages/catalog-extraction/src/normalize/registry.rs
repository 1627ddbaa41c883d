//! Append-only registry of canonical attribute names.
//!
//! The registry is the single shared piece of mutable state across runs:
//! it remembers every open-map slot ever registered so that re-running
//! extraction never creates a second slot for a field already tracked
//! under another spelling. Writers go through one `RwLock`; names are
//! never removed or renamed.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use crate::error::ExtractionError;
use crate::normalize::Canonicalizer;

/// Outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The name was new and is now registered.
    Registered,
    /// The name was already registered; registering again is a no-op.
    Existing,
    /// The spelling collapsed onto an already-registered canonical name;
    /// the value belongs under that slot.
    Collapsed { canonical: String },
}

/// Append-only canonical-name registry.
pub struct CanonicalNameRegistry {
    canon: Arc<Canonicalizer>,
    names: RwLock<BTreeSet<String>>,
}

impl CanonicalNameRegistry {
    /// Create a registry seeded with the given names, sharing the
    /// pipeline's canonical-name authority.
    pub fn new(canon: Arc<Canonicalizer>, seed: impl IntoIterator<Item = String>) -> Self {
        Self {
            canon,
            names: RwLock::new(seed.into_iter().collect()),
        }
    }

    /// Register a canonical name.
    ///
    /// Registering an existing name is a no-op. A spelling whose canonical
    /// form differs from itself normally just collapses onto that form;
    /// but if the spelling was *itself* registered before the alias table
    /// diverged, two live slots now describe one concept and the conflict
    /// is escalated for reference-data correction.
    pub fn register(&self, name: &str) -> Result<RegisterOutcome, ExtractionError> {
        let canonical = self.canon.canonicalize(name);
        let mut names = self.names.write().expect("registry lock poisoned");

        if canonical == name {
            if names.insert(canonical) {
                return Ok(RegisterOutcome::Registered);
            }
            return Ok(RegisterOutcome::Existing);
        }

        // `name` is an alias spelling of `canonical`
        if names.contains(name) {
            return Err(ExtractionError::SchemaConflict {
                existing: name.to_string(),
                incoming: canonical,
            });
        }
        names.insert(canonical.clone());
        Ok(RegisterOutcome::Collapsed { canonical })
    }

    /// Whether a name is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.names
            .read()
            .expect("registry lock poisoned")
            .contains(name)
    }

    /// Snapshot of all registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.names
            .read()
            .expect("registry lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.names.read().expect("registry lock poisoned").len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::reference::ReferenceData;

    fn registry() -> CanonicalNameRegistry {
        let canon = Arc::new(Canonicalizer::new(&ReferenceData::builtin()));
        CanonicalNameRegistry::new(canon, [])
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = registry();

        assert_eq!(
            registry.register("shade_variation").unwrap(),
            RegisterOutcome::Registered
        );
        assert_eq!(
            registry.register("shade_variation").unwrap(),
            RegisterOutcome::Existing
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_alias_spelling_collapses() {
        let registry = registry();

        // "colour" is aliased to "color"
        let outcome = registry.register("colour").unwrap();
        assert_eq!(
            outcome,
            RegisterOutcome::Collapsed {
                canonical: "color".to_string()
            }
        );
        assert!(registry.is_registered("color"));
        assert!(!registry.is_registered("colour"));
    }

    #[test]
    fn test_diverged_registry_is_a_schema_conflict() {
        // "colour" got registered as its own slot before the alias existed
        // (simulated by seeding the raw spelling)
        let canon = Arc::new(Canonicalizer::new(&ReferenceData::builtin()));
        let registry = CanonicalNameRegistry::new(canon, ["colour".to_string()]);
        drop(registry.register("color"));

        let err = registry.register("colour").unwrap_err();
        assert!(matches!(err, ExtractionError::SchemaConflict { .. }));
    }

    #[test]
    fn test_append_only_names_snapshot() {
        let registry = registry();
        registry.register("edge_type").unwrap();
        registry.register("shade_variation").unwrap();

        let names = registry.names();
        assert_eq!(names, vec!["edge_type", "shade_variation"]);
    }
}
