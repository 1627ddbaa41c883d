//! Family-specific extraction strategies.
//!
//! One parser per page family, each an explicit ordered strategy over the
//! shared passes: embedded structured data first, family patterns second,
//! generic heuristics last. Later passes only run while mandatory fields
//! remain unresolved (an early-exit optimization). Parsers never fabricate
//! values; a mandatory shortfall is reported, not fatal.

pub mod default;
pub mod grout;
pub mod passes;
pub mod tile;
pub mod tool;
pub mod trim;
pub mod vinyl;

pub use passes::{HeuristicPass, PatternLibrary, StructuredPass};

use std::collections::HashSet;
use std::sync::Arc;

use crate::normalize::Canonicalizer;
use crate::types::observation::RawFieldObservation;
use crate::types::record::Family;
use crate::types::sections::PageSections;

pub use default::DefaultParser;
pub use grout::GroutParser;
pub use tile::TileParser;
pub use tool::InstallationToolParser;
pub use trim::TrimMoldingParser;
pub use vinyl::LuxuryVinylParser;

/// What one parser run produced: raw observations plus the mandatory
/// fields no pass could resolve.
#[derive(Debug, Clone, Default)]
pub struct ParserOutput {
    pub observations: Vec<RawFieldObservation>,
    pub unresolved: Vec<String>,
}

/// Contract shared by every family strategy.
///
/// Parsers are deliberately thin: they pick patterns, relabel generic
/// structured fields for their family, and derive family values. The pass
/// ordering itself lives in [`ParserSet::extract`].
pub trait FamilyParser: Send + Sync {
    /// The family this parser handles.
    fn family(&self) -> Family;

    /// Canonical names that must resolve for a complete record.
    fn mandatory_fields(&self) -> &'static [&'static str];

    /// Family-specific renaming of generic structured-data fields
    /// (e.g. a displayed `price` is a per-box price for boxed goods).
    fn relabel(&self, _field: &str) -> Option<&'static str> {
        None
    }

    /// The family's pattern pass over the section text.
    fn pattern_pass(&self, _sections: &PageSections) -> Vec<RawFieldObservation> {
        Vec::new()
    }

    /// Post-pass derivations (e.g. per-area price from box price).
    fn finish(&self, _observations: &mut Vec<RawFieldObservation>, _canon: &Canonicalizer) {}
}

/// The full strategy set plus the shared passes.
pub struct ParserSet {
    canon: Arc<Canonicalizer>,
    structured: StructuredPass,
    heuristics: HeuristicPass,
    tile: TileParser,
    grout: GroutParser,
    trim: TrimMoldingParser,
    vinyl: LuxuryVinylParser,
    tool: InstallationToolParser,
    default: DefaultParser,
}

impl ParserSet {
    /// Build every family parser around one pattern library.
    pub fn new(canon: Arc<Canonicalizer>) -> Self {
        let patterns = Arc::new(PatternLibrary::new());
        Self {
            canon,
            structured: StructuredPass::new(),
            heuristics: HeuristicPass::new(),
            tile: TileParser::new(Arc::clone(&patterns)),
            grout: GroutParser::new(Arc::clone(&patterns)),
            trim: TrimMoldingParser::new(Arc::clone(&patterns)),
            vinyl: LuxuryVinylParser::new(Arc::clone(&patterns)),
            tool: InstallationToolParser::new(Arc::clone(&patterns)),
            default: DefaultParser::new(),
        }
    }

    /// The strategy for a family. `Unknown` gets the default parser.
    pub fn parser_for(&self, family: Family) -> &dyn FamilyParser {
        match family {
            Family::Tile => &self.tile,
            Family::Grout => &self.grout,
            Family::TrimMolding => &self.trim,
            Family::LuxuryVinyl => &self.vinyl,
            Family::InstallationTool => &self.tool,
            Family::Unknown => &self.default,
        }
    }

    /// Run the ordered passes for a family over a section bundle.
    pub fn extract(&self, family: Family, sections: &PageSections) -> ParserOutput {
        let parser = self.parser_for(family);

        // Pass 1: embedded structured data, relabeled for the family
        let mut observations = self.structured.run(sections);
        for obs in &mut observations {
            if let Some(renamed) = parser.relabel(&obs.field) {
                obs.field = renamed.to_string();
            }
        }

        // Pass 2 and 3 only while mandatory fields remain unresolved
        if !self.unresolved(parser, &observations).is_empty() {
            observations.extend(parser.pattern_pass(sections));
            if !self.unresolved(parser, &observations).is_empty() {
                observations.extend(self.heuristics.run(sections));
            }
        }

        parser.finish(&mut observations, &self.canon);

        let unresolved = self.unresolved(parser, &observations);
        tracing::debug!(
            family = %parser.family(),
            observations = observations.len(),
            unresolved = unresolved.len(),
            "parser pass complete"
        );

        ParserOutput {
            observations,
            unresolved,
        }
    }

    fn unresolved(&self, parser: &dyn FamilyParser, observations: &[RawFieldObservation]) -> Vec<String> {
        let resolved: HashSet<String> = observations
            .iter()
            .filter(|o| !o.value.trim().is_empty())
            .map(|o| self.canon.canonicalize(&o.field))
            .collect();

        parser
            .mandatory_fields()
            .iter()
            .filter(|field| !resolved.contains(**field))
            .map(|field| field.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::observation::fields;
    use crate::types::reference::ReferenceData;
    use crate::types::sections::SECTION_MAIN;

    fn parser_set() -> ParserSet {
        ParserSet::new(Arc::new(Canonicalizer::new(&ReferenceData::builtin())))
    }

    #[test]
    fn test_unknown_family_uses_default_parser() {
        let set = parser_set();
        assert_eq!(set.parser_for(Family::Unknown).family(), Family::Unknown);
    }

    #[test]
    fn test_structured_satisfaction_skips_later_passes() {
        // Structured data resolves every tool mandatory field; the text
        // carries a contradictory pattern price that must NOT be observed.
        let markup = r#"
            <script type="application/ld+json">
            {"@type": "Product", "name": "Tile Spacers", "sku": "100222333",
             "offers": {"price": "4.98"}}
            </script>
            <p>was $9.99 each</p>"#;
        let sections = PageSections::new("u").with_fetched(SECTION_MAIN, markup);

        let output = parser_set().extract(Family::InstallationTool, &sections);

        assert!(output.unresolved.is_empty());
        assert!(!output
            .observations
            .iter()
            .any(|o| o.value == "9.99"));
    }

    #[test]
    fn test_shortfall_is_reported_not_fatal() {
        let sections = PageSections::new("u").with_fetched(SECTION_MAIN, "<h1>Grout</h1>");
        let output = parser_set().extract(Family::Grout, &sections);

        assert!(output.unresolved.contains(&fields::SKU.to_string()));
        assert!(output.unresolved.contains(&fields::BOX_WEIGHT.to_string()));
    }

    #[test]
    fn test_empty_sections_resolve_nothing() {
        let sections = PageSections::new("u");
        let output = parser_set().extract(Family::Tile, &sections);

        assert!(output.observations.is_empty());
        assert_eq!(
            output.unresolved.len(),
            parser_set().parser_for(Family::Tile).mandatory_fields().len()
        );
    }
}
