//! Final record assembly.
//!
//! Combines the fixed-schema values, the open side-map, and the verified
//! resource links into one immutable [`ProductRecord`], plus the
//! provenance report. Assembly always succeeds: a run with every
//! mandatory field missing still yields a record flagged `incomplete`,
//! because partial data is still useful for catalog presence tracking.

use indexmap::IndexMap;

use crate::classify::ClassificationResult;
use crate::normalize::NormalizedSpecs;
use crate::parsers::passes::parse_leading_number;
use crate::types::observation::fields;
use crate::types::provenance::ProvenanceReport;
use crate::types::record::{CoreSpecs, ProductPrices, ProductRecord, ResourceLink};

/// Canonical names with a fixed column on the record.
pub const FIXED_FIELDS: &[&str] = &[
    fields::SKU,
    fields::TITLE,
    fields::PRICE_PER_SQFT,
    fields::PRICE_PER_BOX,
    fields::PRICE_EACH,
    fields::COVERAGE_SQFT,
    fields::DIMENSIONS,
    fields::BOX_WEIGHT,
    fields::PIECES_PER_BOX,
    fields::MATERIAL,
];

/// Whether a canonical name maps to a fixed column (everything else goes
/// through the schema expander into the open side-map).
pub fn is_fixed_field(name: &str) -> bool {
    FIXED_FIELDS.contains(&name)
}

/// Inputs for one assembly.
pub struct AssembleInput<'a> {
    pub url: &'a str,
    pub content_hash: String,
    pub classification: ClassificationResult,
    pub specs: &'a NormalizedSpecs,
    pub unresolved: Vec<String>,
    pub attributes: IndexMap<String, String>,
    pub resources: Vec<ResourceLink>,
    pub failed_sections: Vec<String>,
    pub diagnostics: Vec<String>,
}

/// Builds the final record and its provenance report.
pub struct RecordAssembler;

impl RecordAssembler {
    /// Assemble a record; never fails.
    pub fn assemble(input: AssembleInput<'_>) -> (ProductRecord, ProvenanceReport) {
        let specs = input.specs;

        let prices = ProductPrices {
            per_area: number_of(specs, fields::PRICE_PER_SQFT),
            per_container: number_of(specs, fields::PRICE_PER_BOX),
            per_unit: number_of(specs, fields::PRICE_EACH),
        };

        let core = CoreSpecs {
            coverage_sqft: number_of(specs, fields::COVERAGE_SQFT),
            dimensions: text_of(specs, fields::DIMENSIONS),
            box_weight_lbs: number_of(specs, fields::BOX_WEIGHT),
            pieces_per_container: number_of(specs, fields::PIECES_PER_BOX)
                .map(|n| n.round() as u32),
            material: text_of(specs, fields::MATERIAL),
        };

        let record = ProductRecord {
            sku: text_of(specs, fields::SKU),
            url: input.url.to_string(),
            title: text_of(specs, fields::TITLE),
            family: input.classification.family,
            prices,
            core,
            attributes: input.attributes,
            resources: input.resources,
            content_hash: input.content_hash,
            incomplete: !input.unresolved.is_empty(),
        };

        let mut report = ProvenanceReport {
            family: input.classification.family,
            family_confidence: input.classification.confidence,
            matched_features: input.classification.matched_features,
            unresolved: input.unresolved,
            discarded: specs.discarded.clone(),
            failed_sections: input.failed_sections,
            diagnostics: input.diagnostics,
            ..Default::default()
        };
        for (name, field) in &specs.fields {
            report.record_field(name.clone(), field.pass, field.confidence);
        }

        (record, report)
    }
}

fn text_of(specs: &NormalizedSpecs, name: &str) -> Option<String> {
    specs.value(name).map(String::from)
}

fn number_of(specs: &NormalizedSpecs, name: &str) -> Option<f64> {
    specs.value(name).and_then(parse_leading_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::observation::{CanonicalField, SourcePass};
    use crate::types::record::Family;

    fn specs_with(entries: &[(&str, &str)]) -> NormalizedSpecs {
        let mut specs = NormalizedSpecs::default();
        for (name, value) in entries {
            specs.fields.insert(
                name.to_string(),
                CanonicalField {
                    name: name.to_string(),
                    value: value.to_string(),
                    pass: SourcePass::Structured,
                    confidence: 1.0,
                },
            );
        }
        specs
    }

    fn classification(family: Family) -> ClassificationResult {
        ClassificationResult {
            family,
            confidence: 0.8,
            matched_features: 4,
        }
    }

    #[test]
    fn test_fixed_columns_populated() {
        let specs = specs_with(&[
            ("sku", "100456789"),
            ("title", "Calacatta Porcelain Tile"),
            ("price_per_box", "287.04"),
            ("coverage_sqft", "10.98"),
            ("material", "Porcelain"),
        ]);

        let (record, report) = RecordAssembler::assemble(AssembleInput {
            url: "https://catalog.example/p/100456789",
            content_hash: "h".to_string(),
            classification: classification(Family::Tile),
            specs: &specs,
            unresolved: vec![],
            attributes: IndexMap::new(),
            resources: vec![],
            failed_sections: vec![],
            diagnostics: vec![],
        });

        assert_eq!(record.sku.as_deref(), Some("100456789"));
        assert_eq!(record.prices.per_container, Some(287.04));
        assert_eq!(record.core.coverage_sqft, Some(10.98));
        assert!(!record.incomplete);
        assert_eq!(report.fields.len(), 5);
    }

    #[test]
    fn test_all_missing_still_yields_record() {
        let specs = NormalizedSpecs::default();
        let (record, report) = RecordAssembler::assemble(AssembleInput {
            url: "https://catalog.example/p/1",
            content_hash: "h".to_string(),
            classification: ClassificationResult {
                family: Family::Unknown,
                confidence: 0.0,
                matched_features: 0,
            },
            specs: &specs,
            unresolved: vec!["title".to_string(), "sku".to_string()],
            attributes: IndexMap::new(),
            resources: vec![],
            failed_sections: vec!["main".to_string()],
            diagnostics: vec!["classification failed: no healthy sections".to_string()],
        });

        assert!(record.incomplete);
        assert_eq!(record.family, Family::Unknown);
        assert!(record.sku.is_none());
        assert_eq!(report.unresolved.len(), 2);
        assert_eq!(report.failed_sections, vec!["main"]);
    }

    #[test]
    fn test_is_fixed_field() {
        assert!(is_fixed_field("price_per_box"));
        assert!(!is_fixed_field("color"));
        assert!(!is_fixed_field("shade_variation"));
    }
}
