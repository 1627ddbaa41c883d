//! Tile family strategy.
//!
//! Slab/tile goods price by coverage area and carry material, origin, and
//! finish attributes. Natural-stone tiles are additionally eligible for a
//! safety data sheet, which the resolver gates on the material field.

use std::sync::Arc;

use crate::normalize::Canonicalizer;
use crate::parsers::passes::{derive_price_per_area, push_pattern, PatternLibrary};
use crate::parsers::FamilyParser;
use crate::types::observation::{fields, RawFieldObservation};
use crate::types::record::Family;
use crate::types::sections::PageSections;

const PATTERN_CONFIDENCE: f32 = 0.8;

/// Parser for slab/tile product pages.
pub struct TileParser {
    patterns: Arc<PatternLibrary>,
}

impl TileParser {
    pub fn new(patterns: Arc<PatternLibrary>) -> Self {
        Self { patterns }
    }
}

impl FamilyParser for TileParser {
    fn family(&self) -> Family {
        Family::Tile
    }

    fn mandatory_fields(&self) -> &'static [&'static str] {
        &[
            fields::TITLE,
            fields::SKU,
            fields::PRICE_PER_BOX,
            fields::COVERAGE_SQFT,
            fields::MATERIAL,
        ]
    }

    fn relabel(&self, field: &str) -> Option<&'static str> {
        // A boxed good's displayed price is the per-box price
        (field == "price").then_some("pricePerBox")
    }

    fn pattern_pass(&self, sections: &PageSections) -> Vec<RawFieldObservation> {
        let text = sections.combined_text();
        let p = &self.patterns;
        let mut out = Vec::new();

        push_pattern(
            &mut out,
            "pricePerSqft",
            p.capture_number(&p.money_per_sqft, &text),
            PATTERN_CONFIDENCE,
        );
        push_pattern(
            &mut out,
            "pricePerBox",
            p.capture_number(&p.money_per_box, &text),
            PATTERN_CONFIDENCE,
        );
        push_pattern(
            &mut out,
            "coverageSqft",
            p.capture_number(&p.coverage, &text),
            PATTERN_CONFIDENCE,
        );
        push_pattern(
            &mut out,
            "dimensions",
            p.capture_text(&p.dimensions, &text),
            PATTERN_CONFIDENCE,
        );
        push_pattern(
            &mut out,
            "material",
            p.capture_text(&p.material, &text),
            PATTERN_CONFIDENCE,
        );
        push_pattern(
            &mut out,
            "finish",
            p.capture_text(&p.finish, &text),
            PATTERN_CONFIDENCE,
        );
        push_pattern(
            &mut out,
            "origin",
            p.capture_text(&p.origin, &text),
            PATTERN_CONFIDENCE,
        );
        push_pattern(
            &mut out,
            "sku",
            p.capture_number(&p.sku, &text),
            PATTERN_CONFIDENCE,
        );

        out
    }

    fn finish(&self, observations: &mut Vec<RawFieldObservation>, canon: &Canonicalizer) {
        derive_price_per_area(observations, canon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sections::SECTION_MAIN;

    fn parse(markup: &str) -> Vec<RawFieldObservation> {
        let sections = PageSections::new("u").with_fetched(SECTION_MAIN, markup);
        TileParser::new(Arc::new(PatternLibrary::new())).pattern_pass(&sections)
    }

    #[test]
    fn test_coverage_and_box_price() {
        let observations = parse(
            "<p>$287.04 per Box</p><p>10.98 sq. ft. per Box</p>\
             <p>Honed Marble, Made in Italy</p><p>Item # 100456789</p>",
        );

        let value = |f: &str| {
            observations
                .iter()
                .find(|o| o.field == f)
                .map(|o| o.value.as_str())
        };
        assert_eq!(value("pricePerBox"), Some("287.04"));
        assert_eq!(value("coverageSqft"), Some("10.98"));
        assert_eq!(value("material"), Some("Marble"));
        assert_eq!(value("finish"), Some("Honed"));
        assert_eq!(value("origin"), Some("Italy"));
        assert_eq!(value("sku"), Some("100456789"));
    }

    #[test]
    fn test_per_sqft_price() {
        let observations = parse("<p>$4.29 /sq. ft.</p>");
        assert!(observations
            .iter()
            .any(|o| o.field == "pricePerSqft" && o.value == "4.29"));
    }

    #[test]
    fn test_nothing_is_fabricated() {
        let observations = parse("<p>A lovely product.</p>");
        assert!(observations.is_empty());
    }
}
