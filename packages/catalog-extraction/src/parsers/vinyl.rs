//! Luxury vinyl family strategy.
//!
//! Plank/resilient flooring: wear-layer thickness, installation method
//! (click-lock vs. adhered), and coverage-based box pricing.

use std::sync::Arc;

use crate::normalize::Canonicalizer;
use crate::parsers::passes::{derive_price_per_area, push_pattern, PatternLibrary};
use crate::parsers::FamilyParser;
use crate::types::observation::{fields, RawFieldObservation};
use crate::types::record::Family;
use crate::types::sections::PageSections;

const PATTERN_CONFIDENCE: f32 = 0.8;

/// Parser for luxury vinyl plank/tile product pages.
pub struct LuxuryVinylParser {
    patterns: Arc<PatternLibrary>,
}

impl LuxuryVinylParser {
    pub fn new(patterns: Arc<PatternLibrary>) -> Self {
        Self { patterns }
    }
}

impl FamilyParser for LuxuryVinylParser {
    fn family(&self) -> Family {
        Family::LuxuryVinyl
    }

    fn mandatory_fields(&self) -> &'static [&'static str] {
        &[
            fields::TITLE,
            fields::SKU,
            fields::PRICE_PER_BOX,
            fields::COVERAGE_SQFT,
            fields::WEAR_LAYER_MIL,
        ]
    }

    fn relabel(&self, field: &str) -> Option<&'static str> {
        (field == "price").then_some("pricePerBox")
    }

    fn pattern_pass(&self, sections: &PageSections) -> Vec<RawFieldObservation> {
        let text = sections.combined_text();
        let p = &self.patterns;
        let mut out = Vec::new();

        push_pattern(
            &mut out,
            "pricePerBox",
            p.capture_number(&p.money_per_box, &text),
            PATTERN_CONFIDENCE,
        );
        push_pattern(
            &mut out,
            "pricePerSqft",
            p.capture_number(&p.money_per_sqft, &text),
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
            "wearLayerMil",
            p.capture_number(&p.wear_mil, &text),
            PATTERN_CONFIDENCE,
        );
        push_pattern(
            &mut out,
            "installationMethod",
            p.capture_text(&p.install_method, &text),
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
            "piecesPerBox",
            p.capture_number(&p.pieces_per_box, &text),
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
        LuxuryVinylParser::new(Arc::new(PatternLibrary::new())).pattern_pass(&sections)
    }

    #[test]
    fn test_wear_layer_and_install_method() {
        let observations = parse(
            "<p>$69.30 per box</p><p>23.77 sq. ft. per box</p>\
             <p>20 mil wear layer, click-lock installation</p>",
        );

        let value = |f: &str| {
            observations
                .iter()
                .find(|o| o.field == f)
                .map(|o| o.value.as_str())
        };
        assert_eq!(value("pricePerBox"), Some("69.30"));
        assert_eq!(value("coverageSqft"), Some("23.77"));
        assert_eq!(value("wearLayerMil"), Some("20"));
        assert_eq!(value("installationMethod"), Some("click-lock"));
    }
}
