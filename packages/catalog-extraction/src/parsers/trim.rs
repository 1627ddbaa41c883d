//! Trim/molding family strategy.
//!
//! Linear goods: length matters more than area, containers are counted in
//! pieces, and installation guidelines are the expected resource.

use std::sync::Arc;

use crate::parsers::passes::{push_pattern, PatternLibrary};
use crate::parsers::FamilyParser;
use crate::types::observation::{fields, RawFieldObservation, SourcePass};
use crate::types::record::Family;
use crate::types::sections::PageSections;

const PATTERN_CONFIDENCE: f32 = 0.8;

/// Parser for trim and molding product pages.
pub struct TrimMoldingParser {
    patterns: Arc<PatternLibrary>,
}

impl TrimMoldingParser {
    pub fn new(patterns: Arc<PatternLibrary>) -> Self {
        Self { patterns }
    }
}

impl FamilyParser for TrimMoldingParser {
    fn family(&self) -> Family {
        Family::TrimMolding
    }

    fn mandatory_fields(&self) -> &'static [&'static str] {
        &[
            fields::TITLE,
            fields::SKU,
            fields::PRICE_EACH,
            fields::LENGTH_IN,
            fields::PIECES_PER_BOX,
        ]
    }

    fn relabel(&self, field: &str) -> Option<&'static str> {
        // Linear goods display a per-piece price
        (field == "price").then_some("priceEach")
    }

    fn pattern_pass(&self, sections: &PageSections) -> Vec<RawFieldObservation> {
        let text = sections.combined_text();
        let p = &self.patterns;
        let mut out = Vec::new();

        push_pattern(
            &mut out,
            "priceEach",
            p.capture_number(&p.money_each, &text),
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
            "sku",
            p.capture_number(&p.sku, &text),
            PATTERN_CONFIDENCE,
        );

        // Length emphasis: inches as displayed, feet converted
        if let Some(inches) = p.capture_number(&p.length_in, &text) {
            out.push(
                RawFieldObservation::new("lengthIn", inches, SourcePass::Pattern)
                    .with_confidence(PATTERN_CONFIDENCE),
            );
        } else if let Some(feet) = p.capture_number(&p.length_ft, &text) {
            if let Ok(feet) = feet.parse::<f64>() {
                out.push(
                    RawFieldObservation::new(
                        "lengthIn",
                        format_length(feet * 12.0),
                        SourcePass::Pattern,
                    )
                    .with_confidence(PATTERN_CONFIDENCE),
                );
            }
        }

        out
    }
}

fn format_length(inches: f64) -> String {
    if (inches - inches.round()).abs() < f64::EPSILON {
        format!("{}", inches.round() as i64)
    } else {
        format!("{inches:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sections::SECTION_MAIN;

    fn parse(markup: &str) -> Vec<RawFieldObservation> {
        let sections = PageSections::new("u").with_fetched(SECTION_MAIN, markup);
        TrimMoldingParser::new(Arc::new(PatternLibrary::new())).pattern_pass(&sections)
    }

    #[test]
    fn test_length_and_piece_count() {
        let observations = parse(
            "<p>Bullnose trim, 96 in. length</p><p>10 pieces per box</p><p>$12.48 each</p>",
        );

        let value = |f: &str| {
            observations
                .iter()
                .find(|o| o.field == f)
                .map(|o| o.value.as_str())
        };
        assert_eq!(value("lengthIn"), Some("96"));
        assert_eq!(value("piecesPerBox"), Some("10"));
        assert_eq!(value("priceEach"), Some("12.48"));
    }

    #[test]
    fn test_feet_convert_to_inches() {
        let observations = parse("<p>Stair nose, 8 ft. length</p>");
        assert!(observations
            .iter()
            .any(|o| o.field == "lengthIn" && o.value == "96"));
    }
}
