//! Grout family strategy.
//!
//! Bagged/weighted goods: package weight drives sizing, color is the
//! primary differentiator, and the resource set is the richest of any
//! family (safety sheet, data sheet, sell sheet).

use std::sync::Arc;

use crate::parsers::passes::{push_pattern, PatternLibrary};
use crate::parsers::FamilyParser;
use crate::types::observation::{fields, RawFieldObservation};
use crate::types::record::Family;
use crate::types::sections::PageSections;

const PATTERN_CONFIDENCE: f32 = 0.8;

/// Parser for grout/mortar product pages.
pub struct GroutParser {
    patterns: Arc<PatternLibrary>,
}

impl GroutParser {
    pub fn new(patterns: Arc<PatternLibrary>) -> Self {
        Self { patterns }
    }
}

impl FamilyParser for GroutParser {
    fn family(&self) -> Family {
        Family::Grout
    }

    fn mandatory_fields(&self) -> &'static [&'static str] {
        &[
            fields::TITLE,
            fields::SKU,
            fields::PRICE_EACH,
            fields::BOX_WEIGHT,
            fields::COLOR,
        ]
    }

    fn relabel(&self, field: &str) -> Option<&'static str> {
        // Weighted goods display a per-bag/pail unit price
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
            "boxWeight",
            p.capture_number(&p.weight_lbs, &text),
            PATTERN_CONFIDENCE,
        );
        push_pattern(
            &mut out,
            "color",
            p.capture_text(&p.color_label, &text),
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
}
