//! Installation tool family strategy.
//!
//! Discrete tools/accessories: single-unit pricing, dimensional and
//! weight specs, minimal resource expectations.

use std::sync::Arc;

use crate::parsers::passes::{push_pattern, PatternLibrary};
use crate::parsers::FamilyParser;
use crate::types::observation::{fields, RawFieldObservation};
use crate::types::record::Family;
use crate::types::sections::PageSections;

const PATTERN_CONFIDENCE: f32 = 0.8;
/// A bare displayed price with no unit word is still usable for tools.
const BARE_PRICE_CONFIDENCE: f32 = 0.6;

/// Parser for tool/accessory product pages.
pub struct InstallationToolParser {
    patterns: Arc<PatternLibrary>,
}

impl InstallationToolParser {
    pub fn new(patterns: Arc<PatternLibrary>) -> Self {
        Self { patterns }
    }
}

impl FamilyParser for InstallationToolParser {
    fn family(&self) -> Family {
        Family::InstallationTool
    }

    fn mandatory_fields(&self) -> &'static [&'static str] {
        &[fields::TITLE, fields::SKU, fields::PRICE_EACH]
    }

    fn relabel(&self, field: &str) -> Option<&'static str> {
        (field == "price").then_some("priceEach")
    }

    fn pattern_pass(&self, sections: &PageSections) -> Vec<RawFieldObservation> {
        let text = sections.combined_text();
        let p = &self.patterns;
        let mut out = Vec::new();

        if let Some(price) = p.capture_number(&p.money_each, &text) {
            push_pattern(&mut out, "priceEach", Some(price), PATTERN_CONFIDENCE);
        } else {
            push_pattern(
                &mut out,
                "priceEach",
                p.capture_number(&p.money_any, &text),
                BARE_PRICE_CONFIDENCE,
            );
        }

        push_pattern(
            &mut out,
            "dimensions",
            p.capture_text(&p.dimensions, &text),
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
            "sku",
            p.capture_number(&p.sku, &text),
            PATTERN_CONFIDENCE,
        );

        out
    }
}
