//! Raw field observations and their canonical, collapsed form.
//!
//! Parsers emit [`RawFieldObservation`]s; several observations may describe
//! the same semantic field under different spellings. The normalizer
//! collapses them into [`CanonicalField`]s, at most one per canonical name.

use serde::{Deserialize, Serialize};

/// Well-known canonical field names.
///
/// The fixed columns of the product record key off these; everything else
/// flows into the open side-map.
pub mod fields {
    pub const SKU: &str = "sku";
    pub const TITLE: &str = "title";
    pub const CATEGORY: &str = "category";

    pub const PRICE_PER_SQFT: &str = "price_per_sqft";
    pub const PRICE_PER_BOX: &str = "price_per_box";
    pub const PRICE_EACH: &str = "price_each";

    pub const COVERAGE_SQFT: &str = "coverage_sqft";
    pub const DIMENSIONS: &str = "dimensions";
    pub const BOX_WEIGHT: &str = "box_weight";
    pub const PIECES_PER_BOX: &str = "pieces_per_box";
    pub const MATERIAL: &str = "material";

    pub const COLOR: &str = "color";
    pub const FINISH: &str = "finish";
    pub const ORIGIN: &str = "origin";
    pub const LENGTH_IN: &str = "length_in";
    pub const WEAR_LAYER_MIL: &str = "wear_layer_mil";
    pub const INSTALLATION_METHOD: &str = "installation_method";
}

/// Which extraction pass produced an observation.
///
/// Order here is the collapse priority: structured data beats pattern
/// matching, which beats heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourcePass {
    /// Embedded structured product data (JSON-LD, spec tables)
    Structured,
    /// Family-specific regex/pattern extraction
    Pattern,
    /// Generic fallback heuristics (labeled text, derived values)
    Heuristic,
}

impl SourcePass {
    /// Collapse priority; lower wins.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Structured => 0,
            Self::Pattern => 1,
            Self::Heuristic => 2,
        }
    }

    /// Short label for reports and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Pattern => "pattern",
            Self::Heuristic => "heuristic",
        }
    }
}

fn default_confidence() -> f32 {
    1.0
}

/// A single (field, value, pass, confidence) tuple from one extraction pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFieldObservation {
    /// Field name as the page spelled it (not yet canonicalized)
    pub field: String,

    /// Observed value, trimmed but otherwise verbatim
    pub value: String,

    /// Which pass produced the observation
    pub pass: SourcePass,

    /// Extraction confidence (0.0-1.0)
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

impl RawFieldObservation {
    /// Create an observation with full confidence.
    pub fn new(field: impl Into<String>, value: impl Into<String>, pass: SourcePass) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            pass,
            confidence: 1.0,
        }
    }

    /// Set the confidence score (clamped to [0, 1]).
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }
}

/// The collapsed, de-duplicated form of one semantic field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalField {
    /// Canonical field name (unique within a record)
    pub name: String,

    /// The chosen value
    pub value: String,

    /// The pass that won the collapse
    pub pass: SourcePass,

    /// Confidence of the winning observation
    pub confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_priority_order() {
        assert!(SourcePass::Structured.priority() < SourcePass::Pattern.priority());
        assert!(SourcePass::Pattern.priority() < SourcePass::Heuristic.priority());
    }

    #[test]
    fn test_confidence_clamping() {
        let high = RawFieldObservation::new("color", "Grey", SourcePass::Pattern)
            .with_confidence(1.5);
        assert_eq!(high.confidence, 1.0);

        let low = RawFieldObservation::new("color", "Grey", SourcePass::Pattern)
            .with_confidence(-0.2);
        assert_eq!(low.confidence, 0.0);
    }
}
