//! The normalized product record and its parts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Closed set of structurally distinct page families in the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    /// Slab/tile goods priced by coverage area
    Tile,
    /// Bagged/weighted goods (grout, mortar) priced per container
    Grout,
    /// Linear trim and molding priced per piece
    TrimMolding,
    /// Plank/resilient flooring priced per covered box
    LuxuryVinyl,
    /// Discrete tools and accessories priced per unit
    InstallationTool,
    /// Classification failed or was ambiguous
    #[default]
    Unknown,
}

impl Family {
    /// All classifiable families (excludes `Unknown`).
    pub const CLASSIFIABLE: [Family; 5] = [
        Family::Tile,
        Family::Grout,
        Family::TrimMolding,
        Family::LuxuryVinyl,
        Family::InstallationTool,
    ];

    /// Short label for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tile => "tile",
            Self::Grout => "grout",
            Self::TrimMolding => "trim_molding",
            Self::LuxuryVinyl => "luxury_vinyl",
            Self::InstallationTool => "installation_tool",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Up to three price representations for one product.
///
/// All optional and mutually non-exclusive: a tile box carries both a
/// per-square-foot and a per-box price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPrices {
    /// Price per covered area (USD per square foot)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_area: Option<f64>,

    /// Price per container (box, bag, carton)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_container: Option<f64>,

    /// Price per discrete unit/piece
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_unit: Option<f64>,
}

impl ProductPrices {
    /// Whether any price representation is present.
    pub fn any(&self) -> bool {
        self.per_area.is_some() || self.per_container.is_some() || self.per_unit.is_some()
    }
}

/// The fixed core specification set shared across families.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreSpecs {
    /// Covered area per container (square feet)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_sqft: Option<f64>,

    /// Nominal dimensions as displayed (e.g. `12 in. x 24 in.`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,

    /// Container weight in pounds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_weight_lbs: Option<f64>,

    /// Pieces per container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pieces_per_container: Option<u32>,

    /// Primary material (porcelain, ceramic, marble, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

/// Auxiliary document categories the catalog publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    SafetyDataSheet,
    TechnicalDataSheet,
    SellSheet,
    InstallationGuide,
    WarrantyDocument,
}

/// A verified auxiliary document link attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    /// Document category
    pub kind: DocumentKind,

    /// Display title
    pub title: String,

    /// Absolute URL
    pub url: String,

    /// True once a reachability check succeeded; unverified candidates are
    /// never attached
    pub verified: bool,
}

/// The final, immutable output of one pipeline run.
///
/// Re-extraction of the same URL produces a new record that replaces the
/// prior one wholesale (upsert by URL); there is no partial merge. The
/// record carries no wall-clock timestamps so identical section content
/// always yields byte-identical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Catalog SKU, when the page disclosed one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// Canonical product URL (upsert key)
    pub url: String,

    /// Product title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Resolved page family
    pub family: Family,

    /// Price representations
    pub prices: ProductPrices,

    /// Fixed core specification set
    pub core: CoreSpecs,

    /// Open side-map of canonical fields without a fixed column,
    /// keyed by canonical name, insertion-ordered for determinism
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// Verified auxiliary documents
    #[serde(default)]
    pub resources: Vec<ResourceLink>,

    /// Hash of the section content this record was extracted from
    pub content_hash: String,

    /// Set when mandatory family fields are missing; the record is still
    /// useful for catalog presence tracking
    pub incomplete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_labels() {
        assert_eq!(Family::Tile.label(), "tile");
        assert_eq!(Family::LuxuryVinyl.label(), "luxury_vinyl");
        assert_eq!(Family::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_classifiable_excludes_unknown() {
        assert!(!Family::CLASSIFIABLE.contains(&Family::Unknown));
        assert_eq!(Family::CLASSIFIABLE.len(), 5);
    }

    #[test]
    fn test_prices_any() {
        assert!(!ProductPrices::default().any());
        let prices = ProductPrices {
            per_container: Some(287.04),
            ..Default::default()
        };
        assert!(prices.any());
    }

    #[test]
    fn test_record_serialization_is_stable() {
        let mut attributes = IndexMap::new();
        attributes.insert("color".to_string(), "Grey".to_string());
        attributes.insert("finish".to_string(), "Matte".to_string());

        let record = ProductRecord {
            sku: Some("100456789".to_string()),
            url: "https://catalog.example/p/100456789".to_string(),
            title: Some("Porcelain Tile".to_string()),
            family: Family::Tile,
            prices: ProductPrices::default(),
            core: CoreSpecs::default(),
            attributes,
            resources: vec![],
            content_hash: "abc".to_string(),
            incomplete: false,
        };

        let a = serde_json::to_string(&record).unwrap();
        let b = serde_json::to_string(&record.clone()).unwrap();
        assert_eq!(a, b);
        // insertion order preserved
        assert!(a.find("color").unwrap() < a.find("finish").unwrap());
    }
}
