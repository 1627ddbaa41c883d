//! Externally editable reference data.
//!
//! The catalog's vocabulary drifts: new attribute spellings appear and
//! document layouts move. The alias table and the family→document mapping
//! are therefore versioned data loaded at pipeline construction, not
//! compiled constants. A built-in default covers the known vocabulary so
//! the pipeline works out of the box.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};
use crate::types::observation::fields;
use crate::types::record::{DocumentKind, Family};

/// A candidate auxiliary document for one family.
///
/// `path_template` is joined against the product URL origin with `{sku}`
/// and `{slug}` substituted; the resolver never constructs URLs any other
/// way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTemplate {
    /// Document category
    pub kind: DocumentKind,

    /// Display title for the resulting link
    pub title: String,

    /// Origin-relative path template, e.g. `/resources/sds/{sku}.pdf`
    pub path_template: String,

    /// When set, the record's material must contain one of these
    /// substrings (case-insensitive) for the candidate to apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_material: Option<Vec<String>>,
}

impl DocumentTemplate {
    /// Create a template without a material gate.
    pub fn new(kind: DocumentKind, title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            path_template: path.into(),
            requires_material: None,
        }
    }

    /// Gate the template on material substrings.
    pub fn requiring_material(
        mut self,
        materials: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.requires_material = Some(materials.into_iter().map(Into::into).collect());
        self
    }

    /// Whether the gate (if any) admits the given material.
    pub fn admits_material(&self, material: Option<&str>) -> bool {
        match &self.requires_material {
            None => true,
            Some(required) => material.is_some_and(|m| {
                let m = m.to_lowercase();
                required.iter().any(|r| m.contains(&r.to_lowercase()))
            }),
        }
    }
}

/// Versioned reference data injected into the pipeline at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Monotonic data version; bumped on every edit
    pub version: u32,

    /// Alias table: canonical-key spelling → canonical field name
    pub aliases: HashMap<String, String>,

    /// Family → candidate document templates
    pub documents: HashMap<Family, Vec<DocumentTemplate>>,
}

impl ReferenceData {
    /// The built-in vocabulary for the current catalog.
    pub fn builtin() -> Self {
        let mut aliases = HashMap::new();
        for (alias, canonical) in [
            // identity
            ("item", fields::SKU),
            ("item_number", fields::SKU),
            ("internet_number", fields::SKU),
            ("product_name", fields::TITLE),
            ("name", fields::TITLE),
            ("product_type", fields::CATEGORY),
            // prices; bare "price" is the displayed unit price
            ("price", fields::PRICE_EACH),
            ("unit_price", fields::PRICE_EACH),
            ("price_per_piece", fields::PRICE_EACH),
            ("price_per_square_foot", fields::PRICE_PER_SQFT),
            ("price_sq_ft", fields::PRICE_PER_SQFT),
            ("price_per_carton", fields::PRICE_PER_BOX),
            ("box_price", fields::PRICE_PER_BOX),
            // packaging
            ("coverage", fields::COVERAGE_SQFT),
            ("sq_ft_per_box", fields::COVERAGE_SQFT),
            ("sq_ft_per_carton", fields::COVERAGE_SQFT),
            ("weight", fields::BOX_WEIGHT),
            ("net_weight", fields::BOX_WEIGHT),
            ("package_weight", fields::BOX_WEIGHT),
            ("pieces_per_carton", fields::PIECES_PER_BOX),
            ("pcs_per_box", fields::PIECES_PER_BOX),
            ("box_quantity", fields::PIECES_PER_BOX),
            // attributes
            ("colour", fields::COLOR),
            ("shade", fields::COLOR),
            ("finish_type", fields::FINISH),
            ("country_of_origin", fields::ORIGIN),
            ("made_in", fields::ORIGIN),
            ("material_type", fields::MATERIAL),
            ("length", fields::LENGTH_IN),
            ("wear_layer", fields::WEAR_LAYER_MIL),
            ("wear_layer_thickness", fields::WEAR_LAYER_MIL),
            ("install_method", fields::INSTALLATION_METHOD),
            ("installation_type", fields::INSTALLATION_METHOD),
        ] {
            aliases.insert(alias.to_string(), canonical.to_string());
        }

        let natural_stone = [
            "marble",
            "travertine",
            "limestone",
            "granite",
            "slate",
            "natural stone",
        ];

        let mut documents = HashMap::new();
        documents.insert(
            Family::Tile,
            vec![DocumentTemplate::new(
                DocumentKind::SafetyDataSheet,
                "Safety Data Sheet",
                "/resources/sds/{sku}.pdf",
            )
            .requiring_material(natural_stone)],
        );
        documents.insert(
            Family::Grout,
            vec![
                DocumentTemplate::new(
                    DocumentKind::SafetyDataSheet,
                    "Safety Data Sheet",
                    "/resources/sds/{sku}.pdf",
                ),
                DocumentTemplate::new(
                    DocumentKind::TechnicalDataSheet,
                    "Technical Data Sheet",
                    "/resources/tds/{sku}.pdf",
                ),
                DocumentTemplate::new(
                    DocumentKind::SellSheet,
                    "Sell Sheet",
                    "/resources/sell-sheets/{sku}.pdf",
                ),
            ],
        );
        documents.insert(
            Family::TrimMolding,
            vec![DocumentTemplate::new(
                DocumentKind::InstallationGuide,
                "Installation Guidelines",
                "/resources/install/{sku}.pdf",
            )],
        );
        documents.insert(
            Family::LuxuryVinyl,
            vec![
                DocumentTemplate::new(
                    DocumentKind::InstallationGuide,
                    "Installation Guidelines",
                    "/resources/install/{sku}.pdf",
                ),
                DocumentTemplate::new(
                    DocumentKind::WarrantyDocument,
                    "Warranty",
                    "/resources/warranty/{sku}.pdf",
                ),
            ],
        );
        // Tools carry no document expectations
        documents.insert(Family::InstallationTool, vec![]);

        Self {
            version: 1,
            aliases,
            documents,
        }
    }

    /// Load reference data from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: Self =
            serde_json::from_str(json).map_err(|e| ExtractionError::ReferenceData {
                reason: format!("invalid reference data JSON: {e}"),
            })?;
        data.validate()?;
        Ok(data)
    }

    /// Load reference data from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ExtractionError::ReferenceData {
                reason: format!("cannot read {}: {e}", path.as_ref().display()),
            }
        })?;
        Self::from_json_str(&json)
    }

    /// Canonical field name for an alias key, if one is mapped.
    pub fn alias_for(&self, key: &str) -> Option<&str> {
        self.aliases.get(key).map(String::as_str)
    }

    /// Candidate documents for a family.
    pub fn documents_for(&self, family: Family) -> &[DocumentTemplate] {
        self.documents.get(&family).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check internal consistency of the alias table.
    ///
    /// A canonical name that itself appears as an alias key pointing at a
    /// *different* name means the table has diverged: two spellings of one
    /// concept would land in different slots. That is the schema-conflict
    /// condition and must be corrected in the data, not resolved silently.
    pub fn validate(&self) -> Result<()> {
        if self.version == 0 {
            return Err(ExtractionError::ReferenceData {
                reason: "reference data version must be >= 1".to_string(),
            });
        }
        for (alias, canonical) in &self.aliases {
            if let Some(target) = self.aliases.get(canonical) {
                if target != canonical {
                    return Err(ExtractionError::SchemaConflict {
                        existing: target.clone(),
                        incoming: format!("{alias} -> {canonical}"),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let data = ReferenceData::builtin();
        assert!(data.validate().is_ok());
        assert_eq!(data.alias_for("weight"), Some("box_weight"));
        assert_eq!(data.alias_for("no_such_alias"), None);
    }

    #[test]
    fn test_material_gate() {
        let data = ReferenceData::builtin();
        let tile_docs = data.documents_for(Family::Tile);
        assert_eq!(tile_docs.len(), 1);

        assert!(tile_docs[0].admits_material(Some("Carrara Marble")));
        assert!(!tile_docs[0].admits_material(Some("Porcelain")));
        assert!(!tile_docs[0].admits_material(None));
    }

    #[test]
    fn test_tool_family_has_minimal_documents() {
        let data = ReferenceData::builtin();
        assert!(data.documents_for(Family::InstallationTool).is_empty());
        assert!(data.documents_for(Family::Unknown).is_empty());
    }

    #[test]
    fn test_round_trip_through_json() {
        let data = ReferenceData::builtin();
        let json = serde_json::to_string(&data).unwrap();
        let loaded = ReferenceData::from_json_str(&json).unwrap();
        assert_eq!(loaded.version, data.version);
        assert_eq!(loaded.aliases.len(), data.aliases.len());
    }

    #[test]
    fn test_diverged_alias_table_is_a_schema_conflict() {
        let mut data = ReferenceData::builtin();
        // "box_weight" is a canonical name; re-aliasing it elsewhere diverges
        data.aliases
            .insert("box_weight".to_string(), "package_mass".to_string());

        assert!(matches!(
            data.validate(),
            Err(ExtractionError::SchemaConflict { .. })
        ));
    }
}
