//! Shared extraction passes and the compiled pattern library.
//!
//! Three pass kinds exist, in collapse priority order:
//! 1. structured - embedded JSON-LD product data, spec tables, definition
//!    lists (shared across families),
//! 2. pattern - family-specific regex extraction (each parser brings its
//!    own field selection from the shared [`PatternLibrary`]),
//! 3. heuristic - generic labeled-text capture and last-resort hex codes
//!    (shared across families).

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::types::observation::{RawFieldObservation, SourcePass};
use crate::types::sections::PageSections;

/// Confidence assigned to JSON-LD values.
const LD_JSON_CONFIDENCE: f32 = 1.0;
/// Confidence assigned to spec-table and definition-list values.
const TABLE_CONFIDENCE: f32 = 0.9;
/// Confidence assigned to the page heading as a title.
const HEADING_CONFIDENCE: f32 = 0.85;
/// Confidence assigned to labeled-line heuristics.
const LABEL_CONFIDENCE: f32 = 0.5;
/// Confidence assigned to a captured hex code standing in for a color.
const HEX_CONFIDENCE: f32 = 0.3;

/// Parse the leading number out of a displayed value ("10.98 sq. ft." ->
/// 10.98). Commas are treated as thousands separators.
pub fn parse_leading_number(value: &str) -> Option<f64> {
    let cleaned = value.trim().replace(',', "");
    let end = cleaned
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*c == '.' && *i > 0))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    cleaned[..end].parse().ok()
}

/// The embedded structured-data pass.
///
/// Walks every healthy section for JSON-LD product blocks, two-column
/// spec tables, and definition lists. Field names keep the page's own
/// spelling; the normalizer owns collapsing.
pub struct StructuredPass {
    ld_json: Selector,
    heading: Selector,
    row: Selector,
    cell: Selector,
    dt: Selector,
}

impl Default for StructuredPass {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredPass {
    /// Compile the selectors.
    pub fn new() -> Self {
        Self {
            ld_json: Selector::parse(r#"script[type="application/ld+json"]"#)
                .expect("invalid ld+json selector"),
            heading: Selector::parse("h1").expect("invalid heading selector"),
            row: Selector::parse("table tr").expect("invalid row selector"),
            cell: Selector::parse("th, td").expect("invalid cell selector"),
            dt: Selector::parse("dl dt").expect("invalid dt selector"),
        }
    }

    /// Run the pass over every healthy section.
    pub fn run(&self, sections: &PageSections) -> Vec<RawFieldObservation> {
        let mut out = Vec::new();
        for (_, section) in sections.healthy() {
            let Some(markup) = section.markup() else {
                continue;
            };
            let doc = Html::parse_document(markup);
            self.collect_ld_json(&doc, &mut out);
            self.collect_tables(&doc, &mut out);
            self.collect_definition_lists(&doc, &mut out);
            self.collect_heading(&doc, &mut out);
        }
        out
    }

    fn collect_ld_json(&self, doc: &Html, out: &mut Vec<RawFieldObservation>) {
        for el in doc.select(&self.ld_json) {
            let body: String = el.text().collect();
            match serde_json::from_str::<Value>(&body) {
                Ok(value) => walk_ld_value(&value, out),
                Err(e) => tracing::debug!(error = %e, "skipping malformed ld+json block"),
            }
        }
    }

    fn collect_tables(&self, doc: &Html, out: &mut Vec<RawFieldObservation>) {
        for row in doc.select(&self.row) {
            let cells: Vec<ElementRef> = row.select(&self.cell).collect();
            if cells.len() != 2 {
                continue;
            }
            let label = element_text(&cells[0]);
            let value = element_text(&cells[1]);
            if label.is_empty() || value.is_empty() {
                continue;
            }
            out.push(
                RawFieldObservation::new(label, value, SourcePass::Structured)
                    .with_confidence(TABLE_CONFIDENCE),
            );
        }
    }

    fn collect_definition_lists(&self, doc: &Html, out: &mut Vec<RawFieldObservation>) {
        for dt in doc.select(&self.dt) {
            let Some(dd) = dt
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == "dd")
            else {
                continue;
            };
            let label = element_text(&dt);
            let value = element_text(&dd);
            if label.is_empty() || value.is_empty() {
                continue;
            }
            out.push(
                RawFieldObservation::new(label, value, SourcePass::Structured)
                    .with_confidence(TABLE_CONFIDENCE),
            );
        }
    }

    fn collect_heading(&self, doc: &Html, out: &mut Vec<RawFieldObservation>) {
        if let Some(h1) = doc.select(&self.heading).next() {
            let text = element_text(&h1);
            if !text.is_empty() {
                out.push(
                    RawFieldObservation::new("name", text, SourcePass::Structured)
                        .with_confidence(HEADING_CONFIDENCE),
                );
            }
        }
    }
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Recurse through a JSON-LD value emitting product observations.
fn walk_ld_value(value: &Value, out: &mut Vec<RawFieldObservation>) {
    match value {
        Value::Array(items) => {
            for item in items {
                walk_ld_value(item, out);
            }
        }
        Value::Object(obj) => {
            if let Some(graph) = obj.get("@graph") {
                walk_ld_value(graph, out);
            }
            let is_product = obj
                .get("@type")
                .and_then(Value::as_str)
                .is_some_and(|t| t.eq_ignore_ascii_case("product"))
                || obj.contains_key("offers")
                || obj.contains_key("sku");
            if is_product {
                emit_product(obj, out);
            }
        }
        _ => {}
    }
}

fn emit_product(obj: &serde_json::Map<String, Value>, out: &mut Vec<RawFieldObservation>) {
    for key in ["name", "sku", "category", "color", "material"] {
        if let Some(text) = obj.get(key).and_then(scalar_text) {
            out.push(
                RawFieldObservation::new(key, text, SourcePass::Structured)
                    .with_confidence(LD_JSON_CONFIDENCE),
            );
        }
    }

    if let Some(brand) = obj.get("brand") {
        let text = scalar_text(brand).or_else(|| brand.get("name").and_then(scalar_text));
        if let Some(text) = text {
            out.push(
                RawFieldObservation::new("brand", text, SourcePass::Structured)
                    .with_confidence(LD_JSON_CONFIDENCE),
            );
        }
    }

    if let Some(offers) = obj.get("offers") {
        let offer = match offers {
            Value::Array(items) => items.first(),
            other => Some(other),
        };
        if let Some(offer) = offer {
            let price = offer
                .get("price")
                .or_else(|| offer.get("lowPrice"))
                .and_then(scalar_text);
            if let Some(price) = price {
                out.push(
                    RawFieldObservation::new("price", price, SourcePass::Structured)
                        .with_confidence(LD_JSON_CONFIDENCE),
                );
            }
        }
    }

    if let Some(Value::Array(props)) = obj.get("additionalProperty") {
        for prop in props {
            let name = prop.get("name").and_then(Value::as_str);
            let value = prop.get("value").and_then(scalar_text);
            if let (Some(name), Some(value)) = (name, value) {
                out.push(
                    RawFieldObservation::new(name, value, SourcePass::Structured)
                        .with_confidence(LD_JSON_CONFIDENCE),
                );
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The generic fallback pass: visually labeled values and a last-resort
/// hex-code capture.
pub struct HeuristicPass {
    label_line: Regex,
    hex: Regex,
}

impl Default for HeuristicPass {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicPass {
    /// Compile the heuristic patterns.
    pub fn new() -> Self {
        Self {
            label_line: Regex::new(r"(?m)^\s*([A-Za-z][A-Za-z .]{1,30}?)\s*:\s*(\S[^\r\n]{0,100}?)\s*$")
                .expect("invalid label pattern"),
            hex: Regex::new(r"#([0-9a-fA-F]{6})\b").expect("invalid hex pattern"),
        }
    }

    /// Run the pass over the rendered text of every healthy section.
    pub fn run(&self, sections: &PageSections) -> Vec<RawFieldObservation> {
        let mut out = Vec::new();
        for (_, section) in sections.healthy() {
            let Some(text) = section.rendered_text() else {
                continue;
            };

            for cap in self.label_line.captures_iter(&text) {
                let label = cap[1].trim();
                let value = cap[2].trim();
                if value.contains("://") || label.len() < 2 {
                    continue;
                }
                out.push(
                    RawFieldObservation::new(label, value, SourcePass::Heuristic)
                        .with_confidence(LABEL_CONFIDENCE),
                );
            }

            // Last resort: a swatch hex code can stand in for a color
            if let Some(cap) = self.hex.captures(&text) {
                out.push(
                    RawFieldObservation::new("color", format!("#{}", &cap[1]), SourcePass::Heuristic)
                        .with_confidence(HEX_CONFIDENCE),
                );
            }
        }
        out
    }
}

/// Compiled regexes shared by the family pattern passes.
///
/// Each family parser picks the patterns meaningful to it; the library
/// just keeps compilation in one place.
pub struct PatternLibrary {
    pub money_per_sqft: Regex,
    pub money_per_box: Regex,
    pub money_each: Regex,
    pub money_any: Regex,
    pub coverage: Regex,
    pub weight_lbs: Regex,
    pub dimensions: Regex,
    pub pieces_per_box: Regex,
    pub wear_mil: Regex,
    pub length_in: Regex,
    pub length_ft: Regex,
    pub sku: Regex,
    pub color_label: Regex,
    pub material: Regex,
    pub finish: Regex,
    pub origin: Regex,
    pub install_method: Regex,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternLibrary {
    /// Compile the library.
    pub fn new() -> Self {
        let compile = |p: &str| Regex::new(p).expect("invalid catalog pattern");
        Self {
            money_per_sqft: compile(r"(?i)\$\s*([\d,]+(?:\.\d+)?)\s*/?\s*(?:per\s+)?sq\.?\s*ft"),
            money_per_box: compile(
                r"(?i)\$\s*([\d,]+(?:\.\d+)?)\s*/?\s*(?:per\s+)?(?:box|carton|case)\b",
            ),
            money_each: compile(
                r"(?i)\$\s*([\d,]+(?:\.\d+)?)\s*(?:/\s*|\s+per\s+)?\s*(?:each|piece|bag|pail|unit)\b",
            ),
            money_any: compile(r"\$\s*([\d,]+(?:\.\d+)?)"),
            coverage: compile(
                r"(?i)\b([\d,]+(?:\.\d+)?)\s*sq\.?\s*ft\.?\s*(?:per|/)\s*(?:box|carton|case)\b",
            ),
            weight_lbs: compile(r"(?i)\b(\d+(?:\.\d+)?)\s*(?:lb|lbs|pound|pounds)\b"),
            dimensions: compile(
                r"(?i)\b(\d+(?:\.\d+)?\s*(?:in|ft|mm)?\.?\s*x\s*\d+(?:\.\d+)?\s*(?:in|ft|mm)\.?)",
            ),
            pieces_per_box: compile(
                r"(?i)\b(\d+)\s*(?:pieces?|pcs|planks?)\s*(?:per|/)\s*(?:box|carton|case)\b",
            ),
            wear_mil: compile(r"(?i)\b(\d+(?:\.\d+)?)\s*mil\b"),
            length_in: compile(r"(?i)\b(\d+(?:\.\d+)?)\s*(?:in|inch|inches)\.?\s*(?:length|long)\b"),
            length_ft: compile(r"(?i)\b(\d+(?:\.\d+)?)\s*(?:ft|foot|feet)\.?\s*(?:length|long)\b"),
            sku: compile(r"(?i)\b(?:sku|item|model|internet)\s*#?\s*:?\s*(\d{6,12})\b"),
            color_label: compile(r"(?i)\bcolou?r\s*:?\s+([A-Za-z]+(?: [A-Za-z]+)?)"),
            material: compile(
                r"(?i)\b(porcelain|ceramic|marble|travertine|limestone|granite|slate|quartzite|glass|vinyl|pvc|aluminum|stainless steel)\b",
            ),
            finish: compile(r"(?i)\b(polished|honed|matte|glossy|textured|tumbled|brushed|satin)\b"),
            origin: compile(r"(?i)\b(?:made in|country of origin\s*:?)\s+([A-Za-z]+(?: [A-Za-z]+)?)"),
            install_method: compile(
                r"(?i)\b(click[\s-]?lock|glue[\s-]?down|loose[\s-]?lay|floating|interlocking)\b",
            ),
        }
    }

    /// First numeric capture of `pattern` in `text`, commas stripped.
    pub fn capture_number(&self, pattern: &Regex, text: &str) -> Option<String> {
        pattern
            .captures(text)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().replace(',', ""))
    }

    /// First text capture of `pattern` in `text`, trimmed.
    pub fn capture_text(&self, pattern: &Regex, text: &str) -> Option<String> {
        pattern
            .captures(text)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().trim().to_string())
    }
}

/// Push a pattern observation when the capture succeeds.
pub fn push_pattern(
    out: &mut Vec<RawFieldObservation>,
    field: &str,
    value: Option<String>,
    confidence: f32,
) {
    if let Some(value) = value {
        out.push(
            RawFieldObservation::new(field, value, SourcePass::Pattern).with_confidence(confidence),
        );
    }
}

/// Derive a per-area price from container price and coverage when no
/// displayed per-area price exists.
///
/// Emitted at heuristic priority so a displayed price always outranks the
/// derived value.
pub fn derive_price_per_area(
    observations: &mut Vec<RawFieldObservation>,
    canon: &crate::normalize::Canonicalizer,
) {
    use crate::types::observation::fields;

    let mut has_per_area = false;
    let mut per_box: Option<f64> = None;
    let mut coverage: Option<f64> = None;

    for obs in observations.iter() {
        match canon.canonicalize(&obs.field).as_str() {
            fields::PRICE_PER_SQFT => has_per_area = true,
            fields::PRICE_PER_BOX => {
                per_box = per_box.or_else(|| parse_leading_number(&obs.value));
            }
            fields::COVERAGE_SQFT => {
                coverage = coverage.or_else(|| parse_leading_number(&obs.value));
            }
            _ => {}
        }
    }

    if has_per_area {
        return;
    }
    if let (Some(box_price), Some(coverage)) = (per_box, coverage) {
        if coverage > 0.0 {
            observations.push(
                RawFieldObservation::new(
                    "pricePerSqft",
                    format!("{:.2}", box_price / coverage),
                    SourcePass::Heuristic,
                )
                .with_confidence(0.4),
            );
        }
    }
}
