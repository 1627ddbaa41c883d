//! Page-family classification.
//!
//! Scores fetched content against per-family feature sets: keyword
//! presence in the main text, family-specific pricing/packaging phrasing,
//! and the shape of embedded structured product data. Pure function of the
//! section bundle; absence of signal yields `Unknown` with confidence 0
//! rather than an error.

use regex::Regex;

use crate::types::record::Family;
use crate::types::sections::PageSections;

/// Weight of one matched keyword.
const KEYWORD_WEIGHT: f32 = 1.0;
/// Weight of one matched family pattern.
const PATTERN_WEIGHT: f32 = 2.0;
/// Weight of one matched structured-data hint.
const STRUCTURED_WEIGHT: f32 = 3.0;

/// Saturation constant for confidence: score / (score + K). Keeps
/// confidence comparable between pages with and without embedded
/// structured data.
const CONFIDENCE_K: f32 = 4.0;

/// Result of classifying one section bundle.
///
/// Created once per run; immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    /// Winning family, or `Unknown` on low/ambiguous signal
    pub family: Family,

    /// Confidence in [0, 1]; 0 only when zero features matched
    pub confidence: f32,

    /// Count of matched features across all feature kinds
    pub matched_features: usize,
}

impl ClassificationResult {
    fn unknown() -> Self {
        Self {
            family: Family::Unknown,
            confidence: 0.0,
            matched_features: 0,
        }
    }
}

struct FamilyProfile {
    family: Family,
    keywords: &'static [&'static str],
    patterns: Vec<Regex>,
    structured_hints: &'static [&'static str],
}

impl FamilyProfile {
    fn new(
        family: Family,
        keywords: &'static [&'static str],
        patterns: &[&str],
        structured_hints: &'static [&'static str],
    ) -> Self {
        Self {
            family,
            keywords,
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("invalid family pattern"))
                .collect(),
            structured_hints,
        }
    }

}

/// Classifies a section bundle into one of the closed family set.
pub struct PageClassifier {
    profiles: Vec<FamilyProfile>,
    ld_json_pattern: Regex,
    confidence_floor: f32,
    tie_margin: f32,
}

impl Default for PageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PageClassifier {
    /// Create a classifier with default thresholds.
    pub fn new() -> Self {
        Self::with_thresholds(0.35, 0.05)
    }

    /// Create a classifier with an explicit confidence floor and tie margin.
    pub fn with_thresholds(confidence_floor: f32, tie_margin: f32) -> Self {
        let profiles = vec![
            FamilyProfile::new(
                Family::Tile,
                &[
                    "tile",
                    "porcelain",
                    "ceramic",
                    "mosaic",
                    "marble",
                    "travertine",
                    "pei rating",
                    "floor and wall",
                ],
                &[
                    r"(?i)sq\.?\s*ft\.?\s*(?:per|/)\s*(?:box|carton)",
                    r"(?i)\$\s*[\d,]+(?:\.\d+)?\s*/?\s*(?:per\s+)?sq\.?\s*ft",
                    r"(?i)\bpei\s*(?:rating|class)\b",
                ],
                &["tile", "porcelain", "ceramic", "stone"],
            ),
            FamilyProfile::new(
                Family::Grout,
                &[
                    "grout",
                    "sanded",
                    "unsanded",
                    "mortar",
                    "thinset",
                    "epoxy",
                    "working time",
                    "joint",
                ],
                &[
                    r"(?i)\b\d+(?:\.\d+)?\s*(?:lb|lbs|pound)s?\.?\s*(?:bag|pail|bucket|box)?",
                    r"(?i)\$\s*[\d,]+(?:\.\d+)?\s*/?\s*(?:per\s+)?(?:bag|pail)",
                    r"(?i)coverage\s+varies",
                ],
                &["grout", "mortar", "adhesive"],
            ),
            FamilyProfile::new(
                Family::TrimMolding,
                &[
                    "trim",
                    "molding",
                    "moulding",
                    "bullnose",
                    "quarter round",
                    "stair nose",
                    "transition",
                    "baseboard",
                ],
                &[
                    r"(?i)\b\d+(?:\.\d+)?\s*(?:in|ft)\.?\s*(?:length|long)\b",
                    r"(?i)\bpieces?\s*(?:per|/)\s*(?:box|carton)\b",
                    r"(?i)\blinear\s+f(?:oo|ee)t\b",
                ],
                &["trim", "molding"],
            ),
            FamilyProfile::new(
                Family::LuxuryVinyl,
                &[
                    "vinyl",
                    "luxury vinyl",
                    "plank",
                    "rigid core",
                    "wear layer",
                    "waterproof",
                    "click lock",
                    "spc",
                ],
                &[
                    r"(?i)\b\d+(?:\.\d+)?\s*mil\b",
                    r"(?i)\b(?:click|interlocking|floating|glue[\s-]?down)\b",
                    r"(?i)sq\.?\s*ft\.?\s*(?:per|/)\s*(?:box|carton)",
                ],
                &["vinyl", "plank", "flooring"],
            ),
            FamilyProfile::new(
                Family::InstallationTool,
                &[
                    "tool",
                    "trowel",
                    "spacer",
                    "cutter",
                    "blade",
                    "wet saw",
                    "mixing paddle",
                    "knee pads",
                ],
                &[
                    r"(?i)\$\s*[\d,]+(?:\.\d+)?\s*/?\s*(?:per\s+)?each",
                    r"(?i)\b(?:battery|corded|rpm|volt)\b",
                ],
                &["tool", "hardware"],
            ),
        ];

        Self {
            profiles,
            ld_json_pattern: Regex::new(
                r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
            )
            .expect("invalid ld+json pattern"),
            confidence_floor,
            tie_margin,
        }
    }

    /// Classify a section bundle.
    ///
    /// Never fails: zero signal or an ambiguous top pair yields `Unknown`.
    pub fn classify(&self, sections: &PageSections) -> ClassificationResult {
        if !sections.has_content() {
            return ClassificationResult::unknown();
        }

        let text = sections.combined_text().to_lowercase();
        let markup = self.combined_markup(sections);
        let structured = self.structured_text(&markup);

        let mut scored: Vec<(f32, usize, &FamilyProfile)> = self
            .profiles
            .iter()
            .map(|profile| {
                let (score, matched) = self.score(profile, &text, &markup, &structured);
                (score, matched, profile)
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let (top_score, top_matched, top_profile) = (scored[0].0, scored[0].1, scored[0].2);
        let second_score = scored[1].0;

        if top_matched == 0 {
            return ClassificationResult::unknown();
        }

        let confidence = top_score / (top_score + CONFIDENCE_K);

        // Ambiguity: top pair too close, or signal under the floor
        let tied = top_score - second_score <= self.tie_margin * top_score;
        if tied || confidence < self.confidence_floor {
            return ClassificationResult {
                family: Family::Unknown,
                confidence,
                matched_features: top_matched,
            };
        }

        ClassificationResult {
            family: top_profile.family,
            confidence,
            matched_features: top_matched,
        }
    }

    fn combined_markup(&self, sections: &PageSections) -> String {
        let mut out = String::new();
        for (_, section) in sections.healthy() {
            if let Some(markup) = section.markup() {
                out.push_str(markup);
                out.push('\n');
            }
        }
        out
    }

    /// Lowercased concatenation of embedded structured-data blocks.
    fn structured_text(&self, markup: &str) -> String {
        let mut out = String::new();
        for cap in self.ld_json_pattern.captures_iter(markup) {
            if let Some(body) = cap.get(1) {
                out.push_str(&body.as_str().to_lowercase());
                out.push('\n');
            }
        }
        out
    }

    fn score(
        &self,
        profile: &FamilyProfile,
        text: &str,
        markup: &str,
        structured: &str,
    ) -> (f32, usize) {
        let mut score = 0.0;
        let mut matched = 0;

        for keyword in profile.keywords {
            if text.contains(keyword) {
                score += KEYWORD_WEIGHT;
                matched += 1;
            }
        }

        for pattern in &profile.patterns {
            if pattern.is_match(text) || pattern.is_match(markup) {
                score += PATTERN_WEIGHT;
                matched += 1;
            }
        }

        if !structured.is_empty() && structured.contains("\"@type\"") {
            for hint in profile.structured_hints {
                if structured.contains(hint) {
                    score += STRUCTURED_WEIGHT;
                    matched += 1;
                }
            }
        }

        (score, matched)
    }
}
