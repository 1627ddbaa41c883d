//! Named page sections delivered by the fetch collaborator.
//!
//! A product page is fetched as independent logical sections ("main",
//! "specifications", "resources"). Each section succeeds or fails on its
//! own; the pipeline proceeds with whatever arrived. The bundle is owned by
//! a single run and discarded after assembly.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::html::html_to_text;

/// The primary page body.
pub const SECTION_MAIN: &str = "main";
/// The specifications tab/table.
pub const SECTION_SPECIFICATIONS: &str = "specifications";
/// The resources/documents tab.
pub const SECTION_RESOURCES: &str = "resources";

/// One independently fetched section of a product page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Section {
    /// Section content arrived.
    Fetched {
        /// Raw markup for the section
        markup: String,
        /// Optional pre-rendered plain text; rendered lazily when absent
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    /// Section fetch failed; the reason is kept for the provenance report.
    Failed { reason: String },
}

impl Section {
    /// Create a fetched section from raw markup.
    pub fn fetched(markup: impl Into<String>) -> Self {
        Self::Fetched {
            markup: markup.into(),
            text: None,
        }
    }

    /// Create a fetched section with a pre-rendered text body.
    pub fn fetched_with_text(markup: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Fetched {
            markup: markup.into(),
            text: Some(text.into()),
        }
    }

    /// Create a failed section.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Whether the section fetch succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }

    /// Raw markup, if the section arrived.
    pub fn markup(&self) -> Option<&str> {
        match self {
            Self::Fetched { markup, .. } => Some(markup),
            Self::Failed { .. } => None,
        }
    }

    /// Plain-text rendering, if the section arrived.
    ///
    /// Uses the stored rendering when the fetcher supplied one, otherwise
    /// renders from markup.
    pub fn rendered_text(&self) -> Option<String> {
        match self {
            Self::Fetched {
                text: Some(text), ..
            } => Some(text.clone()),
            Self::Fetched { markup, text: None } => Some(html_to_text(markup)),
            Self::Failed { .. } => None,
        }
    }

    /// Failure reason, if the section did not arrive.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason } => Some(reason),
            Self::Fetched { .. } => None,
        }
    }
}

/// The per-run bundle of named sections for one product URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSections {
    /// Canonical product URL the sections belong to
    pub url: String,

    /// When the bundle was assembled
    pub fetched_at: DateTime<Utc>,

    sections: IndexMap<String, Section>,
}

impl PageSections {
    /// Create an empty bundle for a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fetched_at: Utc::now(),
            sections: IndexMap::new(),
        }
    }

    /// Add a fetched section (builder pattern).
    pub fn with_fetched(mut self, name: impl Into<String>, markup: impl Into<String>) -> Self {
        self.insert(name, Section::fetched(markup));
        self
    }

    /// Add a failed section (builder pattern).
    pub fn with_failed(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.insert(name, Section::failed(reason));
        self
    }

    /// Insert a section under a name, replacing any prior entry.
    pub fn insert(&mut self, name: impl Into<String>, section: Section) {
        self.sections.insert(name.into(), section);
    }

    /// Look up a section by name.
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Markup for a named section, if it arrived.
    pub fn markup(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Section::markup)
    }

    /// Plain-text rendering for a named section, if it arrived.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(Section::rendered_text)
    }

    /// Iterate sections that arrived successfully.
    pub fn healthy(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections
            .iter()
            .filter(|(_, s)| s.is_ok())
            .map(|(n, s)| (n.as_str(), s))
    }

    /// Names of sections that failed to fetch.
    pub fn failed_names(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|(_, s)| !s.is_ok())
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Number of sections that arrived.
    pub fn healthy_count(&self) -> usize {
        self.healthy().count()
    }

    /// Whether any section arrived with content.
    pub fn has_content(&self) -> bool {
        self.healthy()
            .any(|(_, s)| s.markup().is_some_and(|m| !m.trim().is_empty()))
    }

    /// Concatenated plain text of every healthy section.
    pub fn combined_text(&self) -> String {
        let mut out = String::new();
        for (_, section) in self.healthy() {
            if let Some(text) = section.rendered_text() {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&text);
            }
        }
        out
    }

    /// Deterministic hash of the bundle content.
    ///
    /// Depends only on section names and markup (sorted by name), never on
    /// fetch time, so identical content always hashes identically.
    pub fn content_hash(&self) -> String {
        let mut names: Vec<&String> = self.sections.keys().collect();
        names.sort();

        let mut hasher = Sha256::new();
        hasher.update(self.url.as_bytes());
        for name in names {
            hasher.update(b"\x00");
            hasher.update(name.as_bytes());
            hasher.update(b"\x00");
            if let Some(markup) = self.sections[name.as_str()].markup() {
                hasher.update(markup.as_bytes());
            }
        }
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_bundle_builder() {
        let sections = PageSections::new("https://catalog.example/p/100456789")
            .with_fetched(SECTION_MAIN, "<h1>Tile</h1>")
            .with_failed(SECTION_RESOURCES, "HTTP 503");

        assert_eq!(sections.healthy_count(), 1);
        assert_eq!(sections.failed_names(), vec![SECTION_RESOURCES]);
        assert!(sections.has_content());
        assert_eq!(sections.markup(SECTION_MAIN), Some("<h1>Tile</h1>"));
        assert!(sections.markup(SECTION_RESOURCES).is_none());
    }

    #[test]
    fn test_rendered_text_prefers_stored() {
        let section = Section::fetched_with_text("<p>markup</p>", "stored text");
        assert_eq!(section.rendered_text(), Some("stored text".to_string()));

        let rendered = Section::fetched("<p>from markup</p>");
        assert_eq!(rendered.rendered_text(), Some("from markup".to_string()));
    }

    #[test]
    fn test_content_hash_ignores_fetch_time() {
        let mut a = PageSections::new("https://catalog.example/p/1")
            .with_fetched(SECTION_MAIN, "<p>same</p>");
        let b = PageSections::new("https://catalog.example/p/1")
            .with_fetched(SECTION_MAIN, "<p>same</p>");
        a.fetched_at = Utc::now();

        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_content_hash_insertion_order_independent() {
        let a = PageSections::new("u")
            .with_fetched("main", "A")
            .with_fetched("specifications", "B");
        let b = PageSections::new("u")
            .with_fetched("specifications", "B")
            .with_fetched("main", "A");

        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_empty_bundle() {
        let sections = PageSections::new("https://catalog.example/p/1");
        assert!(!sections.has_content());
        assert_eq!(sections.healthy_count(), 0);
    }
}
