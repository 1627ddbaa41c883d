//! Mock implementations and page fixtures for testing.
//!
//! The fixtures mirror the catalog's real page families closely enough to
//! exercise every extraction pass: JSON-LD blocks for the structured
//! pass, display pricing/packaging phrasing for the pattern pass, and
//! labeled lines for the heuristics.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult};
use crate::traits::checker::LinkChecker;
use crate::types::sections::{PageSections, SECTION_MAIN, SECTION_SPECIFICATIONS};

/// Mock link checker with a configurable set of existing URLs.
#[derive(Default)]
pub struct MockLinkChecker {
    existing: Arc<RwLock<HashSet<String>>>,
    calls: Arc<RwLock<Vec<String>>>,
    fail: bool,
}

impl MockLinkChecker {
    /// Create a checker where no URL exists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a URL as existing (builder pattern).
    pub fn with_existing(self, url: impl Into<String>) -> Self {
        self.existing.write().unwrap().insert(url.into());
        self
    }

    /// Make every probe error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// URLs probed so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

impl Clone for MockLinkChecker {
    fn clone(&self) -> Self {
        Self {
            existing: Arc::clone(&self.existing),
            calls: Arc::clone(&self.calls),
            fail: self.fail,
        }
    }
}

#[async_trait]
impl LinkChecker for MockLinkChecker {
    async fn exists(&self, url: &str) -> FetchResult<bool> {
        self.calls.write().unwrap().push(url.to_string());
        if self.fail {
            return Err(FetchError::Http("mock probe failure".into()));
        }
        Ok(self.existing.read().unwrap().contains(url))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Main-section markup for a porcelain tile page (Scenario A shape).
pub fn tile_main_markup() -> String {
    r#"<html><body>
      <script type="application/ld+json">
      {
        "@type": "Product",
        "name": "Calacatta Gold Polished Porcelain Tile",
        "sku": "100456789",
        "brand": { "name": "Stonebridge" },
        "category": "Tile > Porcelain",
        "offers": { "@type": "Offer", "price": "287.04", "priceCurrency": "USD" }
      }
      </script>
      <h1>Calacatta Gold Polished Porcelain Tile</h1>
      <p>$287.04 per Box</p>
      <p>10.98 sq. ft. per Box</p>
      <p>PEI Rating: 4. Suitable for floor and wall. Made in Italy.</p>
    </body></html>"#
        .to_string()
}

/// Specifications-section markup for the tile page.
pub fn tile_specifications_markup() -> String {
    r#"<table>
      <tr><th>Material Type</th><td>Porcelain</td></tr>
      <tr><th>Sq. Ft. per Box</th><td>10.98</td></tr>
      <tr><th>Box Weight</th><td>52.3 lbs</td></tr>
      <tr><th>Finish</th><td>Polished</td></tr>
      <tr><th>Shade Variation</th><td>V3</td></tr>
    </table>"#
        .to_string()
}

/// Main-section markup for a sanded grout page (Scenario B shape).
pub fn grout_main_markup() -> String {
    r#"<html><body>
      <h1>Sanded Grout</h1>
      <p>Item # 100998877</p>
      <p>$18.97 per bag</p>
      <p>25 lb bag. For joints up to 1/2 in.</p>
      <p>Color: Grey</p>
      <p>Working Time: 30 minutes. Coverage varies by joint size.</p>
    </body></html>"#
        .to_string()
}

/// Main-section markup for a luxury vinyl plank page.
pub fn vinyl_main_markup() -> String {
    r#"<html><body>
      <script type="application/ld+json">
      {
        "@type": "Product",
        "name": "Weathered Oak Rigid Core Luxury Vinyl Plank",
        "sku": "100112233",
        "offers": { "price": "69.30" }
      }
      </script>
      <h1>Weathered Oak Rigid Core Luxury Vinyl Plank</h1>
      <p>$69.30 per box, 23.77 sq. ft. per box</p>
      <p>Waterproof. 20 mil wear layer. Click-lock installation.</p>
    </body></html>"#
        .to_string()
}

/// Main-section markup for a trim/molding page.
pub fn trim_main_markup() -> String {
    r#"<html><body>
      <h1>Matte White Bullnose Trim</h1>
      <p>Item # 100334455</p>
      <p>$12.48 each</p>
      <p>Ceramic. 96 in. length. 10 pieces per box.</p>
    </body></html>"#
        .to_string()
}

/// Main-section markup for an installation tool page.
pub fn tool_main_markup() -> String {
    r#"<html><body>
      <h1>7 in. Professional Wet Saw Blade</h1>
      <p>Model # 100777888</p>
      <p>$89.00 each</p>
      <p>A corded wet saw blade for porcelain and stone. 3600 RPM. 14.5 lbs.</p>
    </body></html>"#
        .to_string()
}

/// A full tile bundle with main and specifications sections.
pub fn tile_bundle(url: &str) -> PageSections {
    PageSections::new(url)
        .with_fetched(SECTION_MAIN, tile_main_markup())
        .with_fetched(SECTION_SPECIFICATIONS, tile_specifications_markup())
}

/// A grout bundle with only the main section.
pub fn grout_bundle(url: &str) -> PageSections {
    PageSections::new(url).with_fetched(SECTION_MAIN, grout_main_markup())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_checker_tracks_calls() {
        let checker = MockLinkChecker::new().with_existing("https://catalog.example/a.pdf");

        assert!(checker.exists("https://catalog.example/a.pdf").await.unwrap());
        assert!(!checker.exists("https://catalog.example/b.pdf").await.unwrap());
        assert_eq!(checker.calls().len(), 2);
    }

    #[test]
    fn test_bundles_have_content() {
        assert!(tile_bundle("https://catalog.example/p/100456789").has_content());
        assert!(grout_bundle("https://catalog.example/p/100998877").has_content());
    }
}
