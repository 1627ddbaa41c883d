//! Plain HTTP section fetcher and link checker.
//!
//! A convenience implementation for catalogs that serve their section
//! content over straight HTTP. Anti-blocking measures (proxies, browser
//! emulation, backoff) are deliberately absent; production deployments
//! put a hardened transport behind the same trait.

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::checker::LinkChecker;
use crate::traits::fetcher::SectionFetcher;
use crate::types::sections::{
    PageSections, Section, SECTION_MAIN, SECTION_RESOURCES, SECTION_SPECIFICATIONS,
};

/// One named section and the URL template that serves it.
///
/// `{url}` is replaced with the product URL.
#[derive(Debug, Clone)]
pub struct SectionRoute {
    pub name: String,
    pub url_template: String,
}

impl SectionRoute {
    /// Create a route.
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
        }
    }

    fn url_for(&self, product_url: &str) -> String {
        self.url_template.replace("{url}", product_url)
    }
}

/// HTTP fetcher issuing one request per section, concurrently.
pub struct HttpSectionFetcher {
    client: reqwest::Client,
    user_agent: String,
    routes: Vec<SectionRoute>,
}

impl Default for HttpSectionFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSectionFetcher {
    /// Create a fetcher with the catalog's default section routes.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            user_agent: "CatalogExtraction/1.0".to_string(),
            routes: vec![
                SectionRoute::new(SECTION_MAIN, "{url}"),
                SectionRoute::new(SECTION_SPECIFICATIONS, "{url}?render=specifications"),
                SectionRoute::new(SECTION_RESOURCES, "{url}?render=resources"),
            ],
        }
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Replace the section routes.
    pub fn with_routes(mut self, routes: Vec<SectionRoute>) -> Self {
        self.routes = routes;
        self
    }

    async fn fetch_one(&self, section: &str, url: &str) -> FetchResult<String> {
        debug!(section = %section, url = %url, "section fetch starting");
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            // the section endpoint answered, just not with content
            return Err(FetchError::SectionUnavailable {
                section: format!("{section} (HTTP {status})"),
            });
        }

        response.text().await.map_err(|e| FetchError::Http(Box::new(e)))
    }
}

#[async_trait]
impl SectionFetcher for HttpSectionFetcher {
    async fn fetch_sections(&self, url: &str) -> FetchResult<PageSections> {
        Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;

        // Sections are independent; fetch them concurrently
        let fetches = self.routes.iter().map(|route| {
            let section_url = route.url_for(url);
            async move {
                (
                    route.name.clone(),
                    self.fetch_one(&route.name, &section_url).await,
                )
            }
        });
        let results = futures::future::join_all(fetches).await;

        let mut sections = PageSections::new(url);
        for (name, result) in results {
            match result {
                Ok(markup) => sections.insert(name, Section::fetched(markup)),
                Err(e) => {
                    warn!(url = %url, section = %name, error = %e, "section unavailable");
                    sections.insert(name, Section::failed(e.to_string()));
                }
            }
        }
        Ok(sections)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Link checker sending a HEAD request.
pub struct HttpLinkChecker {
    client: reqwest::Client,
}

impl Default for HttpLinkChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpLinkChecker {
    /// Create a checker with a short-timeout client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl LinkChecker for HttpLinkChecker {
    async fn exists(&self, url: &str) -> FetchResult<bool> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;
        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_substitution() {
        let route = SectionRoute::new("specifications", "{url}?render=specifications");
        assert_eq!(
            route.url_for("https://catalog.example/p/1"),
            "https://catalog.example/p/1?render=specifications"
        );
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let fetcher = HttpSectionFetcher::new();
        let err = fetcher.fetch_sections("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
