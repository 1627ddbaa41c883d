//! Auxiliary document resolution.
//!
//! The catalog hosts family-specific documents (safety sheets, data
//! sheets, install guides) at predictable paths. The resolver builds
//! candidate URLs strictly from the reference-data templates and the
//! product URL origin, then probes each for existence. Only verified
//! links are attached; everything else is dropped at diagnostic level.
//! A probe is the pipeline's only network-blocking operation and is
//! always bounded by a timeout.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::traits::checker::LinkChecker;
use crate::types::record::{Family, ResourceLink};
use crate::types::reference::ReferenceData;

/// Everything the resolver may substitute into a template.
#[derive(Debug, Clone, Default)]
pub struct ResourceContext {
    /// Resolved page family
    pub family: Family,

    /// `scheme://host` of the product URL
    pub origin: Option<String>,

    /// Catalog SKU, if resolved
    pub sku: Option<String>,

    /// Slugified product title, if resolved
    pub slug: Option<String>,

    /// Resolved material, for template gates
    pub material: Option<String>,
}

/// Resolves and verifies auxiliary document links.
pub struct ResourceResolver {
    reference: Arc<ReferenceData>,
    probe_timeout: Duration,
}

impl ResourceResolver {
    /// Create a resolver over the given reference data.
    pub fn new(reference: Arc<ReferenceData>, probe_timeout: Duration) -> Self {
        Self {
            reference,
            probe_timeout,
        }
    }

    /// Resolve verified resource links for a record.
    ///
    /// Unverifiable candidates (probe failed, timed out, or template
    /// placeholders unsatisfiable) are omitted silently; they never fail
    /// the run.
    pub async fn resolve<C: LinkChecker>(
        &self,
        checker: &C,
        ctx: &ResourceContext,
    ) -> Vec<ResourceLink> {
        let Some(origin) = ctx.origin.as_deref() else {
            return Vec::new();
        };
        let Ok(base) = Url::parse(origin) else {
            debug!(origin = %origin, "unparseable origin, skipping resources");
            return Vec::new();
        };

        let mut links = Vec::new();
        for template in self.reference.documents_for(ctx.family) {
            if !template.admits_material(ctx.material.as_deref()) {
                continue;
            }
            let Some(path) = fill_template(&template.path_template, ctx) else {
                debug!(
                    template = %template.path_template,
                    "placeholder unsatisfied, skipping candidate"
                );
                continue;
            };
            let Ok(candidate) = base.join(&path) else {
                debug!(path = %path, "candidate did not form a URL");
                continue;
            };
            let candidate = candidate.to_string();

            match tokio::time::timeout(self.probe_timeout, checker.exists(&candidate)).await {
                Ok(Ok(true)) => {
                    links.push(ResourceLink {
                        kind: template.kind,
                        title: template.title.clone(),
                        url: candidate,
                        verified: true,
                    });
                }
                Ok(Ok(false)) => {
                    debug!(url = %candidate, "resource does not exist, dropped");
                }
                Ok(Err(e)) => {
                    debug!(url = %candidate, error = %e, "resource probe failed, dropped");
                }
                Err(_) => {
                    debug!(url = %candidate, "resource probe timed out, dropped");
                }
            }
        }
        links
    }
}

/// Substitute `{sku}` and `{slug}` placeholders; `None` when a needed
/// placeholder has no value.
fn fill_template(template: &str, ctx: &ResourceContext) -> Option<String> {
    let mut path = template.to_string();
    if path.contains("{sku}") {
        path = path.replace("{sku}", ctx.sku.as_deref()?);
    }
    if path.contains("{slug}") {
        path = path.replace("{slug}", ctx.slug.as_deref()?);
    }
    Some(path)
}

/// `scheme://host[:port]` of a URL.
pub fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{}://{}:{}", parsed.scheme(), host, port)),
        None => Some(format!("{}://{}", parsed.scheme(), host)),
    }
}

/// Slugify a title for use in document paths.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
