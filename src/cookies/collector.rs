//! Cookie collection and deduplication.
//!
//! A scan for a site issues two enumeration queries: the exact host, and
//! (when the host is not already dot-prefixed) the dotted parent filter
//! that captures host-and-subdomain scoped cookies. The merged result is
//! deduplicated to the first occurrence per `(name, domain)` key.

use crate::base::error::CrushError;
use crate::cookies::snapshot::CookieSnapshot;
use crate::cookies::store::{CookieStore, DomainFilter};
use std::collections::HashSet;

/// Enumerate the cookies visible to `site` into one canonical,
/// duplicate-free list.
///
/// Exact-domain results precede parent-domain results. A failure of the
/// parent-domain branch degrades to exact-domain-only results; a failure of
/// the exact-domain query is surfaced to the caller and the session view is
/// left untouched.
pub async fn collect(store: &dyn CookieStore, site: &str) -> Result<Vec<CookieSnapshot>, CrushError> {
    let mut collected = store.enumerate(DomainFilter::new(site)).await?;

    // Wildcard-scoped cookies are stored under the dotted parent filter.
    if !site.starts_with('.') {
        let parent = DomainFilter::new(format!(".{}", site));
        match store.enumerate(parent).await {
            Ok(cookies) => collected.extend(cookies),
            Err(e) => {
                tracing::warn!(site = %site, error = %e, "parent-domain enumeration failed, keeping exact-domain results");
            }
        }
    }

    let deduped = dedup_first_seen(collected);
    tracing::debug!(site = %site, count = deduped.len(), "cookie collection complete");
    Ok(deduped)
}

/// Keep the first occurrence of each `(name, domain)` key, preserving the
/// order of first appearance.
pub fn dedup_first_seen(cookies: Vec<CookieSnapshot>) -> Vec<CookieSnapshot> {
    let mut seen = HashSet::new();
    cookies
        .into_iter()
        .filter(|cookie| seen.insert(cookie.key()))
        .collect()
}
