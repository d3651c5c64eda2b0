//! Cookie store adapter abstraction.
//!
//! The engine never talks to a browser directly; it consumes a
//! [`CookieStore`] that exposes the two capabilities it needs: enumerate
//! cookies for a domain filter and remove one cookie by its reconstructed
//! URL. Both are asynchronous and may fail.

use crate::base::error::CrushError;
use crate::cookies::snapshot::{CookieSnapshot, RemovalRef};
use dashmap::DashMap;
use std::{fmt, future::Future, pin::Pin, sync::Arc};

/// A domain filter passed to [`CookieStore::enumerate`].
///
/// A filter starting with `.` matches host-and-subdomain scoped cookies;
/// otherwise it matches the exact host.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct DomainFilter {
    domain: Box<str>,
}

impl DomainFilter {
    #[inline]
    pub fn new(domain: impl Into<Box<str>>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    /// View the filter as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.domain
    }

    /// Whether this filter targets host-and-subdomain scoped cookies.
    pub fn is_wildcard(&self) -> bool {
        self.domain.starts_with('.')
    }
}

impl From<&str> for DomainFilter {
    fn from(value: &str) -> Self {
        DomainFilter::new(value)
    }
}

impl From<String> for DomainFilter {
    fn from(value: String) -> Self {
        DomainFilter::new(value)
    }
}

impl fmt::Debug for DomainFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.domain, f)
    }
}

impl fmt::Display for DomainFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.domain, f)
    }
}

/// Alias for the `Future` type returned by an enumeration call.
pub type Enumerating = Pin<Box<dyn Future<Output = Result<Vec<CookieSnapshot>, CrushError>> + Send>>;

/// Alias for the `Future` type returned by a removal call.
///
/// `Ok(false)` means the store declined the removal without raising an
/// error of its own; callers treat it the same as a removal failure.
pub type Removing = Pin<Box<dyn Future<Output = Result<bool, CrushError>> + Send>>;

/// Trait for cookie store backends.
///
/// # Design Notes
///
/// - Uses `&self` so one store can serve concurrent scans.
/// - Returns boxed futures for trait object compatibility.
/// - Enumeration is read-only; removal is the only mutation the engine
///   ever asks of a store.
pub trait CookieStore: Send + Sync {
    /// Enumerate the cookies matching a domain filter.
    fn enumerate(&self, filter: DomainFilter) -> Enumerating;

    /// Remove one cookie addressed by a [`RemovalRef`].
    fn remove(&self, target: RemovalRef) -> Removing;
}

/// Blanket implementation for Arc-wrapped stores.
impl<S: CookieStore + ?Sized> CookieStore for Arc<S> {
    fn enumerate(&self, filter: DomainFilter) -> Enumerating {
        (**self).enumerate(filter)
    }

    fn remove(&self, target: RemovalRef) -> Removing {
        (**self).remove(target)
    }
}

/// In-memory cookie store keyed by domain.
///
/// Useful for tests and demos; behaves like a browser store for the two
/// operations the engine uses. Dotted domains (`.example.com`) are distinct
/// entries, matching how wildcard-scoped cookies are stored.
pub struct MemoryCookieStore {
    store: Arc<DashMap<String, Vec<CookieSnapshot>>>,
}

impl Default for MemoryCookieStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Insert a cookie, replacing any existing one with the same name and
    /// path under the same domain.
    pub fn insert(&self, cookie: CookieSnapshot) {
        let mut entry = self.store.entry(cookie.domain.clone()).or_default();
        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);
        entry.push(cookie);
    }

    /// Total number of stored cookies across all domains.
    pub fn total_count(&self) -> usize {
        self.store.iter().map(|e| e.value().len()).sum()
    }

    /// Remove all stored cookies.
    pub fn clear(&self) {
        self.store.clear();
    }
}

impl CookieStore for MemoryCookieStore {
    fn enumerate(&self, filter: DomainFilter) -> Enumerating {
        let store = self.store.clone();
        Box::pin(async move {
            let cookies = store
                .get(filter.as_str())
                .map(|entry| entry.value().clone())
                .unwrap_or_default();
            Ok(cookies)
        })
    }

    fn remove(&self, target: RemovalRef) -> Removing {
        let store = self.store.clone();
        Box::pin(async move {
            // The removal URL host matches both the host-only entry and the
            // dotted wildcard entry.
            for key in [target.host.clone(), format!(".{}", target.host)] {
                if let Some(mut entry) = store.get_mut(&key) {
                    if let Some(idx) = entry
                        .iter()
                        .position(|c| c.name == target.name && c.path == target.path)
                    {
                        entry.remove(idx);
                        return Ok(true);
                    }
                }
            }
            Ok(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cookie(name: &str, domain: &str) -> CookieSnapshot {
        CookieSnapshot::new(name, domain, "/")
    }

    #[tokio::test]
    async fn test_enumerate_exact_domain_only() {
        let store = MemoryCookieStore::new();
        store.insert(make_cookie("a", "example.com"));
        store.insert(make_cookie("b", ".example.com"));
        store.insert(make_cookie("c", "other.com"));

        let cookies = store.enumerate(DomainFilter::new("example.com")).await.unwrap();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "a");

        let dotted = store.enumerate(DomainFilter::new(".example.com")).await.unwrap();
        assert_eq!(dotted.len(), 1);
        assert_eq!(dotted[0].name, "b");
    }

    #[tokio::test]
    async fn test_remove_matches_dotted_entry() {
        let store = MemoryCookieStore::new();
        store.insert(make_cookie("_ga", ".example.com"));

        let target = make_cookie("_ga", ".example.com").removal_ref();
        assert_eq!(target.host, "example.com");

        let removed = store.remove(target).await.unwrap();
        assert!(removed);
        assert_eq!(store.total_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_unknown_cookie_is_declined() {
        let store = MemoryCookieStore::new();
        store.insert(make_cookie("a", "example.com"));

        let removed = store
            .remove(make_cookie("missing", "example.com").removal_ref())
            .await
            .unwrap();
        assert!(!removed);
        assert_eq!(store.total_count(), 1);
    }

    #[test]
    fn test_insert_replaces_same_name_and_path() {
        let store = MemoryCookieStore::new();
        store.insert(make_cookie("a", "example.com"));
        let mut updated = make_cookie("a", "example.com");
        updated.secure = true;
        store.insert(updated);

        assert_eq!(store.total_count(), 1);
    }
}
