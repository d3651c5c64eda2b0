use serde::Serialize;

/// A point-in-time record of a cookie as reported by the store adapter.
///
/// Snapshots are immutable: removals drop the record from the session view
/// rather than mutating it. The cookie value itself is never captured, only
/// whether one is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSnapshot {
    /// Cookie name, case-sensitive.
    pub name: String,
    /// Cookie domain; a leading `.` denotes host-and-subdomains scope.
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    /// Whether the cookie carried a non-empty value.
    pub has_value: bool,
}

/// SameSite attribute as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    Unspecified,
    NoRestriction,
    Lax,
    Strict,
}

/// Identity key for deduplication: two snapshots with the same key are
/// duplicates regardless of their other attributes.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CookieKey {
    pub name: String,
    pub domain: String,
}

/// Address of a cookie for removal: scheme, host, path, and name.
///
/// The host never carries a leading dot; the store resolves the cookie from
/// the reconstructed URL the same way a browser does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalRef {
    pub https: bool,
    pub host: String,
    pub path: String,
    pub name: String,
}

impl RemovalRef {
    /// The removal URL, e.g. `https://example.com/`.
    pub fn url(&self) -> String {
        let scheme = if self.https { "https" } else { "http" };
        format!("{}://{}{}", scheme, self.host, self.path)
    }
}

impl CookieSnapshot {
    /// Create a snapshot with default attributes (not secure, not HttpOnly,
    /// SameSite unspecified, value present).
    pub fn new(name: impl Into<String>, domain: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            path: path.into(),
            secure: false,
            http_only: false,
            same_site: SameSite::Unspecified,
            has_value: true,
        }
    }

    /// Identity key of this snapshot.
    pub fn key(&self) -> CookieKey {
        CookieKey {
            name: self.name.clone(),
            domain: self.domain.clone(),
        }
    }

    /// Build the removal reference for this cookie: scheme from the secure
    /// flag, domain with any leading dot stripped, and the cookie path.
    pub fn removal_ref(&self) -> RemovalRef {
        RemovalRef {
            https: self.secure,
            host: self.domain.trim_start_matches('.').to_string(),
            path: self.path.clone(),
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_attributes() {
        let mut a = CookieSnapshot::new("sid", "example.com", "/");
        let mut b = CookieSnapshot::new("sid", "example.com", "/account");
        a.secure = true;
        b.http_only = true;

        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_key_is_case_sensitive_on_name() {
        let a = CookieSnapshot::new("SID", "example.com", "/");
        let b = CookieSnapshot::new("sid", "example.com", "/");
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_removal_ref_strips_leading_dot() {
        let mut cookie = CookieSnapshot::new("_ga", ".example.com", "/");
        cookie.secure = true;

        let target = cookie.removal_ref();
        assert_eq!(target.host, "example.com");
        assert_eq!(target.url(), "https://example.com/");
    }

    #[test]
    fn test_removal_ref_insecure_scheme() {
        let cookie = CookieSnapshot::new("prefs", "example.com", "/settings");
        let target = cookie.removal_ref();
        assert_eq!(target.url(), "http://example.com/settings");
    }
}
