//! First-party / third-party scoping.
//!
//! Compares registrable domains (eTLD+1) so `www.example.com` and
//! `.example.com` count as the same party while an ad-network domain on an
//! `example.com` page counts as third-party.
//!
//! Uses Mozilla's Public Suffix List via the `psl` crate.

/// Get the registrable domain (eTLD+1) for a host.
/// For "sub.example.com", returns "example.com".
/// For "com" (public suffix), returns None.
pub fn registrable_domain(host: &str) -> Option<String> {
    let host = host.trim_start_matches('.').to_lowercase();
    psl::domain(host.as_bytes())
        .and_then(|d| std::str::from_utf8(d.as_bytes()).ok())
        .map(|s| s.to_string())
}

/// Check whether a cookie domain belongs to the same party as the scanned
/// site. Hosts without a registrable domain (e.g. `localhost`) compare
/// literally.
pub fn is_first_party(cookie_domain: &str, site: &str) -> bool {
    match (registrable_domain(cookie_domain), registrable_domain(site)) {
        (Some(a), Some(b)) => a == b,
        _ => cookie_domain
            .trim_start_matches('.')
            .eq_ignore_ascii_case(site.trim_start_matches('.')),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registrable_domain() {
        assert_eq!(
            registrable_domain("example.com"),
            Some("example.com".to_string())
        );
        assert_eq!(
            registrable_domain("sub.example.com"),
            Some("example.com".to_string())
        );
        assert_eq!(
            registrable_domain(".example.co.uk"),
            Some("example.co.uk".to_string())
        );
    }

    #[test]
    fn test_first_party_ignores_leading_dot_and_subdomains() {
        assert!(is_first_party(".example.com", "example.com"));
        assert!(is_first_party("www.example.com", "example.com"));
        assert!(is_first_party("example.com", "shop.example.com"));
    }

    #[test]
    fn test_third_party_domains() {
        assert!(!is_first_party(".doubleclick.net", "example.com"));
        assert!(!is_first_party("tracker.adnxs.com", "news.example.co.uk"));
    }

    #[test]
    fn test_hosts_without_suffix_compare_literally() {
        assert!(is_first_party("localhost", "localhost"));
        assert!(!is_first_party("localhost", "example.com"));
    }
}
