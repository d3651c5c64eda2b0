//! Cookie purpose classification.
//!
//! A pure, deterministic mapping from a cookie's `(name, domain)` to its
//! tracking purpose, driven by an ordered rule table evaluated top to
//! bottom with first match winning. The order is part of the contract: the
//! pattern families overlap, and a login cookie named `sessionid` must
//! classify as session rather than falling through to the generic
//! identifier family. This is a heuristic, not a verified tracker database.

use crate::cookies::snapshot::{CookieKey, CookieSnapshot};
use serde::Serialize;
use std::fmt;

/// Tracking purpose assigned to a cookie. Exactly one per cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Session,
    Authentication,
    Analytics,
    Advertising,
    Identifier,
    Preferences,
    Unknown,
}

/// Whether a cookie may be targeted by bulk crushing.
///
/// Protection is solely a function of purpose, never of site-specific
/// allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionClass {
    /// Session and authentication cookies: excluded from bulk deletion
    /// unless explicitly overridden.
    Protected,
    Crushable,
}

impl Purpose {
    /// Session and authentication cookies keep the user logged in.
    pub fn is_protected(self) -> bool {
        matches!(self, Purpose::Session | Purpose::Authentication)
    }

    pub fn protection(self) -> ProtectionClass {
        if self.is_protected() {
            ProtectionClass::Protected
        } else {
            ProtectionClass::Crushable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Purpose::Session => "session",
            Purpose::Authentication => "authentication",
            Purpose::Analytics => "analytics",
            Purpose::Advertising => "advertising",
            Purpose::Identifier => "identifier",
            Purpose::Preferences => "preferences",
            Purpose::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the ordered rule table.
struct Rule {
    purpose: Purpose,
    matches: fn(name: &str, domain: &str) -> bool,
}

/// The classification table, evaluated top to bottom, first match wins.
/// Reordering entries changes outcomes.
static RULES: &[Rule] = &[
    Rule {
        purpose: Purpose::Session,
        matches: session_rule,
    },
    Rule {
        purpose: Purpose::Authentication,
        matches: authentication_rule,
    },
    Rule {
        purpose: Purpose::Analytics,
        matches: analytics_rule,
    },
    Rule {
        purpose: Purpose::Advertising,
        matches: advertising_rule,
    },
    Rule {
        purpose: Purpose::Identifier,
        matches: identifier_rule,
    },
    Rule {
        purpose: Purpose::Preferences,
        matches: preferences_rule,
    },
];

/// Session-id name family.
const SESSION_NAMES: &[&str] = &[
    "session", "sess", "sid", "ssid", "hsid", "apisid", "sapisid", "lsid",
];

/// Auth-token name family.
const AUTH_NAMES: &[&str] = &["auth", "token", "login", "csrf"];

/// Cookie-prefix names that identity providers reserve for auth state.
const SECURE_PREFIXES: &[&str] = &["__secure-", "__host-"];

/// Identity-provider domain substrings paired with the secure prefixes.
const IDENTITY_PROVIDERS: &[&str] = &["google"];

/// Analytics-vendor name prefixes.
const ANALYTICS_PREFIXES: &[&str] = &["_ga", "_gid", "__utm", "_gat"];

/// Ad/campaign/conversion name family.
const AD_NAMES: &[&str] = &["ad", "advert", "campaign", "conversion"];

/// Ad-network domain substrings.
const AD_NETWORKS: &[&str] = &["doubleclick", "googlesyndication", "adnxs", "pubmatic"];

/// Generic identifier name family ( `_hjid` is the heatmap-id variant).
const IDENTIFIER_NAMES: &[&str] = &["id", "uuid", "guid", "uid", "_hjid"];

/// Settings/locale/consent name family.
const PREFERENCE_NAMES: &[&str] = &["pref", "settings", "config", "locale", "consent"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn starts_with_any(haystack: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| haystack.starts_with(prefix))
}

/// `secure` followed anywhere later in the name by `psid`.
fn secure_psid_variant(name: &str) -> bool {
    name.find("secure")
        .is_some_and(|idx| name[idx + "secure".len()..].contains("psid"))
}

fn session_rule(name: &str, _domain: &str) -> bool {
    contains_any(name, SESSION_NAMES)
}

fn authentication_rule(name: &str, domain: &str) -> bool {
    contains_any(name, AUTH_NAMES)
        || secure_psid_variant(name)
        || (contains_any(domain, IDENTITY_PROVIDERS) && starts_with_any(name, SECURE_PREFIXES))
}

fn analytics_rule(name: &str, _domain: &str) -> bool {
    starts_with_any(name, ANALYTICS_PREFIXES)
}

fn advertising_rule(name: &str, domain: &str) -> bool {
    contains_any(name, AD_NAMES) || contains_any(domain, AD_NETWORKS)
}

fn identifier_rule(name: &str, _domain: &str) -> bool {
    contains_any(name, IDENTIFIER_NAMES)
}

fn preferences_rule(name: &str, _domain: &str) -> bool {
    contains_any(name, PREFERENCE_NAMES)
}

/// Classify a cookie by name and domain.
///
/// Pure, total, and case-insensitive on both inputs; anything no rule
/// claims is [`Purpose::Unknown`].
pub fn classify(name: &str, domain: &str) -> Purpose {
    let name = name.to_lowercase();
    let domain = domain.to_lowercase();

    RULES
        .iter()
        .find(|rule| (rule.matches)(&name, &domain))
        .map(|rule| rule.purpose)
        .unwrap_or(Purpose::Unknown)
}

/// A snapshot paired with its computed purpose; the unit held in the
/// session view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCookie {
    pub cookie: CookieSnapshot,
    pub purpose: Purpose,
}

impl ClassifiedCookie {
    /// Classify a snapshot and pair it with its purpose.
    pub fn classify(cookie: CookieSnapshot) -> Self {
        let purpose = classify(&cookie.name, &cookie.domain);
        Self { cookie, purpose }
    }

    pub fn is_protected(&self) -> bool {
        self.purpose.is_protected()
    }

    pub fn key(&self) -> CookieKey {
        self.cookie.key()
    }
}
