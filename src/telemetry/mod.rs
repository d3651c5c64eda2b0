//! Optional fire-and-forget event reporting.
//!
//! Scan and crush operations can emit two event shapes to an external
//! aggregation sink: one per cookie observed during a scan, and one per
//! successfully crushed cookie. Delivery is best-effort and infallible at
//! this boundary; a sink that cannot deliver must swallow the failure, and
//! the presence or absence of a sink never alters scan or crush control
//! flow.

use crate::cookies::classifier::{ClassifiedCookie, Purpose};
use crate::cookies::scope;
use crate::cookies::snapshot::{CookieSnapshot, SameSite};
use serde::Serialize;
use std::{future::Future, pin::Pin, sync::Arc};
use time::OffsetDateTime;

/// Alias for the `Future` type returned by sink methods.
pub type Reporting = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A cookie seen during a scan.
#[derive(Debug, Clone, Serialize)]
pub struct CookieObserved {
    #[serde(with = "time::serde::timestamp")]
    pub timestamp: OffsetDateTime,
    pub domain: String,
    pub cookie_name: String,
    pub purpose: Purpose,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub has_value: bool,
    /// Whether the cookie domain shares the scanned site's registrable
    /// domain.
    pub first_party: bool,
}

impl CookieObserved {
    /// Build an observation event for a cookie found while scanning `site`.
    pub fn from_scan(classified: &ClassifiedCookie, site: &str) -> Self {
        let cookie = &classified.cookie;
        Self {
            timestamp: OffsetDateTime::now_utc(),
            domain: cookie.domain.clone(),
            cookie_name: cookie.name.clone(),
            purpose: classified.purpose,
            secure: cookie.secure,
            http_only: cookie.http_only,
            same_site: cookie.same_site,
            has_value: cookie.has_value,
            first_party: scope::is_first_party(&cookie.domain, site),
        }
    }
}

/// A successfully crushed cookie.
#[derive(Debug, Clone, Serialize)]
pub struct CrushRecorded {
    #[serde(with = "time::serde::timestamp")]
    pub timestamp: OffsetDateTime,
    pub domain: String,
    pub cookie_name: String,
}

impl CrushRecorded {
    pub fn from_cookie(cookie: &CookieSnapshot) -> Self {
        Self {
            timestamp: OffsetDateTime::now_utc(),
            domain: cookie.domain.clone(),
            cookie_name: cookie.name.clone(),
        }
    }
}

/// Trait for telemetry sinks.
///
/// Implementations must be infallible: deliver if possible, drop if not.
pub trait TelemetrySink: Send + Sync {
    fn cookie_observed(&self, event: CookieObserved) -> Reporting;
    fn crush_recorded(&self, event: CrushRecorded) -> Reporting;
}

/// Blanket implementation for Arc-wrapped sinks.
impl<S: TelemetrySink + ?Sized> TelemetrySink for Arc<S> {
    fn cookie_observed(&self, event: CookieObserved) -> Reporting {
        (**self).cookie_observed(event)
    }

    fn crush_recorded(&self, event: CrushRecorded) -> Reporting {
        (**self).crush_recorded(event)
    }
}

/// Sink that drops every event; the default when no sink is configured.
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn cookie_observed(&self, _event: CookieObserved) -> Reporting {
        Box::pin(std::future::ready(()))
    }

    fn crush_recorded(&self, _event: CrushRecorded) -> Reporting {
        Box::pin(std::future::ready(()))
    }
}

/// Sink that emits each event as a tracing debug line.
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn cookie_observed(&self, event: CookieObserved) -> Reporting {
        Box::pin(async move {
            tracing::debug!(
                domain = %event.domain,
                name = %event.cookie_name,
                purpose = %event.purpose,
                first_party = event.first_party,
                "cookie observed"
            );
        })
    }

    fn crush_recorded(&self, event: CrushRecorded) -> Reporting {
        Box::pin(async move {
            tracing::debug!(domain = %event.domain, name = %event.cookie_name, "cookie crushed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_event_shape() {
        let mut cookie = CookieSnapshot::new("_ga", ".example.com", "/");
        cookie.secure = true;
        cookie.has_value = false;
        let classified = ClassifiedCookie::classify(cookie);

        let event = CookieObserved::from_scan(&classified, "example.com");
        assert_eq!(event.cookie_name, "_ga");
        assert_eq!(event.purpose, Purpose::Analytics);
        assert!(event.first_party);
        assert!(event.secure);
        assert!(!event.has_value);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["purpose"], "analytics");
        assert_eq!(json["same_site"], "unspecified");
        assert!(json["timestamp"].is_i64());
    }

    #[test]
    fn test_observed_event_marks_third_party() {
        let classified =
            ClassifiedCookie::classify(CookieSnapshot::new("x", ".doubleclick.net", "/"));
        let event = CookieObserved::from_scan(&classified, "example.com");
        assert!(!event.first_party);
    }

    #[test]
    fn test_crush_event_shape() {
        let cookie = CookieSnapshot::new("_gid", ".example.com", "/");
        let event = CrushRecorded::from_cookie(&cookie);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], ".example.com");
        assert_eq!(json["cookie_name"], "_gid");
    }

    #[tokio::test]
    async fn test_null_sink_accepts_events() {
        let sink = NullSink;
        let cookie = ClassifiedCookie::classify(CookieSnapshot::new("a", "example.com", "/"));
        sink.cookie_observed(CookieObserved::from_scan(&cookie, "example.com"))
            .await;
        sink.crush_recorded(CrushRecorded::from_cookie(&cookie.cookie))
            .await;
    }
}
