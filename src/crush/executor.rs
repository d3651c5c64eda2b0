//! Protection-aware cookie removal.
//!
//! The executor ties the store adapter, the session aggregator, and the
//! optional telemetry sink together: it scans a site into the session view
//! and crushes cookies out of it, one at a time or in bulk. Bulk crushing
//! is strictly sequential and partial-failure tolerant: a cookie the store
//! refuses to remove is counted and kept, never allowed to abort the rest
//! of the batch.

use crate::base::error::CrushError;
use crate::cookies::classifier::ClassifiedCookie;
use crate::cookies::collector;
use crate::cookies::snapshot::CookieKey;
use crate::cookies::store::CookieStore;
use crate::session::aggregator::{SessionAggregator, SessionStats};
use crate::telemetry::{CookieObserved, CrushRecorded, NullSink, TelemetrySink};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Outcome of a bulk crush: how many of the attempted removals succeeded,
/// plus the per-cookie failures.
#[derive(Debug)]
pub struct CrushReport {
    pub crushed: usize,
    pub failures: Vec<CrushFailure>,
}

impl CrushReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A single failed removal inside a bulk crush.
#[derive(Debug)]
pub struct CrushFailure {
    pub cookie: CookieKey,
    pub error: CrushError,
}

/// Removes cookies through the store adapter, honoring the protection
/// policy and keeping the session aggregator consistent.
pub struct CrushExecutor {
    store: Arc<dyn CookieStore>,
    session: Arc<SessionAggregator>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl CrushExecutor {
    /// Create an executor with no telemetry sink.
    pub fn new(store: Arc<dyn CookieStore>, session: Arc<SessionAggregator>) -> Self {
        Self {
            store,
            session,
            telemetry: Arc::new(NullSink),
        }
    }

    /// Attach a telemetry sink for scan and crush events.
    pub fn with_telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = sink;
        self
    }

    /// The session aggregator this executor feeds.
    pub fn session(&self) -> &Arc<SessionAggregator> {
        &self.session
    }

    /// Scan a site: enumerate, classify, and install the session view.
    ///
    /// The view is only replaced once enumeration has fully settled, and
    /// only if no newer scan started in the meantime. Returns the stats of
    /// the view current after the scan.
    pub async fn scan(&self, site: &str) -> Result<SessionStats, CrushError> {
        let token = self.session.begin_scan();

        let snapshots = collector::collect(&*self.store, site).await?;
        let classified: Vec<ClassifiedCookie> = snapshots
            .into_iter()
            .map(ClassifiedCookie::classify)
            .collect();

        for cookie in &classified {
            self.telemetry
                .cookie_observed(CookieObserved::from_scan(cookie, site))
                .await;
        }

        let installed = self.session.install_view(token, classified);
        tracing::debug!(site = %site, installed, "scan settled");
        Ok(self.session.stats())
    }

    /// Scan the host of a page URL. Fails on URLs without a host
    /// (`about:blank`, `file:` paths and the like).
    pub async fn scan_url(&self, url: &Url) -> Result<SessionStats, CrushError> {
        let host = url
            .host_str()
            .ok_or_else(|| CrushError::enumeration(url.as_str(), "url has no host"))?;
        self.scan(host).await
    }

    /// Remove a single cookie.
    ///
    /// On success the cookie is dropped from the view, the kill counter is
    /// incremented, and a crush event is emitted. On failure the view and
    /// counter are left untouched; the error is reported to the caller and
    /// is never fatal to a surrounding bulk operation.
    pub async fn crush_one(&self, cookie: &ClassifiedCookie) -> Result<(), CrushError> {
        let target = cookie.cookie.removal_ref();
        tracing::debug!(name = %target.name, url = %target.url(), "crushing cookie");

        let removed = self.store.remove(target.clone()).await?;
        if !removed {
            return Err(CrushError::removal(&target.name, &target.host));
        }

        self.session.drop_cookie(&cookie.key());
        self.session.record_kills(1);
        self.telemetry
            .crush_recorded(CrushRecorded::from_cookie(&cookie.cookie))
            .await;
        Ok(())
    }

    /// How many cookies a bulk crush with this policy would affect.
    pub fn dry_run(&self, include_protected: bool) -> usize {
        self.session
            .cookies()
            .iter()
            .filter(|c| is_target(c, include_protected))
            .count()
    }

    /// Crush every targetable cookie in the current view, sequentially and
    /// in view order.
    ///
    /// With `include_protected` false, session and authentication cookies
    /// are left untouched and unconsidered. Per-item failures are counted
    /// without aborting the remaining iterations. Afterwards the view holds
    /// exactly the non-targeted cookies plus any targeted cookies whose
    /// removal failed, and the kill counter grows by the success count.
    pub async fn crush_all(&self, include_protected: bool) -> CrushReport {
        let view = self.session.cookies();

        let mut crushed = 0usize;
        let mut failures = Vec::new();
        let mut failed_keys: HashSet<CookieKey> = HashSet::new();

        for cookie in view.iter().filter(|c| is_target(c, include_protected)) {
            let target = cookie.cookie.removal_ref();

            let outcome = match self.store.remove(target.clone()).await {
                Ok(true) => Ok(()),
                Ok(false) => Err(CrushError::removal(&target.name, &target.host)),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => {
                    crushed += 1;
                    self.telemetry
                        .crush_recorded(CrushRecorded::from_cookie(&cookie.cookie))
                        .await;
                }
                Err(error) => {
                    tracing::debug!(name = %target.name, error = %error, "cookie removal failed");
                    failed_keys.insert(cookie.key());
                    failures.push(CrushFailure {
                        cookie: cookie.key(),
                        error,
                    });
                }
            }
        }

        let survivors: Vec<ClassifiedCookie> = view
            .into_iter()
            .filter(|c| !is_target(c, include_protected) || failed_keys.contains(&c.key()))
            .collect();
        self.session.replace_view(survivors);
        self.session.record_kills(crushed as u64);

        tracing::info!(
            crushed,
            failed = failures.len(),
            include_protected,
            "bulk crush complete"
        );
        CrushReport { crushed, failures }
    }
}

fn is_target(cookie: &ClassifiedCookie, include_protected: bool) -> bool {
    include_protected || !cookie.is_protected()
}
