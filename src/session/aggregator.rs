//! Session view state: counts, privacy score, and the kill counter.
//!
//! The aggregator owns the ordered cookie view for the currently scanned
//! site. The view is rebuilt on every scan and never persisted; the kill
//! counter is the only state that outlives the session.

use crate::cookies::classifier::ClassifiedCookie;
use crate::cookies::snapshot::CookieKey;
use crate::session::counter::KillCounter;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Cookie count at which the privacy score bottoms out.
const SCORE_COOKIE_CEILING: u64 = 50;

/// Aggregate counts over the current session view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub total: usize,
    pub crushable: usize,
    pub protected: usize,
}

/// Token tying an in-flight scan to the view generation it may install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanToken(u64);

/// Owns the session view and the lifetime kill counter.
pub struct SessionAggregator {
    view: Mutex<Vec<ClassifiedCookie>>,
    scan_generation: AtomicU64,
    counter: KillCounter,
}

impl SessionAggregator {
    pub fn new(counter: KillCounter) -> Self {
        Self {
            view: Mutex::new(Vec::new()),
            scan_generation: AtomicU64::new(0),
            counter,
        }
    }

    /// Start a scan. The returned token must be presented to
    /// [`install_view`](Self::install_view) once enumeration settles.
    pub fn begin_scan(&self) -> ScanToken {
        ScanToken(self.scan_generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replace the view with a freshly settled enumeration.
    ///
    /// Returns `false` and installs nothing when a newer scan began after
    /// `token` was issued, so a slow stale scan can never clobber a view
    /// that a faster scan already replaced.
    pub fn install_view(&self, token: ScanToken, cookies: Vec<ClassifiedCookie>) -> bool {
        if self.scan_generation.load(Ordering::SeqCst) != token.0 {
            tracing::debug!(generation = token.0, "stale scan result dropped");
            return false;
        }
        *self.lock_view() = cookies;
        true
    }

    /// Ordered copy of the current view.
    pub fn cookies(&self) -> Vec<ClassifiedCookie> {
        self.lock_view().clone()
    }

    /// Counts over the current view.
    pub fn stats(&self) -> SessionStats {
        let view = self.lock_view();
        let protected = view.iter().filter(|c| c.is_protected()).count();
        SessionStats {
            total: view.len(),
            crushable: view.len() - protected,
            protected,
        }
    }

    /// Privacy score in `[0, 100]`, linear in the current cookie count:
    /// 100 with no cookies, 0 at 50 or more.
    pub fn privacy_score(&self) -> u8 {
        score_for_count(self.lock_view().len())
    }

    /// Lifetime kill counter value.
    pub fn kill_count(&self) -> u64 {
        self.counter.get()
    }

    /// Drop one cookie from the view after a confirmed removal.
    pub(crate) fn drop_cookie(&self, key: &CookieKey) {
        self.lock_view().retain(|c| &c.key() != key);
    }

    /// Replace the view wholesale after a bulk crush settles.
    pub(crate) fn replace_view(&self, cookies: Vec<ClassifiedCookie>) {
        *self.lock_view() = cookies;
    }

    /// Record `n` successful kills on the lifetime counter.
    pub(crate) fn record_kills(&self, n: u64) -> u64 {
        if n == 0 {
            return self.counter.get();
        }
        self.counter.increment(n)
    }

    fn lock_view(&self) -> MutexGuard<'_, Vec<ClassifiedCookie>> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `clamp(0, 100, 100 - count / 50 * 100)`, recomputed on every view
/// change and never persisted.
pub fn score_for_count(count: usize) -> u8 {
    let penalty = (count as u64).saturating_mul(100) / SCORE_COOKIE_CEILING;
    100u64.saturating_sub(penalty) as u8
}
