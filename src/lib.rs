//! # cookiecrush
//!
//! A cookie inventory, classification, and deletion engine.
//!
//! `cookiecrush` enumerates the cookies visible to a site through a
//! pluggable store adapter, classifies each cookie's tracking purpose with
//! an ordered heuristic rule table, and lets a caller crush them one at a
//! time or in bulk while protecting the cookies that keep a user logged in.
//! A lifetime kill counter survives restarts and a derived privacy score
//! summarizes the current site.
//!
//! ## Features
//!
//! - **Collection**: exact-domain plus parent-domain enumeration, merged
//!   and deduplicated by `(name, domain)` identity
//! - **Classification**: ordered first-match-wins rule table mapping cookie
//!   name/domain to a purpose (session, authentication, analytics, ...)
//! - **Protection**: session and authentication cookies are excluded from
//!   bulk deletion unless explicitly overridden
//! - **Counters**: persistent lifetime kill counter and a 0-100 privacy
//!   score derived from the current cookie count
//! - **Telemetry**: optional fire-and-forget event sink for external
//!   aggregation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cookiecrush::cookies::store::MemoryCookieStore;
//! use cookiecrush::crush::executor::CrushExecutor;
//! use cookiecrush::session::aggregator::SessionAggregator;
//! use cookiecrush::session::counter::{KillCounter, MemoryKeyValueStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(MemoryCookieStore::new());
//!     let counter = KillCounter::load(Arc::new(MemoryKeyValueStore::new()));
//!     let session = Arc::new(SessionAggregator::new(counter));
//!     let executor = CrushExecutor::new(store, session.clone());
//!
//!     let stats = executor.scan("example.com").await.unwrap();
//!     println!("{} cookies ({} crushable)", stats.total, stats.crushable);
//!
//!     let report = executor.crush_all(false).await;
//!     println!("crushed {}, score {}", report.crushed, session.privacy_score());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions shared across the crate
//! - [`cookies`] - Cookie model, store adapter, collection, classification
//! - [`crush`] - Single and bulk removal with protection policy
//! - [`session`] - Session view state, counters, and privacy score
//! - [`telemetry`] - Optional event sink for external aggregation

pub mod base;
pub mod cookies;
pub mod crush;
pub mod session;
pub mod telemetry;
