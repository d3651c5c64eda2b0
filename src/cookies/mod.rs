//! Cookie model, store adapter, collection, and classification.
//!
//! This module owns everything between the raw store and the session view:
//!
//! - **Model**: [`snapshot::CookieSnapshot`], an immutable per-scan record
//! - **Adapter**: [`store::CookieStore`], the enumerate/remove capability
//!   the engine consumes
//! - **Collection**: [`collector::collect`], exact- plus parent-domain
//!   enumeration merged into one duplicate-free list
//! - **Classification**: [`classifier::classify`], the ordered heuristic
//!   rule table mapping `(name, domain)` to a [`classifier::Purpose`]
//! - **Scoping**: [`scope`], first- vs third-party by registrable domain

pub mod classifier;
pub mod collector;
pub mod scope;
pub mod snapshot;
pub mod store;
