//! Session view state, counters, and privacy score.
//!
//! - [`aggregator::SessionAggregator`]: the per-site cookie view with its
//!   derived stats and privacy score
//! - [`counter::KillCounter`]: the persistent lifetime kill counter and the
//!   key-value store abstraction behind it

pub mod aggregator;
pub mod counter;
