//! Freshness cache for resolved redirect targets.
//!
//! The cache maps a [`NormalizedHost`](tripgate_core::NormalizedHost) to the
//! redirect target computed for it. Entries never expire individually; the
//! whole map is dropped at each freshness boundary by a [`ResetScheduler`].

pub mod cache;
pub mod schedule;

pub use cache::{FreshnessCache, TargetCache};
pub use schedule::{duration_until_next_midnight, ResetHandle, ResetSchedule, ResetScheduler};
