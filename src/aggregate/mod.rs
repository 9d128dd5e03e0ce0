//! Calendar roll-ups
//!
//! - **stat**: `Stat {count, sum}` and its associative merge
//! - **selector**: addressing year/quarter/month/day buckets
//! - **cache**: memoized per-bucket stats with upward invalidation

mod cache;
mod selector;
mod stat;

pub use cache::AggregateCache;
pub use selector::NodeSelector;
pub use stat::{Stat, StatSummary};
