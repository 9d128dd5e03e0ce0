//! # Almanac
//!
//! In-memory temporal event index with incremental calendar roll-ups.
//!
//! ## Features
//!
//! - **Ordered storage**: events kept in chronological order, stable on equal dates
//! - **Seek index**: sparse year/month/day anchors turn range lookups into a short descent
//! - **Lazy queries**: range results stream straight off the live event chain
//! - **Incremental aggregation**: per-bucket count/sum cached, invalidated upward on insert
//!
//! ## Modules
//!
//! - [`calendar`]: Dates, partial date bounds and calendar routing
//! - [`timeline`]: The event index and its range queries
//! - [`aggregate`]: Roll-up statistics and the aggregate cache
//! - [`shared`]: Lock-guarded handle for multi-threaded use
//! - [`config`]: TOML configuration
//! - [`import`]: CSV loading
//!
//! ## Quick Start
//!
//! ```rust
//! use almanac::{in_range, DateBound, Event, NodeSelector, Timeline};
//!
//! # fn main() -> Result<(), almanac::TimelineError> {
//! let mut timeline = Timeline::numeric();
//! timeline.insert(Event::on(2020, 12, 31, 4.0)?);
//! timeline.insert(Event::on(2020, 1, 6, 2.0)?);
//! timeline.insert(Event::on(2021, 3, 12, 9.0)?);
//!
//! // December 2020 through July 2021
//! let criteria = in_range(DateBound::month(2020, 12)?, DateBound::month(2021, 7)?);
//! let dates: Vec<String> = timeline.query(&criteria).map(|e| e.date().to_string()).collect();
//! assert_eq!(dates, ["2020-12-31", "2021-03-12"]);
//!
//! let year = timeline.stat(NodeSelector::Year(2020));
//! assert_eq!(year.count, 2);
//! assert_eq!(year.avg(), Some(3.0));
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod error;
pub mod import;
pub mod shared;
pub mod timeline;

// Re-export top-level types for convenience
pub use aggregate::{AggregateCache, NodeSelector, Stat, StatSummary};

pub use calendar::{days_in_month, is_leap_year, CalendarDate, DateBound, Level};

pub use error::{TimelineError, TimelineResult};

pub use timeline::{
    all_events, in_date, in_range, since, until, Event, EventId, Events, IndexConfig,
    StatExtractor, TimeCriteria, Timeline, TimelineStats,
};

pub use shared::SharedTimeline;

pub use config::{Config, ConfigError, ImportConfig, LoggingConfig};

pub use import::{CsvImportResult, CsvLoader, ImportError, Record};
