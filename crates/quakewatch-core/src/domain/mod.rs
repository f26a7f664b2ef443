//! Canonical domain types for earthquake monitoring.

mod filter;
mod record;

pub use filter::{FilterCriteria, QuickRange, RegionScope, SortKey};
pub use record::{DepthClass, EarthquakeRecord, FeedSource, MagnitudeClass};
