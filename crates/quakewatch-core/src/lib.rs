//! Earthquake feed aggregation core.
//!
//! Fetches the Wolfx/CENC and USGS public feeds with retry, fallback, and
//! caching, normalizes their divergent payloads into one canonical record
//! shape, and offers pure filtering, classification, and statistics over
//! the result.
//!
//! | Module | Concern |
//! |--------|---------|
//! | [`domain`] | canonical record, filter criteria, enums |
//! | [`http_client`] | transport trait and reqwest implementation |
//! | [`retry`] | backoff policies |
//! | [`fetch`] | retry / sequential-fallback / race strategies |
//! | [`cache`] | in-memory TTL cache |
//! | [`feeds`] | provider payload normalization |
//! | [`service`] | orchestration: endpoints, cache, refresh |
//! | [`classify`] | domestic/overseas partitioning, provinces |
//! | [`query`] | filter and sort |
//! | [`stats`] | aggregates and distributions |
//! | [`seismo`] | distance, intensity, energy, wave arrival |
//!
//! ```no_run
//! use quakewatch_core::cache::CacheMode;
//! use quakewatch_core::service::EarthquakeService;
//! use quakewatch_core::stats;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let service = EarthquakeService::with_defaults();
//! let events = service.cenc_events(CacheMode::Use).await?;
//! let summary = stats::compute_stats(&events);
//! println!("{} events, max M{:.1}", summary.total, summary.max_magnitude);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod classify;
pub mod domain;
pub mod error;
pub mod feeds;
pub mod fetch;
pub mod http_client;
pub mod query;
pub mod retry;
pub mod seismo;
pub mod service;
pub mod stats;

pub use cache::{CacheMode, CacheStore};
pub use domain::{
    DepthClass, EarthquakeRecord, FeedSource, FilterCriteria, MagnitudeClass, QuickRange,
    RegionScope, SortKey,
};
pub use error::{CoreError, ValidationError};
pub use fetch::{Candidate, FetchError};
pub use http_client::{HttpClient, ReqwestHttpClient};
pub use retry::{Backoff, RetryPolicy};
pub use service::{EarthquakeService, FeedEndpoints, RefreshOutcome};
