mod events;
mod stats;
mod watch;

use std::sync::Arc;
use std::time::Duration;

use quakewatch_core::cache::CacheMode;
use quakewatch_core::domain::{EarthquakeRecord, FilterCriteria, RegionScope, SortKey};
use quakewatch_core::http_client::ReqwestHttpClient;
use quakewatch_core::query;
use quakewatch_core::retry::RetryPolicy;
use quakewatch_core::service::{EarthquakeService, FeedEndpoints};
use time::OffsetDateTime;

use crate::cli::{Cli, Command, FeedChoice, FilterArgs};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let service = build_service(cli);

    match &cli.command {
        Command::Events(args) => events::run(cli, args, &service).await,
        Command::Stats(args) => stats::run(cli, args, &service).await,
        Command::Watch(args) => watch::run(cli, args, &service).await,
    }
}

fn build_service(cli: &Cli) -> EarthquakeService {
    let policy = RetryPolicy::exponential(cli.retries, Duration::from_secs(1), 2.0)
        .with_timeout_ms(cli.timeout_ms);

    let endpoints = match &cli.proxy_base {
        Some(base) => FeedEndpoints::with_proxy_base(base),
        None => FeedEndpoints::direct_only(),
    };

    let mut service = EarthquakeService::new(Arc::new(ReqwestHttpClient::new()))
        .with_policy(policy)
        .with_endpoints(endpoints);
    if cli.no_cache {
        service = service.without_cache();
    }
    service
}

/// Build filter criteria from the shared flags.
pub(crate) fn criteria_from(filter: &FilterArgs) -> Result<FilterCriteria, CliError> {
    let mut criteria = FilterCriteria::new().with_magnitude_range(
        filter.min_mag.unwrap_or(0.0),
        filter.max_mag.unwrap_or(10.0),
    )?;

    if let Some(start) = &filter.start {
        criteria = criteria.with_start_date(start)?;
    }
    if let Some(end) = &filter.end {
        criteria = criteria.with_end_date(end)?;
    }
    if let Some(range) = &filter.range {
        criteria = criteria.with_quick_range(range.parse()?, now_ms());
    }

    let scope = if filter.domestic {
        RegionScope::DomesticOnly
    } else if filter.overseas {
        RegionScope::OverseasOnly
    } else {
        RegionScope::All
    };

    Ok(criteria.with_scope(scope))
}

/// Fetch the selected feed(s), merged newest first.
pub(crate) async fn fetch_records(
    service: &EarthquakeService,
    feed: FeedChoice,
    mode: CacheMode,
) -> Result<Vec<EarthquakeRecord>, CliError> {
    let records = match feed {
        FeedChoice::Cenc => service.cenc_events(mode).await?,
        FeedChoice::Usgs => service.usgs_events(mode).await?,
        FeedChoice::Both => {
            let mut merged = service.cenc_events(mode).await?;
            merged.extend(service.usgs_events(mode).await?);
            query::sort(&merged, SortKey::TimeDesc)
        }
    };

    Ok(records)
}

pub(crate) fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
