use serde::Serialize;
use serde_json::Value;

use quakewatch_core::cache::CacheMode;
use quakewatch_core::query;
use quakewatch_core::service::EarthquakeService;
use quakewatch_core::stats::{
    self, DailyCount, DistributionBucket, ListStats, RegionCount,
};

use crate::cli::{Cli, StatsArgs};
use crate::error::CliError;
use crate::output;

use super::{criteria_from, fetch_records};

#[derive(Debug, Serialize)]
struct StatsResponseData {
    summary: ListStats,
    magnitude_distribution: Vec<DistributionBucket>,
    depth_distribution: Vec<DistributionBucket>,
    daily_counts: Vec<DailyCount>,
    top_regions: Vec<RegionCount>,
}

pub async fn run(cli: &Cli, args: &StatsArgs, service: &EarthquakeService) -> Result<(), CliError> {
    let criteria = criteria_from(&args.filter)?;

    let records = fetch_records(service, args.filter.feed, CacheMode::Use).await?;
    let selected = query::filter(&records, &criteria);

    let data = StatsResponseData {
        summary: stats::compute_stats(&selected),
        magnitude_distribution: stats::magnitude_distribution(&selected),
        depth_distribution: stats::depth_distribution(&selected),
        daily_counts: stats::time_distribution(&selected),
        top_regions: stats::region_distribution(&selected),
    };

    let value: Value = serde_json::to_value(data)?;
    output::render(&value, cli.format, cli.pretty)
}
