use std::collections::HashSet;
use std::time::Duration;

use quakewatch_core::query;
use quakewatch_core::service::EarthquakeService;

use crate::cli::{Cli, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::criteria_from;

/// Poll both feeds and print records not seen in an earlier poll.
/// Runs until Ctrl-C.
pub async fn run(_cli: &Cli, args: &WatchArgs, service: &EarthquakeService) -> Result<(), CliError> {
    let criteria = criteria_from(&args.filter)?;
    let mut seen: HashSet<String> = HashSet::new();
    let mut interval = tokio::time::interval(Duration::from_secs(args.interval.max(1)));

    eprintln!(
        "watching feeds every {}s, Ctrl-C to stop",
        args.interval.max(1)
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                poll_once(service, &criteria, args.limit, &mut seen).await;
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                eprintln!("stopped");
                return Ok(());
            }
        }
    }
}

async fn poll_once(
    service: &EarthquakeService,
    criteria: &quakewatch_core::domain::FilterCriteria,
    limit: usize,
    seen: &mut HashSet<String>,
) {
    let Some(outcome) = service.refresh_all().await else {
        return;
    };

    for (source, reason) in &outcome.failures {
        eprintln!("warning: {source} feed failed: {reason}");
    }

    let mut merged = outcome.cenc;
    merged.extend(outcome.usgs);

    let fresh: Vec<_> = query::filter(&merged, criteria)
        .into_iter()
        .filter(|record| seen.insert(format!("{}:{}", record.source, record.id)))
        .take(limit)
        .collect();

    for line in output::event_lines(&fresh) {
        println!("{line}");
    }
}
