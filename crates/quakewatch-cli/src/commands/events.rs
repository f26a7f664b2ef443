use serde::Serialize;
use serde_json::Value;

use quakewatch_core::cache::CacheMode;
use quakewatch_core::domain::{EarthquakeRecord, SortKey};
use quakewatch_core::query;
use quakewatch_core::service::EarthquakeService;

use crate::cli::{Cli, EventsArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::{criteria_from, fetch_records};

#[derive(Debug, Serialize)]
struct EventsResponseData {
    count: usize,
    events: Vec<EventRow>,
}

#[derive(Debug, Serialize)]
struct EventRow {
    #[serde(flatten)]
    record: EarthquakeRecord,
    magnitude_class: &'static str,
    province: &'static str,
}

pub async fn run(cli: &Cli, args: &EventsArgs, service: &EarthquakeService) -> Result<(), CliError> {
    let criteria = criteria_from(&args.filter)?;
    let sort_key: SortKey = args.sort.parse()?;

    let records = fetch_records(service, args.filter.feed, CacheMode::Use).await?;
    let mut selected = query::sort(&query::filter(&records, &criteria), sort_key);
    if let Some(limit) = args.limit {
        selected.truncate(limit);
    }

    match cli.format {
        OutputFormat::Table => {
            for line in output::event_lines(&selected) {
                println!("{line}");
            }
            println!("{} event(s)", selected.len());
        }
        OutputFormat::Json => {
            let data = EventsResponseData {
                count: selected.len(),
                events: selected
                    .into_iter()
                    .map(|record| EventRow {
                        magnitude_class: record.magnitude_class().label(),
                        province: record.province(),
                        record,
                    })
                    .collect(),
            };
            let value: Value = serde_json::to_value(data)?;
            output::render(&value, cli.format, cli.pretty)?;
        }
    }

    Ok(())
}
