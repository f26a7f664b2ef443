//! Rendering helpers for command results.

use quakewatch_core::domain::EarthquakeRecord;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(value: &Value, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(value)?
            } else {
                serde_json::to_string(value)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(value)?,
    }

    Ok(())
}

fn render_table(value: &Value) -> Result<(), CliError> {
    let pretty = serde_json::to_string_pretty(value)?;
    for line in pretty.lines() {
        println!("{line}");
    }
    Ok(())
}

/// One line per event, fixed-width columns.
pub fn event_lines(records: &[EarthquakeRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            format!(
                "{:<24}  M{:<4.1}  {:>6.1}km  {:<5}  {}",
                format_time(record.occurred_at_ms),
                record.magnitude,
                record.depth_km,
                record.source.as_str(),
                record.place,
            )
        })
        .collect()
}

pub fn format_time(occurred_at_ms: Option<i64>) -> String {
    let Some(millis) = occurred_at_ms else {
        return String::from("unknown time");
    };

    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .and_then(|moment| moment.format(&Rfc3339).ok())
        .unwrap_or_else(|| String::from("unknown time"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quakewatch_core::domain::FeedSource;

    #[test]
    fn unknown_times_render_as_a_placeholder() {
        assert_eq!(format_time(None), "unknown time");
        assert_eq!(format_time(Some(0)), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn event_line_contains_the_key_fields() {
        let record = EarthquakeRecord {
            id: String::from("e1"),
            magnitude: 5.2,
            place: String::from("四川甘孜州"),
            occurred_at_ms: Some(1_704_067_200_000),
            depth_km: 10.0,
            latitude: 30.1,
            longitude: 101.2,
            intensity: None,
            source: FeedSource::Cenc,
        };

        let lines = event_lines(std::slice::from_ref(&record));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("M5.2"));
        assert!(lines[0].contains("cenc"));
        assert!(lines[0].contains("四川甘孜州"));
        assert!(lines[0].contains("2024-01-01T00:00:00Z"));
    }
}
