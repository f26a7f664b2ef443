//! CLI argument definitions for quakewatch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `events` | Fetch and list recent earthquakes |
//! | `stats` | Aggregate statistics and distributions |
//! | `watch` | Poll the feeds and print new batches |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `10000` | Per-attempt request timeout in ms |
//! | `--retries` | `2` | Retries per endpoint |
//! | `--no-cache` | `false` | Skip the in-memory feed cache |
//! | `--proxy-base` | none | Relay base URL, e.g. http://localhost:3001 |
//!
//! # Examples
//!
//! ```bash
//! # Recent CENC events above magnitude 4
//! quakewatch events --feed cenc --min-mag 4
//!
//! # Weekly statistics as a table
//! quakewatch stats --range week --format table
//!
//! # Live monitor with a 30s poll interval
//! quakewatch watch --interval 30 --min-mag 3
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Earthquake feed aggregation CLI.
///
/// Fetches the CENC (via Wolfx) and USGS public feeds with retry and
/// fallback, normalizes them into one record shape, and reports listings
/// and statistics.
#[derive(Debug, Parser)]
#[command(
    name = "quakewatch",
    version,
    about = "Earthquake feed aggregation CLI",
    long_about = "Quakewatch fetches the CENC (via Wolfx) and USGS public earthquake feeds,\n\
normalizes their divergent payloads into one canonical record shape, and\n\
reports filtered listings, aggregate statistics, and distributions.\n\
\n\
Use 'quakewatch <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-attempt request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Retries per endpoint before falling through to the next one.
    #[arg(long, global = true, default_value_t = 2)]
    pub retries: u32,

    /// Skip the in-memory feed cache; every call hits the network.
    #[arg(long, global = true, default_value_t = false)]
    pub no_cache: bool,

    /// Route feed requests through a relay (e.g. http://localhost:3001),
    /// falling back to the direct upstreams when it is unreachable.
    #[arg(long, global = true)]
    pub proxy_base: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object output.
    Json,
    /// Plain text table for terminal display.
    Table,
}

/// Which provider feed(s) to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FeedChoice {
    /// China Earthquake Networks Center, via the Wolfx mirror.
    Cenc,
    /// USGS all-day summary feed.
    Usgs,
    /// Both feeds, merged.
    #[default]
    Both,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and list recent earthquakes.
    ///
    /// # Examples
    ///
    ///   quakewatch events
    ///   quakewatch events --feed usgs --min-mag 4.5 --sort mag-desc
    ///   quakewatch events --start 2024-01-01 --end 2024-01-31 --domestic
    Events(EventsArgs),

    /// Aggregate statistics and distributions over the filtered events.
    ///
    /// # Examples
    ///
    ///   quakewatch stats
    ///   quakewatch stats --range week --format table
    Stats(StatsArgs),

    /// Poll the feeds on an interval and print each refreshed batch.
    ///
    /// Runs until interrupted with Ctrl-C.
    ///
    /// # Examples
    ///
    ///   quakewatch watch
    ///   quakewatch watch --interval 30 --min-mag 3
    Watch(WatchArgs),
}

/// Record filter flags shared by all commands.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Which feed(s) to read.
    #[arg(long, value_enum, default_value_t = FeedChoice::Both)]
    pub feed: FeedChoice,

    /// Minimum magnitude, inclusive.
    #[arg(long)]
    pub min_mag: Option<f64>,

    /// Maximum magnitude, inclusive.
    #[arg(long)]
    pub max_mag: Option<f64>,

    /// Start date (YYYY-MM-DD, midnight UTC).
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD, inclusive through end of day UTC).
    #[arg(long)]
    pub end: Option<String>,

    /// Quick range preset: day, week, or month. Anchored at --end when
    /// given, otherwise at now.
    #[arg(long)]
    pub range: Option<String>,

    /// Keep only events in Chinese regions.
    #[arg(long, conflicts_with = "overseas", default_value_t = false)]
    pub domestic: bool,

    /// Keep only events outside Chinese regions.
    #[arg(long, default_value_t = false)]
    pub overseas: bool,
}

/// Arguments for the `events` command.
#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Sort order: time-desc, time-asc, mag-desc, mag-asc.
    #[arg(long, default_value = "time-desc")]
    pub sort: String,

    /// Maximum number of records to print.
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for the `stats` command.
#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Arguments for the `watch` command.
#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Poll interval in seconds.
    #[arg(long, default_value_t = 60)]
    pub interval: u64,

    /// Maximum number of new records to print per poll.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}
