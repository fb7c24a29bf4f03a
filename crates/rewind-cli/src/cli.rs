//! CLI argument definitions for Rewind.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `snapshot` | Show the account snapshot for one date |
//! | `replay` | Play snapshots forward from a date until today |
//! | `navigate` | Interactive navigation from stdin line commands |
//! | `live` | Refresh the live dashboard once, or every 30s with `--watch` |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--base-url` | `$REWIND_API_BASE` or `http://localhost:8080` | Dashboard API root |
//! | `--timeout-ms` | `$REWIND_TIMEOUT_MS` or `10000` | Request timeout in ms |
//! | `--mock` | `false` | Use deterministic offline data |
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! # Account state at the end of 2023
//! rewind snapshot --date 2023-12-31
//!
//! # Replay from March at two days per second
//! rewind replay --from 2024-03-01 --speed-ms 500 --format json
//!
//! # Walk through history with arrow-key names
//! rewind navigate --mock
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Rewind - time-travel through daily trading-account snapshots
#[derive(Debug, Parser)]
#[command(
    name = "rewind",
    author,
    version,
    about = "Time-travel through daily trading-account snapshots",
    long_about = "Rewind replays the daily snapshots served by a trading dashboard API. \
Navigate by day or month, jump to any date since the start of history, or play \
the days forward at a chosen speed.\n\
\n\
Use 'rewind <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Dashboard API root, e.g. http://localhost:8080.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Serve deterministic offline data instead of calling the API.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Output format for rendered data.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain-text tables for terminal display.
    Table,
    /// One JSON object per rendered part.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the snapshot for one date.
    Snapshot(SnapshotArgs),
    /// Play snapshots forward from a date until today.
    Replay(ReplayArgs),
    /// Navigate interactively; type `help` for the line commands.
    Navigate(NavigateArgs),
    /// Show live dashboard data.
    Live(LiveArgs),
}

/// Range options shared by the time-travel commands.
#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// Earliest navigable date (YYYY-MM-DD).
    #[arg(long, default_value = "2020-05-01")]
    pub min_date: String,

    /// Symbol whose executions are marked on the chart.
    #[arg(long, default_value = "XBTUSD")]
    pub chart_symbol: String,
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Date to show (YYYY-MM-DD); out-of-range dates are clamped.
    #[arg(long)]
    pub date: String,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// First date of the replay (YYYY-MM-DD).
    #[arg(long)]
    pub from: String,

    /// Delay between days in milliseconds.
    #[arg(long, default_value_t = 1_000)]
    pub speed_ms: u64,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Debug, Args)]
pub struct NavigateArgs {
    /// Initial playback delay in milliseconds.
    #[arg(long, default_value_t = 1_000)]
    pub speed_ms: u64,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Debug, Args)]
pub struct LiveArgs {
    /// Chart symbol.
    #[arg(long, default_value = "XBTUSD")]
    pub symbol: String,

    /// Candle timeframe (1h, 1d).
    #[arg(long, default_value = "1d")]
    pub timeframe: String,

    /// Keep refreshing every 30 seconds until interrupted.
    #[arg(long, default_value_t = false)]
    pub watch: bool,
}
