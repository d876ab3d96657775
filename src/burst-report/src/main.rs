//! Burst Report: command-line front end for the burst-protection analytics
//! engine.
//!
//! Reads JSON row/window exports, runs the requested report and prints it as
//! JSON on stdout. Logs go to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use burst_core::config::{AppConfig, LoggingConfig};
use burst_core::error::BurstResult;
use burst_core::types::{Campaign, TelemetryRow, WindowRecord};
use burst_reporting::{
    aggregate_windows_by_campaign, aggregate_windows_by_day, calculate_metrics, enrich_rows,
    filter_windows, sort_rows, window_time_span, CampaignWindowSummary, SortField, SortOrder,
    WindowDayMetric, WindowFilter,
};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "burst-report")]
#[command(about = "Burst-protection metrics and active-window timelines")]
#[command(version)]
struct Cli {
    /// TOML config file (environment variables still override it)
    #[arg(long, env = "BURST_REPORT_CONFIG")]
    config: Option<String>,

    /// Print single-line JSON (overrides config)
    #[arg(long, default_value_t = false)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// KPIs, daily metrics, account summaries and feature impact
    Metrics {
        /// JSON array of telemetry rows
        #[arg(long)]
        rows: PathBuf,
    },
    /// Filtered window timeline per day and per campaign
    Windows {
        /// JSON array of window records
        #[arg(long)]
        windows: PathBuf,
        /// JSON array of campaigns used for display names (overrides config)
        #[arg(long)]
        roster: Option<PathBuf>,
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Restrict to these campaign ids (repeatable)
        #[arg(long = "campaign")]
        campaigns: Vec<u64>,
    },
    /// Rows with feature-relative fields, optionally sorted
    Rows {
        #[arg(long)]
        rows: PathBuf,
        /// account_id, avg_depletion_rate, spikes_count or feature_date
        #[arg(long)]
        sort_by: Option<SortField>,
        /// asc or desc
        #[arg(long, default_value = "asc")]
        order: SortOrder,
    },
}

#[derive(Debug, Serialize)]
struct WindowSpan {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Debug, Serialize)]
struct WindowsReport {
    window_span: Option<WindowSpan>,
    daily: Vec<WindowDayMetric>,
    campaigns: Vec<CampaignWindowSummary>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::load(cli.config.as_deref());
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => AppConfig::default(),
    };
    init_tracing(&config.logging);

    if let Err(e) = loaded {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    // Apply CLI overrides
    if cli.compact {
        config.output.pretty = false;
    }

    info!(pretty = config.output.pretty, "Configuration loaded");

    match cli.command {
        Command::Metrics { rows } => {
            let rows: Vec<TelemetryRow> = read_json(&rows)
                .with_context(|| format!("reading rows from {}", rows.display()))?;
            emit(&calculate_metrics(&rows), config.output.pretty)
        }
        Command::Windows {
            windows,
            roster,
            start,
            end,
            campaigns,
        } => {
            let windows: Vec<WindowRecord> = read_json(&windows)
                .with_context(|| format!("reading windows from {}", windows.display()))?;

            let roster_path = roster.or_else(|| config.windows.roster_path.as_ref().map(PathBuf::from));
            let roster: Option<Vec<Campaign>> = match roster_path {
                Some(path) => Some(
                    read_json(&path)
                        .with_context(|| format!("reading roster from {}", path.display()))?,
                ),
                None => None,
            };

            let filter = WindowFilter::with_date_range(start, end).campaigns(campaigns);
            debug!(?filter, "window filter");
            let filtered = filter_windows(&windows, &filter);

            let report = WindowsReport {
                window_span: window_time_span(&filtered).map(|(start, end)| WindowSpan { start, end }),
                daily: aggregate_windows_by_day(&filtered),
                campaigns: aggregate_windows_by_campaign(&filtered, roster.as_deref()),
            };
            emit(&report, config.output.pretty)
        }
        Command::Rows {
            rows,
            sort_by,
            order,
        } => {
            let mut rows: Vec<TelemetryRow> = read_json(&rows)
                .with_context(|| format!("reading rows from {}", rows.display()))?;
            if let Some(field) = sort_by {
                sort_rows(&mut rows, field, order);
            }
            emit(&enrich_rows(&rows), config.output.pretty)
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.clone().into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> BurstResult<T> {
    let raw = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&raw)?;
    Ok(value)
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
