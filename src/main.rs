//! CLI entry point for the fleet CPK rater.
//!
//! Provides subcommands for segmenting an order dataset into refuel
//! cycles, computing the multi-method period rate table, comparing
//! indicators across methods, and printing selection overviews.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use fleet_cpk_rater::analyzers::aggregate::{aggregate_periods, finalize};
use fleet_cpk_rater::analyzers::cache::CycleCache;
use fleet_cpk_rater::analyzers::compare::compare_methods;
use fleet_cpk_rater::analyzers::completeness::completeness_by_period;
use fleet_cpk_rater::analyzers::overview::selection_overview;
use fleet_cpk_rater::analyzers::summary::summarize_vehicles;
use fleet_cpk_rater::analyzers::types::Indicator;
use fleet_cpk_rater::orders::Period;
use fleet_cpk_rater::output::{
    print_json, write_cycles_csv, write_json, write_period_csv, write_summaries_csv,
};
use fleet_cpk_rater::parser::read_orders;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "fleet_cpk_rater")]
#[command(about = "A tool to segment fleet orders into refuel cycles and rate cost per km", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IndicatorArg {
    FuelRate,
    TollRate,
    Efficiency,
    CostPerLiter,
}

impl From<IndicatorArg> for Indicator {
    fn from(arg: IndicatorArg) -> Indicator {
        match arg {
            IndicatorArg::FuelRate => Indicator::FuelRate,
            IndicatorArg::TollRate => Indicator::TollRate,
            IndicatorArg::Efficiency => Indicator::Efficiency,
            IndicatorArg::CostPerLiter => Indicator::CostPerLiter,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Segment an order dataset into refuel-to-refuel cycles
    Segment {
        /// Path to the orders CSV
        #[arg(value_name = "ORDERS_CSV")]
        input: String,

        /// CSV file to write the cycle table to
        #[arg(short, long, default_value = "cycles.csv")]
        output: String,

        /// Optional CSV file for the per-vehicle summary table
        #[arg(short, long)]
        summary: Option<String>,
    },
    /// Compute the per-period rate table under all four inclusion policies
    Aggregate {
        /// Path to the orders CSV
        #[arg(value_name = "ORDERS_CSV")]
        input: String,

        /// File to write the period table to
        #[arg(short, long, default_value = "period_rates.csv")]
        output: String,

        /// Write pretty JSON instead of CSV
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Compare an indicator's mean and spread across the four policies
    Compare {
        /// Path to the orders CSV
        #[arg(value_name = "ORDERS_CSV")]
        input: String,

        /// Indicator to compare
        #[arg(short, long, value_enum)]
        indicator: IndicatorArg,

        /// First period of the inclusive range (YYYY-MM); earliest present if omitted
        #[arg(long)]
        from: Option<String>,

        /// Last period of the inclusive range (YYYY-MM); latest present if omitted
        #[arg(long)]
        to: Option<String>,
    },
    /// Print selection-wide descriptive statistics and completeness
    Overview {
        /// Path to the orders CSV
        #[arg(value_name = "ORDERS_CSV")]
        input: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/fleet_cpk_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fleet_cpk_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Segment {
            input,
            output,
            summary,
        } => {
            let orders = read_orders(&input)?;
            let mut cache = CycleCache::new();
            let table = cache.get_or_segment(&orders);

            write_cycles_csv(&output, table)?;
            info!(
                cycles = table.cycles.len(),
                open_spans = table.open_spans.len(),
                output = %output,
                "Cycle table written"
            );

            if let Some(summary_path) = summary {
                let summaries = summarize_vehicles(&table.cycles);
                write_summaries_csv(&summary_path, &summaries)?;
                info!(vehicles = summaries.len(), output = %summary_path, "Vehicle summary written");
            }
        }
        Commands::Aggregate {
            input,
            output,
            json,
        } => {
            let orders = read_orders(&input)?;
            let mut cache = CycleCache::new();
            let table = cache.get_or_segment(&orders);
            let rows = finalize(&aggregate_periods(&orders, table));

            if json {
                write_json(&output, &rows)?;
            } else {
                write_period_csv(&output, &rows)?;
            }
            info!(periods = rows.len(), output = %output, "Period rate table written");
        }
        Commands::Compare {
            input,
            indicator,
            from,
            to,
        } => {
            let orders = read_orders(&input)?;
            if orders.is_empty() {
                bail!("no orders in {input}");
            }
            let mut cache = CycleCache::new();
            let table = cache.get_or_segment(&orders);
            let rows = aggregate_periods(&orders, table);

            let from = bound(from, || orders.iter().map(|o| o.period).min().unwrap())?;
            let to = bound(to, || orders.iter().map(|o| o.period).max().unwrap())?;

            match compare_methods(&rows, indicator.into(), from, to) {
                Some(comparison) => print_json(&comparison)?,
                None => warn!(
                    indicator = ?indicator,
                    %from,
                    %to,
                    "Nothing to compare, skipping output"
                ),
            }
        }
        Commands::Overview { input } => {
            let orders = read_orders(&input)?;
            print_json(&selection_overview(&orders))?;
            print_json(&completeness_by_period(&orders))?;
        }
    }

    Ok(())
}

fn bound(arg: Option<String>, default: impl FnOnce() -> Period) -> Result<Period> {
    match arg {
        Some(s) => Ok(s.parse()?),
        None => Ok(default()),
    }
}
