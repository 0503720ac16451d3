//! relsignal CLI: divergence signals, multi-symbol scans, weekly thresholds.
//!
//! Commands:
//! - `signals`: BUY/SELL divergence signals for one target against a benchmark
//! - `scan`: evaluate every symbol in a TOML config, optionally saving a JSON report
//! - `weekly`: weekly threshold signals and the current week's performance

mod logging;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use relsignal_core::data::PriceProvider;
use relsignal_core::engine::{CrossoverPolicy, EngineConfig, SignalEngine};
use relsignal_core::weekly::{weekly_performance, weekly_signals, WeeklyThresholds};
use relsignal_runner::{
    evaluate_pair, export_json, export_signals_csv, history_window, save_report, scan_symbols,
    CsvPriceProvider, DatedSignal, ScanConfig, SymbolOutcome, DEFAULT_HISTORY_DAYS,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "relsignal",
    about = "relsignal CLI: relative-performance divergence signals"
)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    DivergenceRecheck,
    CrossingSlope,
}

impl From<PolicyArg> for CrossoverPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::DivergenceRecheck => CrossoverPolicy::DivergenceRecheck,
            PolicyArg::CrossingSlope => CrossoverPolicy::CrossingSlope,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Divergence signals for one target against a benchmark.
    Signals {
        /// Target symbol (e.g., AAPL).
        #[arg(long)]
        target: String,

        /// Benchmark symbol.
        #[arg(long, default_value = "SPY")]
        benchmark: String,

        /// Directory holding <SYMBOL>.csv price files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Lookback window in calendar days.
        #[arg(long, default_value_t = DEFAULT_HISTORY_DAYS)]
        days: u32,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Crossover policy.
        #[arg(long, value_enum, default_value = "divergence-recheck")]
        policy: PolicyArg,

        /// Output format.
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Scan every symbol listed in a TOML config.
    Scan {
        /// Path to a TOML scan config.
        #[arg(long)]
        config: PathBuf,

        /// Write the JSON report here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// End date override (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,
    },
    /// Weekly threshold signals (weeks ending Monday).
    Weekly {
        /// Symbol (e.g., AAPL).
        #[arg(long)]
        symbol: String,

        /// Directory holding <SYMBOL>.csv price files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Lookback window in calendar days.
        #[arg(long, default_value_t = 49)]
        days: u32,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Weekly change (%) at or below which to buy.
        #[arg(long, default_value_t = -5.0, allow_hyphen_values = true)]
        buy: f64,

        /// Weekly change (%) at or above which to sell.
        #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
        sell: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.json);

    match cli.command {
        Commands::Signals {
            target,
            benchmark,
            data_dir,
            days,
            end,
            policy,
            format,
        } => run_signals(&target, &benchmark, data_dir, days, end, policy, format),
        Commands::Scan {
            config,
            output,
            end,
        } => run_scan(config, output, end),
        Commands::Weekly {
            symbol,
            data_dir,
            days,
            end,
            buy,
            sell,
        } => run_weekly(&symbol, data_dir, days, end, buy, sell),
    }
}

fn parse_end(end: Option<String>) -> Result<NaiveDate> {
    end.as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("invalid --end date, expected YYYY-MM-DD")
        .map(|d| d.unwrap_or_else(|| chrono::Local::now().date_naive()))
}

fn run_signals(
    target: &str,
    benchmark: &str,
    data_dir: PathBuf,
    days: u32,
    end: Option<String>,
    policy: PolicyArg,
    format: OutputFormat,
) -> Result<()> {
    let (start, end) = history_window(parse_end(end)?, days);
    let provider = CsvPriceProvider::new(data_dir);

    let target_series = provider
        .fetch(target, start, end)
        .with_context(|| format!("failed to load {target}"))?;
    let benchmark_series = provider
        .fetch(benchmark, start, end)
        .with_context(|| format!("failed to load {benchmark}"))?;

    let engine = SignalEngine::new(EngineConfig::with_policy(policy.into()));
    let signals = evaluate_pair(&engine, &target_series, &benchmark_series)
        .with_context(|| format!("signal generation failed for {target} vs {benchmark}"))?;
    info!(target, benchmark, signals = signals.len(), "signals generated");

    match format {
        OutputFormat::Table => print_table(target, &signals),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&signals)?),
        OutputFormat::Csv => {
            println!("kind,index,date,close");
            for s in &signals {
                println!("{},{},{},{:.4}", s.kind, s.index, s.date, s.close);
            }
        }
    }
    Ok(())
}

fn print_table(symbol: &str, signals: &[DatedSignal]) {
    if signals.is_empty() {
        println!("{symbol}: no signals");
        return;
    }
    println!("{:<6} {:<5} {:>6} {:<10} {:>12}", "symbol", "kind", "index", "date", "close");
    for s in signals {
        println!(
            "{:<6} {:<5} {:>6} {:<10} {:>12.4}",
            symbol,
            s.kind.as_str(),
            s.index,
            s.date,
            s.close
        );
    }
}

fn run_scan(config_path: PathBuf, output: Option<PathBuf>, end: Option<String>) -> Result<()> {
    let mut config = ScanConfig::from_file(&config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    if end.is_some() {
        config.end_date = Some(parse_end(end)?);
    }

    let provider = CsvPriceProvider::new(&config.data_dir);
    let today = chrono::Local::now().date_naive();
    let report = scan_symbols(&config, &provider, today)?;

    match output {
        Some(path) => {
            save_report(&report, &path)?;
            println!("Report saved to {}", path.display());
            print!("{}", export_signals_csv(&report)?);
        }
        None => println!("{}", export_json(&report)?),
    }

    for entry in &report.symbols {
        if let SymbolOutcome::Skipped { reason } = &entry.outcome {
            eprintln!("Skipped {}: {reason}", entry.symbol);
        }
    }
    Ok(())
}

fn run_weekly(
    symbol: &str,
    data_dir: PathBuf,
    days: u32,
    end: Option<String>,
    buy: f64,
    sell: f64,
) -> Result<()> {
    let thresholds = WeeklyThresholds::new(buy, sell)?;
    let end = parse_end(end)?;
    let (start, end) = history_window(end, days);

    let provider = CsvPriceProvider::new(data_dir);
    let series = provider
        .fetch(symbol, start, end)
        .with_context(|| format!("failed to load {symbol}"))?;

    let signals = weekly_signals(&series, &thresholds)?;
    if signals.is_empty() {
        println!("{symbol}: no weekly signals ({buy}% / +{sell}%)");
    }
    for s in &signals {
        println!(
            "{} {:<4} close {:>10.2} change {:>+7.2}%",
            s.week_end, s.kind, s.close, s.change_pct
        );
    }

    match weekly_performance(&series, end) {
        Some(change) => println!("Current week: {change:+.2}%"),
        None => println!("Current week: no data"),
    }
    Ok(())
}
