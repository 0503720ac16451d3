//! Multi-symbol scan: evaluate many targets against one benchmark.
//!
//! The benchmark is loaded once. Each target is then evaluated independently
//! with its own engine state, on the rayon pool when `parallel` is set. A
//! target whose data or evaluation fails is reported as skipped with the
//! error text; only a benchmark failure aborts the scan.

use chrono::NaiveDate;
use rayon::prelude::*;
use relsignal_core::data::{align_pair, DataError, PriceProvider};
use relsignal_core::weekly::{weekly_signals, WeeklySignal};
use relsignal_core::{PriceSeries, SignalEngine, SignalError, SignalKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConfigError, RunId, ScanConfig};

/// Current schema version for persisted scan reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors that abort a whole scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("benchmark {symbol}: {source}")]
    Benchmark {
        symbol: String,
        #[source]
        source: DataError,
    },
}

/// A signal mapped back to the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedSignal {
    pub kind: SignalKind,
    pub index: usize,
    pub date: NaiveDate,
    /// Target close on `date`.
    pub close: f64,
}

/// Outcome for a single target symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SymbolOutcome {
    Evaluated {
        signals: Vec<DatedSignal>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        weekly: Vec<WeeklySignal>,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolReport {
    pub symbol: String,
    pub outcome: SymbolOutcome,
}

impl SymbolReport {
    pub fn signals(&self) -> &[DatedSignal] {
        match &self.outcome {
            SymbolOutcome::Evaluated { signals, .. } => signals,
            SymbolOutcome::Skipped { .. } => &[],
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, SymbolOutcome::Skipped { .. })
    }
}

/// Complete result of a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub benchmark: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub policy: String,
    pub symbols: Vec<SymbolReport>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl ScanReport {
    pub fn signal_count(&self) -> usize {
        self.symbols.iter().map(|s| s.signals().len()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.symbols.iter().filter(|s| s.is_skipped()).count()
    }
}

/// Run the engine on one pair and map signal indices to dates and closes.
pub fn evaluate_pair(
    engine: &SignalEngine,
    target: &PriceSeries,
    benchmark: &PriceSeries,
) -> Result<Vec<DatedSignal>, SignalError> {
    let signals = engine.generate_signals(target, benchmark)?;
    if signals.is_empty() {
        return Ok(Vec::new());
    }

    let aligned = align_pair(target, benchmark);
    let points = aligned.target.points();
    Ok(signals
        .into_iter()
        .filter_map(|s| {
            points.get(s.index).map(|p| DatedSignal {
                kind: s.kind,
                index: s.index,
                date: p.date,
                close: p.close,
            })
        })
        .collect())
}

/// Scan every configured symbol against the benchmark.
pub fn scan_symbols(
    config: &ScanConfig,
    provider: &dyn PriceProvider,
    today: NaiveDate,
) -> Result<ScanReport, ScanError> {
    config.validate()?;
    let (start, end) = config.window(today);
    let engine = SignalEngine::new(config.engine);

    info!(
        benchmark = %config.benchmark,
        symbols = config.symbols.len(),
        start = %start,
        end = %end,
        policy = config.engine.policy.name(),
        provider = provider.name(),
        "starting scan"
    );

    let benchmark = provider
        .fetch(&config.benchmark, start, end)
        .map_err(|source| ScanError::Benchmark {
            symbol: config.benchmark.clone(),
            source,
        })?;

    let evaluate = |symbol: &String| SymbolReport {
        symbol: symbol.clone(),
        outcome: evaluate_symbol(config, &engine, provider, &benchmark, symbol, start, end),
    };

    let symbols: Vec<SymbolReport> = if config.parallel {
        config.symbols.par_iter().map(evaluate).collect()
    } else {
        config.symbols.iter().map(evaluate).collect()
    };

    let report = ScanReport {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        benchmark: config.benchmark.clone(),
        start_date: start,
        end_date: end,
        policy: config.engine.policy.name().to_string(),
        symbols,
    };

    info!(
        symbols = report.symbols.len(),
        signals = report.signal_count(),
        skipped = report.skipped_count(),
        "scan complete"
    );
    Ok(report)
}

fn evaluate_symbol(
    config: &ScanConfig,
    engine: &SignalEngine,
    provider: &dyn PriceProvider,
    benchmark: &PriceSeries,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> SymbolOutcome {
    let skipped = |reason: String| {
        warn!(symbol, %reason, "skipping symbol");
        SymbolOutcome::Skipped { reason }
    };

    let target = match provider.fetch(symbol, start, end) {
        Ok(series) => series,
        Err(e) => return skipped(e.to_string()),
    };

    let signals = match evaluate_pair(engine, &target, benchmark) {
        Ok(signals) => signals,
        Err(e) => return skipped(e.to_string()),
    };

    let weekly = match &config.weekly {
        Some(thresholds) => match weekly_signals(&target, thresholds) {
            Ok(weekly) => weekly,
            Err(e) => return skipped(e.to_string()),
        },
        None => Vec::new(),
    };

    SymbolOutcome::Evaluated { signals, weekly }
}
