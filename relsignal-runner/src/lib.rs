//! relsignal runner: scan orchestration on top of `relsignal-core`.
//!
//! This crate provides:
//! - TOML scan configuration with content-addressed run ids
//! - CSV-backed price provider
//! - Parallel multi-symbol scans against a single benchmark
//! - JSON and CSV export of dated signals

pub mod config;
pub mod data_loader;
pub mod export;
pub mod scan;

pub use config::{history_window, ConfigError, RunId, ScanConfig, DEFAULT_HISTORY_DAYS};
pub use data_loader::{read_series, CsvPriceProvider};
pub use export::{export_json, export_signals_csv, export_weekly_csv, import_json, save_report};
pub use scan::{
    evaluate_pair, scan_symbols, DatedSignal, ScanError, ScanReport, SymbolOutcome, SymbolReport,
    SCHEMA_VERSION,
};
