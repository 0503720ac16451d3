//! Serializable scan configuration.

use chrono::{Duration, NaiveDate};
use relsignal_core::engine::EngineConfig;
use relsignal_core::weekly::WeeklyThresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Unique identifier for a scan (content-addressable hash).
pub type RunId = String;

/// Default lookback window, in calendar days.
pub const DEFAULT_HISTORY_DAYS: u32 = 90;

/// Errors from loading or validating a scan configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything needed to reproduce a multi-symbol scan.
///
/// ```toml
/// benchmark = "SPY"
/// symbols = ["AAPL", "MSFT"]
/// data_dir = "data"
/// history_days = 90
///
/// [engine]
/// policy = "divergence-recheck"
///
/// [weekly]
/// buy_pct = -5.0
/// sell_pct = 10.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Benchmark symbol every target is compared against.
    #[serde(default = "default_benchmark")]
    pub benchmark: String,

    /// Target symbols.
    pub symbols: Vec<String>,

    /// Directory holding `<SYMBOL>.csv` price files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Lookback window in calendar days, ending at `end_date`.
    #[serde(default = "default_history_days")]
    pub history_days: u32,

    /// Last date of the window (inclusive). Defaults to today.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    /// Evaluate symbols on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    #[serde(default)]
    pub engine: EngineConfig,

    /// Also run the weekly threshold strategy when present.
    #[serde(default)]
    pub weekly: Option<WeeklyThresholds>,
}

fn default_benchmark() -> String {
    "SPY".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_history_days() -> u32 {
    DEFAULT_HISTORY_DAYS
}

fn default_parallel() -> bool {
    true
}

impl ScanConfig {
    /// Config for the given symbols with every other field at its default.
    pub fn new(benchmark: impl Into<String>, symbols: Vec<String>) -> Self {
        Self {
            benchmark: benchmark.into(),
            symbols,
            data_dir: default_data_dir(),
            history_days: DEFAULT_HISTORY_DAYS,
            end_date: None,
            parallel: true,
            engine: EngineConfig::default(),
            weekly: None,
        }
    }

    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.benchmark.trim().is_empty() {
            return Err(ConfigError::Invalid("benchmark symbol is empty".into()));
        }
        if self.symbols.is_empty() {
            return Err(ConfigError::Invalid("no symbols provided".into()));
        }
        if let Some(blank) = self.symbols.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("symbol #{blank} is empty")));
        }
        if self.history_days < 3 {
            return Err(ConfigError::Invalid(format!(
                "history_days must be at least 3, got {}",
                self.history_days
            )));
        }
        if let Some(weekly) = &self.weekly {
            weekly
                .validate()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(())
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two scans with identical configs share a RunId.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("ScanConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// The `(start, end)` date window, with `today` used when `end_date` is unset.
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        history_window(self.end_date.unwrap_or(today), self.history_days)
    }
}

/// `(end - days, end)`.
pub fn history_window(end: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    (end - Duration::days(i64::from(days)), end)
}
