//! Price provider trait and structured error types.
//!
//! The PriceProvider trait abstracts over where price history comes from
//! (CSV files, a brokerage API, fixtures) so the engine can be driven without
//! knowing about I/O, and mocked in tests.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::PriceSeries;
use crate::error::SignalError;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no data for {symbol} between {start} and {end}")]
    EmptyWindow {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("malformed price data for {symbol}: {reason}")]
    Malformed { symbol: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Invalid(#[from] SignalError),
}

/// Source of daily price history.
///
/// Implementations return points ordered ascending, restricted to
/// `[start, end]`.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily prices for a symbol over a date range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<PriceSeries, DataError>;
}

/// In-memory provider over preloaded series.
#[derive(Debug, Default, Clone)]
pub struct StaticProvider {
    series: std::collections::HashMap<String, PriceSeries>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.symbol().to_uppercase(), series);
    }
}

impl PriceProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let series = self
            .series
            .get(&symbol.to_uppercase())
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;
        let window = series.window(start, end);
        if window.is_empty() {
            return Err(DataError::EmptyWindow {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        Ok(window)
    }
}
