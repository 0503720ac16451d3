//! CSV price loading.
//!
//! Each symbol lives in `<data_dir>/<SYMBOL>.csv` with at least the columns
//! `date,open,close` (ISO dates). Extra columns are ignored. Rows may be in
//! any order; they are sorted before the series is built, and duplicate
//! dates are rejected.

use chrono::NaiveDate;
use relsignal_core::data::{DataError, PriceProvider};
use relsignal_core::{PricePoint, PriceSeries};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    close: f64,
}

/// Price provider backed by a directory of per-symbol CSV files.
#[derive(Debug, Clone)]
pub struct CsvPriceProvider {
    data_dir: PathBuf,
}

impl CsvPriceProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the CSV file for `symbol`.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", symbol.to_uppercase()))
    }

    /// Load every row for `symbol`, unwindowed.
    pub fn load_all(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let file = std::fs::File::open(&path)?;
        read_series(symbol, file)
    }
}

/// Parse a price series from CSV text.
pub fn read_series(symbol: &str, reader: impl std::io::Read) -> Result<PriceSeries, DataError> {
    let malformed = |reason: String| DataError::Malformed {
        symbol: symbol.to_string(),
        reason,
    };

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut points = Vec::new();
    for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| malformed(format!("row {}: {e}", line + 1)))?;
        points.push(PricePoint::new(row.date, row.open, row.close));
    }
    points.sort_by_key(|p| p.date);

    Ok(PriceSeries::new(symbol.to_uppercase(), points)?)
}

impl PriceProvider for CsvPriceProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let series = self.load_all(symbol)?.window(start, end);
        if series.is_empty() {
            return Err(DataError::EmptyWindow {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        debug!(
            symbol,
            rows = series.len(),
            start = %start,
            end = %end,
            "loaded prices from csv"
        );
        Ok(series)
    }
}
