//! PricePoint and PriceSeries: the daily market data unit and its ordered container.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// Open and close for a single symbol on a single trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64, close: f64) -> Self {
        Self { date, open, close }
    }
}

/// Ordered daily prices for one symbol.
///
/// Dates are strictly increasing. Price positivity is not enforced here;
/// `compute_returns` rejects non-positive closes at the point of use.
/// Deserialization goes through `PriceSeries::new`, so the date order holds
/// for series read back from JSON as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceSeries")]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

#[derive(Deserialize)]
struct RawPriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl TryFrom<RawPriceSeries> for PriceSeries {
    type Error = SignalError;

    fn try_from(raw: RawPriceSeries) -> Result<Self, Self::Error> {
        Self::new(raw.symbol, raw.points)
    }
}

impl PriceSeries {
    /// Build a series, rejecting duplicate or out-of-order dates.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SignalError> {
        let symbol = symbol.into();
        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(SignalError::invalid_input(format!(
                "{symbol}: dates must be strictly increasing ({} followed by {})",
                pair[0].date, pair[1].date
            )));
        }
        Ok(Self { symbol, points })
    }

    /// Convenience constructor from parallel date/close slices (open = close).
    pub fn from_closes(
        symbol: impl Into<String>,
        dates: &[NaiveDate],
        closes: &[f64],
    ) -> Result<Self, SignalError> {
        if dates.len() != closes.len() {
            return Err(SignalError::invalid_input(format!(
                "dates and closes differ in length: {} vs {}",
                dates.len(),
                closes.len()
            )));
        }
        let points = dates
            .iter()
            .zip(closes)
            .map(|(&date, &close)| PricePoint::new(date, close, close))
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Sub-series with dates in `[start, end]` (inclusive).
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let points = self
            .points
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .copied()
            .collect();
        Self {
            symbol: self.symbol.clone(),
            points,
        }
    }

    /// Sub-series restricted to the given dates. `dates` must be sorted ascending.
    pub(crate) fn restrict_to(&self, dates: &[NaiveDate]) -> Self {
        let points = self
            .points
            .iter()
            .filter(|p| dates.binary_search(&p.date).is_ok())
            .copied()
            .collect();
        Self {
            symbol: self.symbol.clone(),
            points,
        }
    }
}
