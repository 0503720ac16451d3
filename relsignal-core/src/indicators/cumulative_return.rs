//! Cumulative percentage return.
//!
//! change[0] = 0, change[t] = (close[t] - close[t-1]) / close[t-1]
//! cumulative[t] = 100 * sum(change[0..=t])

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;
use crate::error::SignalError;

/// Cumulative percent returns, date-aligned with the source price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReturnSeries")]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawReturnSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TryFrom<RawReturnSeries> for ReturnSeries {
    type Error = SignalError;

    fn try_from(raw: RawReturnSeries) -> Result<Self, Self::Error> {
        Self::new(raw.dates, raw.values)
    }
}

impl ReturnSeries {
    /// Build directly from aligned dates and values.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, SignalError> {
        if dates.len() != values.len() {
            return Err(SignalError::invalid_input(format!(
                "return series dates and values differ in length: {} vs {}",
                dates.len(),
                values.len()
            )));
        }
        Ok(Self { dates, values })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Convert a price series into its cumulative percentage-return series.
///
/// Fails with `InvalidInput` for fewer than 2 points or any close that is
/// zero, negative, or not finite.
pub fn compute_returns(prices: &PriceSeries) -> Result<ReturnSeries, SignalError> {
    let points = prices.points();
    if points.len() < 2 {
        return Err(SignalError::invalid_input(format!(
            "{}: need at least 2 prices to compute returns, got {}",
            prices.symbol(),
            points.len()
        )));
    }
    if let Some(bad) = points
        .iter()
        .find(|p| !p.close.is_finite() || p.close <= 0.0)
    {
        return Err(SignalError::invalid_input(format!(
            "{}: non-positive close {} on {}",
            prices.symbol(),
            bad.close,
            bad.date
        )));
    }

    let mut values = Vec::with_capacity(points.len());
    let mut running = 0.0;
    values.push(0.0);
    for pair in points.windows(2) {
        running += (pair[1].close - pair[0].close) / pair[0].close;
        values.push(running * 100.0);
    }

    Ok(ReturnSeries {
        dates: prices.dates(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series, DEFAULT_EPSILON};

    #[test]
    fn returns_basic() {
        // Closes: 100, 110, 99
        // change: 0, 0.10, -0.10 -> cumulative %: 0, 10, 0
        let series = make_series("AAPL", &[100.0, 110.0, 99.0]);
        let returns = compute_returns(&series).unwrap();

        assert_eq!(returns.len(), 3);
        assert_eq!(returns.values()[0], 0.0);
        assert_approx(returns.values()[1], 10.0, DEFAULT_EPSILON);
        assert_approx(returns.values()[2], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn returns_sum_not_compound() {
        // 100 -> 98 -> 95: -2% then -3.0612% -> -5.0612 (sum, not product)
        let series = make_series("AAPL", &[100.0, 98.0, 95.0]);
        let returns = compute_returns(&series).unwrap();
        let expected = (-0.02 + (95.0 - 98.0) / 98.0) * 100.0;
        assert_approx(returns.values()[2], expected, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_prices_give_all_zero() {
        let series = make_series("SPY", &[50.0; 6]);
        let returns = compute_returns(&series).unwrap();
        assert!(returns.values().iter().all(|&r| r == 0.0));
    }

    #[test]
    fn keeps_date_alignment() {
        let series = make_series("SPY", &[1.0, 2.0, 3.0]);
        let returns = compute_returns(&series).unwrap();
        assert_eq!(returns.dates(), series.dates().as_slice());
    }

    #[test]
    fn rejects_short_series() {
        let err = compute_returns(&make_series("SPY", &[100.0])).unwrap_err();
        assert!(err.is_invalid_input());
        let err = compute_returns(&make_series("SPY", &[])).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn rejects_zero_close() {
        let err = compute_returns(&make_series("SPY", &[100.0, 0.0, 50.0])).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn rejects_negative_close() {
        let err = compute_returns(&make_series("SPY", &[-1.0, 2.0])).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn rejects_nan_close() {
        let err = compute_returns(&make_series("SPY", &[1.0, f64::NAN])).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn deserialize_rejects_length_mismatch() {
        let json = r#"{"dates":["2024-01-02","2024-01-03"],"values":[0.0]}"#;
        assert!(serde_json::from_str::<ReturnSeries>(json).is_err());

        let series = make_series("AAPL", &[100.0, 98.0, 95.0]);
        let returns = compute_returns(&series).unwrap();
        let json = serde_json::to_string(&returns).unwrap();
        assert_eq!(serde_json::from_str::<ReturnSeries>(&json).unwrap(), returns);
    }

    #[test]
    fn deterministic() {
        let series = make_series("AAPL", &[100.0, 98.0, 95.0, 97.0, 101.0]);
        assert_eq!(
            compute_returns(&series).unwrap(),
            compute_returns(&series).unwrap()
        );
    }
}
