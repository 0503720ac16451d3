//! Derived numeric series.
//!
//! Each stage takes the previous stage's output by reference and returns a
//! new, owned series. Nothing is mutated in place.

pub mod cumulative_return;
pub mod slope;

pub use cumulative_return::{compute_returns, ReturnSeries};
pub use slope::{compute_slope, SlopeSeries};

/// Create a price series from closes for testing, one calendar day apart.
#[cfg(test)]
pub fn make_series(symbol: &str, closes: &[f64]) -> crate::domain::PriceSeries {
    use crate::domain::{PricePoint, PriceSeries};
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PricePoint::new(base_date + chrono::Duration::days(i as i64), open, close)
        })
        .collect();
    PriceSeries::new(symbol, points).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
