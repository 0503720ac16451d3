//! Discrete slope of a return series.
//!
//! Interior: slope[t] = (r[t+1] - r[t-1]) / 2
//! Boundaries: slope[0] = r[1] - r[0], slope[n-1] = r[n-1] - r[n-2]

use serde::{Deserialize, Serialize};

use super::ReturnSeries;
use crate::error::SignalError;

/// Local trend of a return series, same length as its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeSeries(Vec<f64>);

impl SlopeSeries {
    pub fn from_values(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Central-difference slope with one-sided boundaries.
pub fn compute_slope(returns: &ReturnSeries) -> Result<SlopeSeries, SignalError> {
    Ok(SlopeSeries(gradient(returns.values())?))
}

fn gradient(r: &[f64]) -> Result<Vec<f64>, SignalError> {
    let n = r.len();
    if n < 2 {
        return Err(SignalError::invalid_input(format!(
            "need at least 2 returns to compute slope, got {n}"
        )));
    }

    let mut slope = vec![0.0; n];
    slope[0] = r[1] - r[0];
    slope[n - 1] = r[n - 1] - r[n - 2];
    for i in 1..n - 1 {
        slope[i] = (r[i + 1] - r[i - 1]) / 2.0;
    }
    Ok(slope)
}
