//! Target/benchmark time alignment.
//!
//! Given two price series, restrict both to the dates they share. No
//! forward-fill: a date missing from either side is dropped from both.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::domain::PriceSeries;

/// Two price series restricted to a common date axis.
#[derive(Debug, Clone)]
pub struct AlignedPair {
    /// The common date axis (sorted ascending).
    pub dates: Vec<NaiveDate>,
    pub target: PriceSeries,
    pub benchmark: PriceSeries,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Align target and benchmark on the intersection of their dates.
pub fn align_pair(target: &PriceSeries, benchmark: &PriceSeries) -> AlignedPair {
    let target_dates: BTreeSet<NaiveDate> = target.points().iter().map(|p| p.date).collect();
    let dates: Vec<NaiveDate> = benchmark
        .points()
        .iter()
        .map(|p| p.date)
        .filter(|d| target_dates.contains(d))
        .collect();

    AlignedPair {
        target: target.restrict_to(&dates),
        benchmark: benchmark.restrict_to(&dates),
        dates,
    }
}
