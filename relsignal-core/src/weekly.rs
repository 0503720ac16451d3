//! Weekly threshold strategy: flat percentage-change trigger.
//!
//! Days are bucketed into weeks that end on a Monday: a Monday closes its
//! own bucket, every other day belongs to the following Monday's bucket.
//! For each bucket, change = (last close - first open) / first open * 100.
//! change <= buy_pct → Buy, change >= sell_pct → Sell. Stateless.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{PricePoint, PriceSeries, SignalKind};
use crate::error::SignalError;

/// Percentage thresholds for the weekly trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyThresholds {
    /// Weekly change at or below this fires Buy.
    pub buy_pct: f64,
    /// Weekly change at or above this fires Sell.
    pub sell_pct: f64,
}

impl Default for WeeklyThresholds {
    fn default() -> Self {
        Self {
            buy_pct: -5.0,
            sell_pct: 10.0,
        }
    }
}

impl WeeklyThresholds {
    pub fn new(buy_pct: f64, sell_pct: f64) -> Result<Self, SignalError> {
        let thresholds = Self { buy_pct, sell_pct };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        if !self.buy_pct.is_finite() || !self.sell_pct.is_finite() {
            return Err(SignalError::invalid_input("weekly thresholds must be finite"));
        }
        if self.buy_pct >= self.sell_pct {
            return Err(SignalError::invalid_input(format!(
                "buy threshold {} must be below sell threshold {}",
                self.buy_pct, self.sell_pct
            )));
        }
        Ok(())
    }

    fn classify(&self, change_pct: f64) -> Option<SignalKind> {
        if change_pct <= self.buy_pct {
            Some(SignalKind::Buy)
        } else if change_pct >= self.sell_pct {
            Some(SignalKind::Sell)
        } else {
            None
        }
    }
}

/// A weekly trigger, labelled by the Monday that closes its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklySignal {
    pub week_end: NaiveDate,
    pub kind: SignalKind,
    pub close: f64,
    pub change_pct: f64,
}

/// Monday on or after `date`.
pub fn week_ending_monday(date: NaiveDate) -> NaiveDate {
    let ahead = (7 - date.weekday().num_days_from_monday()) % 7;
    date + Duration::days(i64::from(ahead))
}

/// Evaluate the weekly trigger over every bucket in the series.
pub fn weekly_signals(
    prices: &PriceSeries,
    thresholds: &WeeklyThresholds,
) -> Result<Vec<WeeklySignal>, SignalError> {
    thresholds.validate()?;

    let mut buckets: BTreeMap<NaiveDate, (PricePoint, PricePoint)> = BTreeMap::new();
    for point in prices.points() {
        buckets
            .entry(week_ending_monday(point.date))
            .and_modify(|(_, last)| *last = *point)
            .or_insert((*point, *point));
    }

    let mut signals = Vec::new();
    for (week_end, (first, last)) in buckets {
        let Some(change_pct) = change_pct(first.open, last.close) else {
            continue;
        };
        if let Some(kind) = thresholds.classify(change_pct) {
            signals.push(WeeklySignal {
                week_end,
                kind,
                close: last.close,
                change_pct,
            });
        }
    }
    Ok(signals)
}

/// Change from the first open to the last close of the calendar week
/// (Monday through Sunday) containing `today`.
pub fn weekly_performance(prices: &PriceSeries, today: NaiveDate) -> Option<f64> {
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let week_end = week_start + Duration::days(7);

    let mut in_week = prices
        .points()
        .iter()
        .filter(|p| p.date >= week_start && p.date < week_end);
    let first = in_week.next()?;
    let last = in_week.last().unwrap_or(first);
    change_pct(first.open, last.close)
}

fn change_pct(open: f64, close: f64) -> Option<f64> {
    if !open.is_finite() || !close.is_finite() || open <= 0.0 {
        return None;
    }
    Some((close - open) / open * 100.0)
}
