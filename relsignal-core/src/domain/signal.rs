//! Crossover and signal events emitted by the detection stages.

use serde::{Deserialize, Serialize};

/// Which side of the benchmark the target lands on after a crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossDirection {
    TargetNowBelow,
    TargetNowAbove,
}

/// An index where the sign of (target − benchmark) divergence flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub index: usize,
    pub direction: CrossDirection,
}

/// Signal kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    Buy,
    Sell,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Buy => "BUY",
            SignalKind::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A BUY or SELL at a position in the aligned series.
///
/// Immutable once emitted. Mapping `index` back to a calendar date is the
/// consumer's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub kind: SignalKind,
    pub index: usize,
}

impl SignalEvent {
    pub fn buy(index: usize) -> Self {
        Self {
            kind: SignalKind::Buy,
            index,
        }
    }

    pub fn sell(index: usize) -> Self {
        Self {
            kind: SignalKind::Sell,
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_pads() {
        assert_eq!(SignalKind::Buy.to_string(), "BUY");
        assert_eq!(format!("{:<5}|", SignalKind::Sell), "SELL |");
    }

    #[test]
    fn signal_event_serializes_uppercase_kind() {
        let json = serde_json::to_string(&SignalEvent::sell(6)).unwrap();
        assert_eq!(json, r#"{"kind":"SELL","index":6}"#);
    }

    #[test]
    fn cross_direction_serializes_snake_case() {
        let json = serde_json::to_string(&CrossDirection::TargetNowBelow).unwrap();
        assert_eq!(json, r#""target_now_below""#);
    }
}
