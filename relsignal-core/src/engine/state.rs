//! Engine configuration and per-run state.

use serde::{Deserialize, Serialize};

use crate::domain::{CrossDirection, CrossoverEvent, SignalKind};

/// How a crossover arms the state machine and what it checks before emitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossoverPolicy {
    /// Arm by crossover direction, require a slope reversal and re-check the
    /// divergence sign at the emission index. Emission may happen on the
    /// crossover index itself.
    #[default]
    DivergenceRecheck,
    /// Arm by the sign of the slope at the crossover index, require a slope
    /// reversal strictly after the crossover. No divergence re-check.
    CrossingSlope,
}

impl CrossoverPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            CrossoverPolicy::DivergenceRecheck => "divergence-recheck",
            CrossoverPolicy::CrossingSlope => "crossing-slope",
        }
    }
}

impl std::str::FromStr for CrossoverPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "divergence-recheck" => Ok(CrossoverPolicy::DivergenceRecheck),
            "crossing-slope" => Ok(CrossoverPolicy::CrossingSlope),
            other => Err(format!(
                "unknown crossover policy '{other}' (expected divergence-recheck or crossing-slope)"
            )),
        }
    }
}

/// Minimum number of common dates the engine needs to evaluate a pair.
pub const MIN_COMMON_DATES: usize = 3;

/// Immutable engine configuration. Holds no per-run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub policy: CrossoverPolicy,
    /// Common dates required after aligning target and benchmark.
    pub min_common_dates: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: CrossoverPolicy::DivergenceRecheck,
            min_common_dates: MIN_COMMON_DATES,
        }
    }
}

impl EngineConfig {
    pub fn with_policy(policy: CrossoverPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }
}

/// Which signal the last crossover made eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmState {
    NoActiveCrossover,
    ArmedBelow,
    ArmedAbove,
}

impl From<CrossDirection> for ArmState {
    fn from(direction: CrossDirection) -> Self {
        match direction {
            CrossDirection::TargetNowBelow => ArmState::ArmedBelow,
            CrossDirection::TargetNowAbove => ArmState::ArmedAbove,
        }
    }
}

/// State carried across one scan. Created fresh per run, never shared.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub arm: ArmState,
    pub last_cross_index: Option<usize>,
    /// Slope of the target at the last crossover index.
    pub last_cross_slope: f64,
    /// Latch: most recently emitted kind since the last crossover.
    pub last_emitted: Option<SignalKind>,
}

impl EngineState {
    pub fn new() -> Self {
        Self {
            arm: ArmState::NoActiveCrossover,
            last_cross_index: None,
            last_cross_slope: 0.0,
            last_emitted: None,
        }
    }

    /// Re-arm on a fresh crossover and release the latch.
    pub fn on_crossover(&mut self, event: &CrossoverEvent, slope_at_cross: f64) {
        self.arm = event.direction.into();
        self.last_cross_index = Some(event.index);
        self.last_cross_slope = slope_at_cross;
        self.last_emitted = None;
    }

    pub fn can_emit(&self, kind: SignalKind) -> bool {
        self.last_emitted != Some(kind)
    }

    pub fn record(&mut self, kind: SignalKind) {
        self.last_emitted = Some(kind);
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_unarmed() {
        let state = EngineState::new();
        assert_eq!(state.arm, ArmState::NoActiveCrossover);
        assert_eq!(state.last_cross_index, None);
        assert!(state.can_emit(SignalKind::Buy));
        assert!(state.can_emit(SignalKind::Sell));
    }

    #[test]
    fn crossover_rearms_and_releases_latch() {
        let mut state = EngineState::new();
        state.record(SignalKind::Buy);
        assert!(!state.can_emit(SignalKind::Buy));

        state.on_crossover(
            &CrossoverEvent {
                index: 7,
                direction: CrossDirection::TargetNowBelow,
            },
            -1.5,
        );
        assert_eq!(state.arm, ArmState::ArmedBelow);
        assert_eq!(state.last_cross_index, Some(7));
        assert_eq!(state.last_cross_slope, -1.5);
        assert!(state.can_emit(SignalKind::Buy));
    }

    #[test]
    fn policy_parses_from_kebab_case() {
        assert_eq!(
            "crossing-slope".parse::<CrossoverPolicy>().unwrap(),
            CrossoverPolicy::CrossingSlope
        );
        assert!("slope".parse::<CrossoverPolicy>().is_err());
        assert_eq!(CrossoverPolicy::default().name(), "divergence-recheck");
    }

    #[test]
    fn config_defaults_from_partial_toml_style_json() {
        let config: EngineConfig = serde_json::from_str(r#"{"policy":"crossing-slope"}"#).unwrap();
        assert_eq!(config.policy, CrossoverPolicy::CrossingSlope);
        assert_eq!(config.min_common_dates, MIN_COMMON_DATES);
    }
}
