//! Signal engine: aligns a target/benchmark pair and runs the signal pipeline.
//!
//! prices → cumulative returns → (target slope, divergence crossovers) →
//! state machine → ordered signal events.
//!
//! `SignalEngine` holds only immutable configuration. Every call builds its own
//! `EngineState`, so one engine can evaluate many symbols from many threads.

pub mod state;
pub mod state_machine;

pub use state::{ArmState, CrossoverPolicy, EngineConfig, EngineState, MIN_COMMON_DATES};
pub use state_machine::{run, run_with_policy};

use tracing::debug;

use crate::crossover::{crossovers_from_divergence, divergence};
use crate::data::align_pair;
use crate::domain::{PriceSeries, SignalEvent};
use crate::error::SignalError;
use crate::indicators::{compute_returns, compute_slope};

/// Stateless entry point for divergence signal generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalEngine {
    config: EngineConfig,
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate ordered BUY/SELL events for `target` relative to `benchmark`.
    ///
    /// Indices refer to the common-date axis of the two series. If either input
    /// has fewer than 3 points there is nothing to evaluate and the result is
    /// empty. Otherwise the intersection must hold at least
    /// `min_common_dates` dates or the call fails with `Alignment`.
    pub fn generate_signals(
        &self,
        target: &PriceSeries,
        benchmark: &PriceSeries,
    ) -> Result<Vec<SignalEvent>, SignalError> {
        if target.len() < MIN_COMMON_DATES || benchmark.len() < MIN_COMMON_DATES {
            debug!(
                target = target.symbol(),
                target_len = target.len(),
                benchmark_len = benchmark.len(),
                "series too short, no signals"
            );
            return Ok(Vec::new());
        }

        let aligned = align_pair(target, benchmark);
        let required = self.config.min_common_dates.max(MIN_COMMON_DATES);
        if aligned.len() < required {
            return Err(SignalError::alignment(format!(
                "{} and {} share {} dates, need at least {required}",
                target.symbol(),
                benchmark.symbol(),
                aligned.len()
            )));
        }

        let target_returns = compute_returns(&aligned.target)?;
        let benchmark_returns = compute_returns(&aligned.benchmark)?;
        let slope = compute_slope(&target_returns)?;
        let d = divergence(&target_returns, &benchmark_returns)?;
        let crossovers = crossovers_from_divergence(&d);

        let signals = run_with_policy(self.config.policy, &crossovers, &slope, &d)?;
        debug!(
            target = target.symbol(),
            benchmark = benchmark.symbol(),
            policy = self.config.policy.name(),
            dates = aligned.len(),
            crossovers = crossovers.len(),
            signals = signals.len(),
            "signal run complete"
        );
        Ok(signals)
    }
}

/// Generate signals with the default engine configuration.
pub fn generate_signals(
    target: &PriceSeries,
    benchmark: &PriceSeries,
) -> Result<Vec<SignalEvent>, SignalError> {
    SignalEngine::default().generate_signals(target, benchmark)
}
