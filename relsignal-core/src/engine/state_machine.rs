//! Divergence signal state machine.
//!
//! Scans indices 2..n in order. At each index:
//! 1. A crossover at this index re-arms the machine and releases the latch.
//! 2. The slope two steps back is compared with the slope at this index.
//! 3. BUY is checked first; SELL only if BUY did not fire.
//!
//! The two-step look-back (`slope[i-2]` vs `slope[i]`) smooths single-day noise.

use tracing::debug;

use super::state::{ArmState, CrossoverPolicy, EngineState};
use crate::domain::{CrossoverEvent, SignalEvent, SignalKind};
use crate::error::SignalError;
use crate::indicators::SlopeSeries;

/// Run the normative policy (`CrossoverPolicy::DivergenceRecheck`).
pub fn run(
    crossovers: &[CrossoverEvent],
    slope: &SlopeSeries,
    divergence: &[f64],
) -> Result<Vec<SignalEvent>, SignalError> {
    run_with_policy(CrossoverPolicy::DivergenceRecheck, crossovers, slope, divergence)
}

/// Run the state machine under an explicit policy.
///
/// `crossovers` must be ordered by index. Fails only when `slope` and
/// `divergence` differ in length. Fewer than 3 points yields no events.
pub fn run_with_policy(
    policy: CrossoverPolicy,
    crossovers: &[CrossoverEvent],
    slope: &SlopeSeries,
    divergence: &[f64],
) -> Result<Vec<SignalEvent>, SignalError> {
    let slope = slope.values();
    if slope.len() != divergence.len() {
        return Err(SignalError::alignment(format!(
            "slope has {} points, divergence has {}",
            slope.len(),
            divergence.len()
        )));
    }

    let n = slope.len();
    let mut state = EngineState::new();
    let mut signals = Vec::new();
    let mut pending = crossovers.iter().peekable();

    for i in 2..n {
        // Crossovers before the scan window never arm the machine.
        while pending.next_if(|c| c.index < i).is_some() {}
        if let Some(cross) = pending.next_if(|c| c.index == i) {
            state.on_crossover(cross, slope[i]);
        }

        let prev = slope[i - 2];
        let curr = slope[i];

        let fired = match policy {
            CrossoverPolicy::DivergenceRecheck => divergence_recheck(&state, prev, curr, divergence[i]),
            CrossoverPolicy::CrossingSlope => crossing_slope(&state, i, prev, curr),
        };

        if let Some(kind) = fired {
            debug!(index = i, kind = %kind, prev_slope = prev, curr_slope = curr, "signal emitted");
            state.record(kind);
            signals.push(SignalEvent { kind, index: i });
        }
    }

    Ok(signals)
}

fn divergence_recheck(state: &EngineState, prev: f64, curr: f64, div: f64) -> Option<SignalKind> {
    let buy = state.arm == ArmState::ArmedBelow
        && prev < 0.0
        && curr > 0.0
        && div < 0.0
        && state.can_emit(SignalKind::Buy);
    if buy {
        return Some(SignalKind::Buy);
    }

    let sell = state.arm == ArmState::ArmedAbove
        && prev > 0.0
        && curr < 0.0
        && div > 0.0
        && state.can_emit(SignalKind::Sell);
    sell.then_some(SignalKind::Sell)
}

fn crossing_slope(state: &EngineState, i: usize, prev: f64, curr: f64) -> Option<SignalKind> {
    let crossed_before = matches!(state.last_cross_index, Some(idx) if idx < i);
    if !crossed_before {
        return None;
    }

    if prev < 0.0 && curr > 0.0 && state.last_cross_slope < 0.0 && state.can_emit(SignalKind::Buy)
    {
        return Some(SignalKind::Buy);
    }
    let sell =
        prev > 0.0 && curr < 0.0 && state.last_cross_slope > 0.0 && state.can_emit(SignalKind::Sell);
    sell.then_some(SignalKind::Sell)
}
