//! Property tests for signal engine invariants.
//!
//! Uses proptest to verify:
//! 1. Determinism: identical input always yields identical output
//! 2. Ordering: events are strictly increasing by index
//! 3. Alternation: no same-kind repeat without an intervening crossover
//! 4. Latch reset: a fresh crossover always permits re-emission
//! 5. Shape: returns and slope preserve length; flat prices give zero returns

use chrono::NaiveDate;
use proptest::prelude::*;
use relsignal_core::crossover::detect_crossovers;
use relsignal_core::domain::{CrossDirection, CrossoverEvent};
use relsignal_core::engine::{run_with_policy, CrossoverPolicy, EngineConfig, SignalEngine};
use relsignal_core::{compute_returns, compute_slope, PricePoint, PriceSeries, SlopeSeries};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.95..1.05_f64, min_len..max_len).prop_map(|steps| {
        let mut price = 100.0;
        steps
            .into_iter()
            .map(|s| {
                price *= s;
                (price * 100.0).round() / 100.0
            })
            .collect()
    })
}

fn arb_policy() -> impl Strategy<Value = CrossoverPolicy> {
    prop_oneof![
        Just(CrossoverPolicy::DivergenceRecheck),
        Just(CrossoverPolicy::CrossingSlope),
    ]
}

fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
    let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PricePoint::new(base + chrono::Duration::days(i as i64), c, c))
        .collect();
    PriceSeries::new(symbol, points).unwrap()
}

fn equal_len_pair() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (3usize..60).prop_flat_map(|n| (arb_closes(n, n + 1), arb_closes(n, n + 1)))
}

// ── 1–3. Engine output invariants ────────────────────────────────────

proptest! {
    #[test]
    fn engine_is_deterministic((t, b) in equal_len_pair(), policy in arb_policy()) {
        let engine = SignalEngine::new(EngineConfig::with_policy(policy));
        let target = series("T", &t);
        let bench = series("B", &b);
        let first = engine.generate_signals(&target, &bench).unwrap();
        let second = engine.generate_signals(&target, &bench).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn events_strictly_increasing((t, b) in equal_len_pair(), policy in arb_policy()) {
        let engine = SignalEngine::new(EngineConfig::with_policy(policy));
        let signals = engine.generate_signals(&series("T", &t), &series("B", &b)).unwrap();
        for pair in signals.windows(2) {
            prop_assert!(pair[0].index < pair[1].index);
        }
        for s in &signals {
            prop_assert!(s.index >= 2 && s.index < t.len());
        }
    }

    #[test]
    fn same_kind_repeats_need_a_crossover((t, b) in equal_len_pair(), policy in arb_policy()) {
        let target = series("T", &t);
        let bench = series("B", &b);
        let engine = SignalEngine::new(EngineConfig::with_policy(policy));
        let signals = engine.generate_signals(&target, &bench).unwrap();

        let crosses = detect_crossovers(
            &compute_returns(&target).unwrap(),
            &compute_returns(&bench).unwrap(),
        ).unwrap();

        for pair in signals.windows(2) {
            if pair[0].kind == pair[1].kind {
                let reset = crosses
                    .iter()
                    .any(|c| c.index > pair[0].index && c.index <= pair[1].index);
                prop_assert!(reset, "repeated {:?} at {} and {}", pair[0].kind, pair[0].index, pair[1].index);
            }
        }
    }

    #[test]
    fn divergence_recheck_signals_match_divergence_sign((t, b) in equal_len_pair()) {
        let target = series("T", &t);
        let bench = series("B", &b);
        let tr = compute_returns(&target).unwrap();
        let br = compute_returns(&bench).unwrap();
        let signals = SignalEngine::default().generate_signals(&target, &bench).unwrap();
        for s in signals {
            let d = tr.values()[s.index] - br.values()[s.index];
            match s.kind {
                relsignal_core::SignalKind::Buy => prop_assert!(d < 0.0),
                relsignal_core::SignalKind::Sell => prop_assert!(d > 0.0),
            }
        }
    }
}

// ── 4. Latch reset ───────────────────────────────────────────────────

proptest! {
    /// With a persistently negative divergence and a repeating down/up slope,
    /// a crossover before every upturn lets every upturn emit BUY.
    #[test]
    fn fresh_crossover_permits_reemission(cycles in 2usize..8) {
        // slope pattern per cycle: -1, -1, +1 ; upturns at 2, 5, 8, ...
        let mut slope = Vec::new();
        for _ in 0..cycles {
            slope.extend_from_slice(&[-1.0, -1.0, 1.0]);
        }
        let n = slope.len();
        let divergence = vec![-1.0; n];
        let crossovers: Vec<CrossoverEvent> = (0..cycles)
            .map(|k| CrossoverEvent { index: 3 * k + 2, direction: CrossDirection::TargetNowBelow })
            .collect();

        let signals = run_with_policy(
            CrossoverPolicy::DivergenceRecheck,
            &crossovers,
            &SlopeSeries::from_values(slope.clone()),
            &divergence,
        ).unwrap();
        prop_assert_eq!(signals.len(), cycles);

        // Without the re-arming crossovers only the first upturn fires.
        let latched = run_with_policy(
            CrossoverPolicy::DivergenceRecheck,
            &crossovers[..1],
            &SlopeSeries::from_values(slope),
            &divergence,
        ).unwrap();
        prop_assert_eq!(latched.len(), 1);
    }
}

// ── 5. Shape ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn returns_and_slope_preserve_length(closes in arb_closes(2, 100)) {
        let returns = compute_returns(&series("T", &closes)).unwrap();
        prop_assert_eq!(returns.len(), closes.len());
        prop_assert_eq!(returns.values()[0], 0.0);
        let slope = compute_slope(&returns).unwrap();
        prop_assert_eq!(slope.len(), closes.len());
    }

    #[test]
    fn flat_prices_give_zero_returns(price in 1.0..500.0_f64, n in 2usize..50) {
        let returns = compute_returns(&series("T", &vec![price; n])).unwrap();
        prop_assert!(returns.values().iter().all(|&r| r == 0.0));
    }

    #[test]
    fn self_benchmark_never_crosses(closes in arb_closes(2, 60)) {
        let r = compute_returns(&series("T", &closes)).unwrap();
        prop_assert!(detect_crossovers(&r, &r).unwrap().is_empty());
    }
}
