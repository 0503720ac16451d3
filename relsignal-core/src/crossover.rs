//! Divergence and crossover detection between a target and its benchmark.
//!
//! A crossover at index i requires both d[i-1] and d[i] to be nonzero with
//! opposite signs. A transition that touches exactly zero is not a crossing,
//! so an exact tie never produces two events.

use crate::domain::{CrossDirection, CrossoverEvent};
use crate::error::SignalError;
use crate::indicators::ReturnSeries;

/// Pointwise divergence `target[i] - benchmark[i]`.
///
/// Fails with `Alignment` when the two series differ in length or dates.
pub fn divergence(target: &ReturnSeries, benchmark: &ReturnSeries) -> Result<Vec<f64>, SignalError> {
    check_alignment(target, benchmark)?;
    Ok(target
        .values()
        .iter()
        .zip(benchmark.values())
        .map(|(t, b)| t - b)
        .collect())
}

/// Indices where the divergence changes sign, in ascending order.
pub fn detect_crossovers(
    target: &ReturnSeries,
    benchmark: &ReturnSeries,
) -> Result<Vec<CrossoverEvent>, SignalError> {
    let d = divergence(target, benchmark)?;
    Ok(crossovers_from_divergence(&d))
}

/// Crossovers over an already-computed divergence sequence.
pub fn crossovers_from_divergence(d: &[f64]) -> Vec<CrossoverEvent> {
    d.windows(2)
        .enumerate()
        .filter(|(_, w)| w[0] != 0.0 && w[1] != 0.0 && (w[0] < 0.0) != (w[1] < 0.0))
        .map(|(i, w)| CrossoverEvent {
            index: i + 1,
            direction: if w[1] < 0.0 {
                CrossDirection::TargetNowBelow
            } else {
                CrossDirection::TargetNowAbove
            },
        })
        .collect()
}

fn check_alignment(target: &ReturnSeries, benchmark: &ReturnSeries) -> Result<(), SignalError> {
    if target.len() != benchmark.len() {
        return Err(SignalError::alignment(format!(
            "target has {} returns, benchmark has {}",
            target.len(),
            benchmark.len()
        )));
    }
    if let Some((t, b)) = target
        .dates()
        .iter()
        .zip(benchmark.dates())
        .find(|(t, b)| t != b)
    {
        return Err(SignalError::alignment(format!(
            "date mismatch: target {t} vs benchmark {b}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn returns(values: &[f64]) -> ReturnSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let dates = (0..values.len())
            .map(|i| base + chrono::Duration::days(i as i64))
            .collect();
        ReturnSeries::new(dates, values.to_vec()).unwrap()
    }

    #[test]
    fn flags_upward_crossing() {
        let target = returns(&[0.0, -2.0, -4.0, 1.0, 3.0]);
        let bench = returns(&[0.0; 5]);

        assert_eq!(
            divergence(&target, &bench).unwrap(),
            vec![0.0, -2.0, -4.0, 1.0, 3.0]
        );
        let crosses = detect_crossovers(&target, &bench).unwrap();
        assert_eq!(
            crosses,
            vec![CrossoverEvent {
                index: 3,
                direction: CrossDirection::TargetNowAbove
            }]
        );
    }

    #[test]
    fn flags_downward_crossing() {
        let target = returns(&[0.0, 1.0, 2.0, -1.0]);
        let bench = returns(&[0.0; 4]);
        let crosses = detect_crossovers(&target, &bench).unwrap();
        assert_eq!(crosses.len(), 1);
        assert_eq!(crosses[0].index, 3);
        assert_eq!(crosses[0].direction, CrossDirection::TargetNowBelow);
    }

    #[test]
    fn identical_series_never_cross() {
        let r = returns(&[0.0, 1.0, -3.0, 2.0, 0.5]);
        assert!(detect_crossovers(&r, &r).unwrap().is_empty());
    }

    #[test]
    fn touching_zero_is_not_a_crossing() {
        // -1 -> 0 -> 1 passes through an exact tie: no event at either step.
        let crosses = crossovers_from_divergence(&[-1.0, 0.0, 1.0]);
        assert!(crosses.is_empty());
    }

    #[test]
    fn tiny_magnitudes_still_cross() {
        // The product of these underflows to -0.0; the signs still differ.
        let crosses = crossovers_from_divergence(&[1e-200, -1e-200, 1e-300]);
        assert_eq!(
            crosses,
            vec![
                CrossoverEvent {
                    index: 1,
                    direction: CrossDirection::TargetNowBelow
                },
                CrossoverEvent {
                    index: 2,
                    direction: CrossDirection::TargetNowAbove
                },
            ]
        );
    }

    #[test]
    fn multiple_crossings_are_ordered() {
        let crosses = crossovers_from_divergence(&[0.0, 1.0, -1.0, -2.0, 3.0, -0.5]);
        let indices: Vec<usize> = crosses.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![2, 4, 5]);
        assert_eq!(crosses[0].direction, CrossDirection::TargetNowBelow);
        assert_eq!(crosses[1].direction, CrossDirection::TargetNowAbove);
        assert_eq!(crosses[2].direction, CrossDirection::TargetNowBelow);
    }

    #[test]
    fn length_mismatch_is_alignment_error() {
        let err = detect_crossovers(&returns(&[0.0, 1.0]), &returns(&[0.0, 1.0, 2.0])).unwrap_err();
        assert!(err.is_alignment());
    }

    #[test]
    fn date_mismatch_is_alignment_error() {
        let target = returns(&[0.0, 1.0, 2.0]);
        let shifted_dates = target
            .dates()
            .iter()
            .map(|d| *d + chrono::Duration::days(1))
            .collect();
        let bench = ReturnSeries::new(shifted_dates, vec![0.0; 3]).unwrap();
        assert!(divergence(&target, &bench).unwrap_err().is_alignment());
    }

    #[test]
    fn empty_divergence_has_no_crossings() {
        assert!(crossovers_from_divergence(&[]).is_empty());
        assert!(crossovers_from_divergence(&[1.0]).is_empty());
    }
}
