use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{BinningError, Result};

/// Largest accepted number of bins.
pub const MAX_NUMBER_OF_BINS: i64 = i32::MAX as i64;

// ---------------------------------------------------------------------------
// Interval – one equal-width slice of the value range
// ---------------------------------------------------------------------------

/// Half-open interval `(lower_bound, upper_bound]`. The first interval of a
/// sequence is also closed on the low end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Interval {
    pub fn new(lower_bound: f64, upper_bound: f64) -> Self {
        Interval {
            lower_bound,
            upper_bound,
        }
    }

    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

/// Split `[min, max]` into `count` contiguous intervals of equal width.
///
/// The last upper bound is exactly `max`. `min == max` yields zero-width
/// intervals rather than an error. Non-finite bounds and `min > max` are
/// rejected with [`BinningError::InvalidRange`].
pub fn compute_intervals(min: f64, max: f64, count: i64) -> Result<Vec<Interval>> {
    if !(1..=MAX_NUMBER_OF_BINS).contains(&count) {
        return Err(BinningError::InvalidBinCount(count));
    }
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(BinningError::InvalidRange { min, max });
    }
    let n = count as usize;
    let width = (max - min) / count as f64;

    let mut intervals: Vec<Interval> = Vec::new();
    intervals
        .try_reserve_exact(n)
        .map_err(|_| BinningError::InvalidBinCount(count))?;
    let mut lower = min;
    for i in 0..n {
        let upper = if i + 1 == n {
            max
        } else {
            min + (i + 1) as f64 * width
        };
        intervals.push(Interval::new(lower, upper));
        lower = upper;
    }

    debug!("computed {n} intervals over [{min}, {max}] with width {width}");
    Ok(intervals)
}

// ---------------------------------------------------------------------------
// IntervalModel – exportable summary of the bin boundaries
// ---------------------------------------------------------------------------

/// The boundaries of an executed binning, written out for downstream
/// consumers. Never read back: intervals are always recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalModel {
    pub number_of_bins: usize,
    pub intervals: Vec<Interval>,
}

impl IntervalModel {
    pub fn new(intervals: &[Interval]) -> Self {
        IntervalModel {
            number_of_bins: intervals.len(),
            intervals: intervals.to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous(intervals: &[Interval], lo: f64, hi: f64) {
        assert_eq!(intervals.first().unwrap().lower_bound, lo);
        assert_eq!(intervals.last().unwrap().upper_bound, hi);
        for pair in intervals.windows(2) {
            assert_eq!(pair[0].upper_bound, pair[1].lower_bound);
            assert!(pair[0].lower_bound <= pair[0].upper_bound);
        }
    }

    #[test]
    fn three_bins_over_zero_to_nine() {
        let intervals = compute_intervals(0.0, 9.0, 3).unwrap();
        assert_eq!(
            intervals,
            vec![
                Interval::new(0.0, 3.0),
                Interval::new(3.0, 6.0),
                Interval::new(6.0, 9.0),
            ]
        );
    }

    #[test]
    fn bounds_are_exact_for_awkward_ranges() {
        for &(lo, hi) in &[(0.0, 1.0), (-3.3, 7.1), (0.1, 0.7), (1e-9, 1e9)] {
            for n in [1, 2, 3, 7, 10, 33, 100] {
                let intervals = compute_intervals(lo, hi, n).unwrap();
                assert_eq!(intervals.len(), n as usize);
                assert_contiguous(&intervals, lo, hi);
            }
        }
    }

    #[test]
    fn equal_bounds_collapse_to_zero_width() {
        let intervals = compute_intervals(4.0, 4.0, 5).unwrap();
        assert_eq!(intervals.len(), 5);
        assert!(intervals.iter().all(|iv| iv.width() == 0.0));
        assert_contiguous(&intervals, 4.0, 4.0);
    }

    #[test]
    fn rejects_non_positive_count() {
        assert!(matches!(
            compute_intervals(0.0, 1.0, 0),
            Err(BinningError::InvalidBinCount(0))
        ));
        assert!(matches!(
            compute_intervals(0.0, 1.0, -2),
            Err(BinningError::InvalidBinCount(-2))
        ));
    }

    #[test]
    fn rejects_counts_beyond_i32() {
        assert!(matches!(
            compute_intervals(0.0, 1.0, i64::MAX),
            Err(BinningError::InvalidBinCount(i64::MAX))
        ));
        assert!(matches!(
            compute_intervals(0.0, 1.0, MAX_NUMBER_OF_BINS + 1),
            Err(BinningError::InvalidBinCount(_))
        ));
    }

    #[test]
    fn rejects_inverted_and_non_finite_bounds() {
        for (lo, hi) in [
            (2.0, 1.0),
            (f64::NAN, 1.0),
            (0.0, f64::NAN),
            (0.0, f64::INFINITY),
            (f64::NEG_INFINITY, 0.0),
        ] {
            assert!(
                matches!(compute_intervals(lo, hi, 3), Err(BinningError::InvalidRange { .. })),
                "[{lo}, {hi}] accepted"
            );
        }
    }

    #[test]
    fn interval_model_serializes_bounds() {
        let intervals = compute_intervals(0.0, 2.0, 2).unwrap();
        let json = IntervalModel::new(&intervals).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["numberOfBins"], 2);
        assert_eq!(value["intervals"][1]["lowerBound"], 1.0);
        assert_eq!(value["intervals"][1]["upperBound"], 2.0);
    }
}
