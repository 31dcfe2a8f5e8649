use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};

use super::interval::Interval;
use super::registry::BinRegistry;
use crate::data::model::RowKey;
use crate::error::{BinningError, Result};

/// Records processed between two checks of the cancel flag.
pub const CANCEL_CHECK_INTERVAL: usize = 1024;

// ---------------------------------------------------------------------------
// Assignment – outcome for one record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Landed in the bin with this index.
    Bin(usize),
    /// Value present but above the last upper bound.
    Unassigned,
    /// No value (or NaN) to bin.
    Missing,
}

impl Assignment {
    /// The derived `Bin Number` cell: only assigned records get a label.
    pub fn label(self) -> Option<usize> {
        match self {
            Assignment::Bin(i) => Some(i),
            Assignment::Unassigned | Assignment::Missing => None,
        }
    }
}

/// Locate the first interval whose upper bound is `>= value`.
///
/// Lower bounds are never checked, so anything below the first interval
/// lands in bin 0.
pub fn assign_value(value: Option<f64>, intervals: &[Interval]) -> Assignment {
    let value = match value {
        Some(v) if !v.is_nan() => v,
        _ => return Assignment::Missing,
    };
    // Upper bounds are non-decreasing, so the first match is a partition point.
    let idx = intervals.partition_point(|iv| iv.upper_bound < value);
    if idx < intervals.len() {
        Assignment::Bin(idx)
    } else {
        Assignment::Unassigned
    }
}

// ---------------------------------------------------------------------------
// CancelFlag – cooperative abort signal
// ---------------------------------------------------------------------------

/// Shared abort signal observed by the assignment pass.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// BinAssigner – fills a fresh registry from a record stream
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentStats {
    pub assigned: usize,
    pub unassigned: usize,
    pub missing: usize,
}

/// Fills one [`BinRegistry`] record by record.
pub struct BinAssigner {
    registry: BinRegistry,
    stats: AssignmentStats,
}

impl BinAssigner {
    pub fn new(intervals: Vec<Interval>) -> Result<Self> {
        Ok(BinAssigner {
            registry: BinRegistry::from_intervals(intervals)?,
            stats: AssignmentStats::default(),
        })
    }

    /// Bin one record, registering `key` as a member on success.
    pub fn assign(&mut self, key: &RowKey, value: Option<f64>) -> Result<Assignment> {
        let outcome = assign_value(value, self.registry.intervals().unwrap_or_default());
        match outcome {
            Assignment::Bin(idx) => {
                self.registry.add_member(idx, key.clone())?;
                self.stats.assigned += 1;
            }
            Assignment::Unassigned => {
                debug!("row {key}: value {value:?} above last bound, left unassigned");
                self.stats.unassigned += 1;
            }
            Assignment::Missing => self.stats.missing += 1,
        }
        Ok(outcome)
    }

    pub fn stats(&self) -> AssignmentStats {
        self.stats
    }

    pub fn finish(self) -> (BinRegistry, AssignmentStats) {
        (self.registry, self.stats)
    }
}

/// Run the whole assignment pass. Returns the filled registry and one label
/// per record, or `Cancelled` with nothing built if `cancel` fires. The flag
/// is checked before every [`CANCEL_CHECK_INTERVAL`]th record.
pub fn assign_all<I>(
    intervals: Vec<Interval>,
    records: I,
    cancel: &CancelFlag,
) -> Result<(BinRegistry, Vec<Option<usize>>)>
where
    I: IntoIterator<Item = (RowKey, Option<f64>)>,
{
    let records = records.into_iter();
    let mut assigner = BinAssigner::new(intervals)?;
    let mut labels = Vec::with_capacity(records.size_hint().0);

    for (i, (key, value)) in records.enumerate() {
        if i % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            info!("binning cancelled after {i} records");
            return Err(BinningError::Cancelled);
        }
        labels.push(assigner.assign(&key, value)?.label());
    }

    let (registry, stats) = assigner.finish();
    info!(
        "binned {} records into {} bins: {} assigned, {} unassigned, {} missing",
        labels.len(),
        registry.bin_count(),
        stats.assigned,
        stats.unassigned,
        stats.missing
    );
    Ok((registry, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::interval::compute_intervals;

    fn records(values: &[Option<f64>]) -> Vec<(RowKey, Option<f64>)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (RowKey::from_index(i), *v))
            .collect()
    }

    #[test]
    fn worked_example_three_bins() {
        let intervals = compute_intervals(0.0, 9.0, 3).unwrap();
        assert_eq!(assign_value(Some(3.0), &intervals), Assignment::Bin(0));
        assert_eq!(assign_value(Some(3.0001), &intervals), Assignment::Bin(1));
        assert_eq!(assign_value(Some(9.0), &intervals), Assignment::Bin(2));
        assert_eq!(assign_value(Some(9.5), &intervals), Assignment::Unassigned);
        assert_eq!(assign_value(None, &intervals), Assignment::Missing);
        assert_eq!(assign_value(None, &intervals).label(), None);
    }

    #[test]
    fn interior_boundaries_go_to_lower_bin() {
        let intervals = compute_intervals(0.0, 10.0, 10).unwrap();
        for (i, iv) in intervals.iter().enumerate() {
            assert_eq!(assign_value(Some(iv.upper_bound), &intervals), Assignment::Bin(i));
        }
        assert_eq!(assign_value(Some(0.0), &intervals), Assignment::Bin(0));
    }

    #[test]
    fn values_below_minimum_fall_into_first_bin() {
        let intervals = compute_intervals(0.0, 9.0, 3).unwrap();
        assert_eq!(assign_value(Some(-100.0), &intervals), Assignment::Bin(0));
    }

    #[test]
    fn nan_is_missing() {
        let intervals = compute_intervals(0.0, 1.0, 2).unwrap();
        assert_eq!(assign_value(Some(f64::NAN), &intervals), Assignment::Missing);
    }

    #[test]
    fn degenerate_range_puts_everything_in_first_bin() {
        let intervals = compute_intervals(5.0, 5.0, 4).unwrap();
        assert_eq!(assign_value(Some(5.0), &intervals), Assignment::Bin(0));
        assert_eq!(assign_value(Some(5.1), &intervals), Assignment::Unassigned);
    }

    #[test]
    fn membership_is_disjoint_and_complete() {
        let values = [
            Some(0.0), Some(1.5), None, Some(3.0), Some(4.2), Some(9.0),
            Some(6.0), Some(11.0), Some(8.9), None, Some(2.2),
        ];
        let intervals = compute_intervals(0.0, 9.0, 3).unwrap();
        let (registry, labels) = assign_all(intervals, records(&values), &CancelFlag::new()).unwrap();

        let expected_assigned = labels.iter().filter(|l| l.is_some()).count();
        assert_eq!(expected_assigned, 8);
        assert_eq!(registry.total_members(), expected_assigned);

        let mut seen = std::collections::HashSet::new();
        for bin in registry.bins() {
            for key in bin.members() {
                assert!(seen.insert(key.clone()), "{key} in more than one bin");
            }
        }
        assert_eq!(labels[2], None);
        assert_eq!(labels[7], None);
        assert_eq!(labels[3], Some(0));
        assert_eq!(labels[6], Some(1));
    }

    #[test]
    fn assigning_same_key_twice_keeps_one_member() {
        let intervals = compute_intervals(0.0, 1.0, 1).unwrap();
        let mut assigner = BinAssigner::new(intervals).unwrap();
        let key = RowKey::from("dup");
        assigner.assign(&key, Some(0.5)).unwrap();
        assigner.assign(&key, Some(0.7)).unwrap();
        let (registry, stats) = assigner.finish();
        assert_eq!(registry.size_of(0).unwrap(), 1);
        assert_eq!(stats.assigned, 2);
    }

    #[test]
    fn cancelled_pass_builds_nothing() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let intervals = compute_intervals(0.0, 1.0, 2).unwrap();
        let result = assign_all(intervals, records(&[Some(0.2), Some(0.9)]), &cancel);
        assert!(matches!(result, Err(BinningError::Cancelled)));
    }

    #[test]
    fn cancel_during_pass_is_seen_at_next_batch() {
        use std::cell::Cell;

        let cancel = CancelFlag::new();
        let pulled = Cell::new(0usize);
        let fire_at = CANCEL_CHECK_INTERVAL + 10;
        let feed = (0..3 * CANCEL_CHECK_INTERVAL).map(|i| {
            pulled.set(pulled.get() + 1);
            if i == fire_at {
                cancel.cancel();
            }
            (RowKey::from_index(i), Some(0.5))
        });

        let intervals = compute_intervals(0.0, 1.0, 2).unwrap();
        let result = assign_all(intervals, feed, &cancel);
        assert!(matches!(result, Err(BinningError::Cancelled)));
        // Two full batches ran, the third record batch stopped at its first record.
        assert_eq!(pulled.get(), 2 * CANCEL_CHECK_INTERVAL + 1);
    }
}
