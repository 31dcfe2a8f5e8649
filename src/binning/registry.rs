use std::collections::HashSet;

use log::debug;

use super::interval::Interval;
use crate::data::model::RowKey;
use crate::error::{BinningError, Result};

// ---------------------------------------------------------------------------
// Bin – members of one interval plus its UI flags
// ---------------------------------------------------------------------------

/// The rows that fell into one interval. Members keep insertion order;
/// adding a key twice is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Bin {
    members: Vec<RowKey>,
    lookup: HashSet<RowKey>,
    highlighted: bool,
    selected: bool,
}

impl Bin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the key was already a member.
    pub fn add_row(&mut self, key: RowKey) -> bool {
        if self.lookup.contains(&key) {
            return false;
        }
        self.lookup.insert(key.clone());
        self.members.push(key);
        true
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[RowKey] {
        &self.members
    }

    pub fn contains(&self, key: &RowKey) -> bool {
        self.lookup.contains(key)
    }

    /// Every member is in `keys`. Trivially true for an empty bin.
    pub fn is_subset_of(&self, keys: &HashSet<RowKey>) -> bool {
        self.members.iter().all(|k| keys.contains(k))
    }

    /// At least one member is in `keys`.
    pub fn intersects(&self, keys: &HashSet<RowKey>) -> bool {
        self.members.iter().any(|k| keys.contains(k))
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

// ---------------------------------------------------------------------------
// BinRegistry – the bin set of one execution
// ---------------------------------------------------------------------------

/// N bins, and when known the N index-aligned intervals they were filled
/// from. Intervals are absent after restoring persisted membership until the
/// next execution recomputes them.
#[derive(Debug, Clone)]
pub struct BinRegistry {
    bins: Vec<Bin>,
    intervals: Option<Vec<Interval>>,
}

impl BinRegistry {
    /// `count` empty bins without intervals.
    pub fn with_bins(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(BinningError::InvalidBinCount(0));
        }
        let mut bins: Vec<Bin> = Vec::new();
        bins.try_reserve_exact(count)
            .map_err(|_| BinningError::InvalidBinCount(i64::try_from(count).unwrap_or(i64::MAX)))?;
        bins.resize(count, Bin::new());
        Ok(BinRegistry {
            bins,
            intervals: None,
        })
    }

    /// One empty bin per interval.
    pub fn from_intervals(intervals: Vec<Interval>) -> Result<Self> {
        let mut registry = Self::with_bins(intervals.len())?;
        registry.intervals = Some(intervals);
        Ok(registry)
    }

    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    pub fn intervals(&self) -> Option<&[Interval]> {
        self.intervals.as_deref()
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn bin(&self, index: usize) -> Result<&Bin> {
        let count = self.bins.len();
        self.bins
            .get(index)
            .ok_or(BinningError::IndexOutOfRange { index, count })
    }

    fn bin_mut(&mut self, index: usize) -> Result<&mut Bin> {
        let count = self.bins.len();
        self.bins
            .get_mut(index)
            .ok_or(BinningError::IndexOutOfRange { index, count })
    }

    pub fn members_of(&self, index: usize) -> Result<&[RowKey]> {
        Ok(self.bin(index)?.members())
    }

    pub fn size_of(&self, index: usize) -> Result<usize> {
        Ok(self.bin(index)?.size())
    }

    /// Size of the largest bin; what a renderer scales bar heights against.
    pub fn max_size(&self) -> usize {
        self.bins.iter().map(Bin::size).max().unwrap_or(0)
    }

    /// Total number of member rows across all bins.
    pub fn total_members(&self) -> usize {
        self.bins.iter().map(Bin::size).sum()
    }

    pub(crate) fn add_member(&mut self, index: usize, key: RowKey) -> Result<bool> {
        Ok(self.bin_mut(index)?.add_row(key))
    }

    pub fn set_highlighted(&mut self, index: usize, highlighted: bool) -> Result<()> {
        self.bin_mut(index)?.set_highlighted(highlighted);
        Ok(())
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) -> Result<()> {
        self.bin_mut(index)?.set_selected(selected);
        Ok(())
    }

    pub(crate) fn bins_mut(&mut self) -> impl Iterator<Item = &mut Bin> {
        self.bins.iter_mut()
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.bins
            .iter()
            .enumerate()
            .filter(|(_, b)| b.selected)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn highlighted_indices(&self) -> Vec<usize> {
        self.bins
            .iter()
            .enumerate()
            .filter(|(_, b)| b.highlighted)
            .map(|(i, _)| i)
            .collect()
    }

    // -- persistence of membership --

    /// One ordered list of member keys per bin.
    pub fn serialize_membership(&self) -> Vec<Vec<RowKey>> {
        self.bins.iter().map(|b| b.members.clone()).collect()
    }

    /// Rebuild `count` empty bins and fill each from its list. The flags
    /// start cleared and no intervals are attached.
    pub fn deserialize_membership(data: Vec<Vec<RowKey>>, count: usize) -> Result<Self> {
        if data.len() != count {
            return Err(BinningError::SettingsCorrupt(format!(
                "expected membership for {count} bins, found {}",
                data.len()
            )));
        }
        let mut registry = Self::with_bins(count)
            .map_err(|_| BinningError::SettingsCorrupt("membership for zero bins".into()))?;
        for (bin, keys) in registry.bins.iter_mut().zip(data) {
            for key in keys {
                bin.add_row(key);
            }
        }
        debug!(
            "restored membership of {count} bins ({} rows)",
            registry.total_members()
        );
        Ok(registry)
    }
}
