use std::collections::HashSet;

use log::debug;

use crate::binning::registry::BinRegistry;
use crate::data::model::RowKey;
use crate::error::Result;
use crate::hilite::{HiliteAuthority, HiliteEvent};

// ---------------------------------------------------------------------------
// SelectionCoordinator
// ---------------------------------------------------------------------------

/// Applies user selection to bins and keeps bin hilite flags in step with an
/// external [`HiliteAuthority`]. Bin indices arrive already resolved; hit
/// testing belongs to whoever draws the bins.
///
/// Hilite and unhilite are not inverses: a bin lights up only
/// when *all* its members are hilit, and goes dark as soon as *any* member
/// is unhilited.
pub struct SelectionCoordinator<A: HiliteAuthority> {
    authority: A,
}

impl<A: HiliteAuthority> SelectionCoordinator<A> {
    pub fn new(authority: A) -> Self {
        SelectionCoordinator { authority }
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    pub fn authority_mut(&mut self) -> &mut A {
        &mut self.authority
    }

    pub fn into_authority(self) -> A {
        self.authority
    }

    // -- selection --

    /// Select bin `index`. Without `additive` every other bin is deselected
    /// first. Selecting an already selected bin keeps it selected.
    pub fn select(&self, bins: &mut BinRegistry, index: usize, additive: bool) -> Result<()> {
        bins.bin(index)?;
        if !additive {
            clear_selection(bins);
        }
        bins.set_selected(index, true)
    }

    // -- outgoing requests --

    /// Ask the authority to hilite every member of the selected bins.
    /// Bin flags are left alone until the authority reports back.
    pub fn request_hilite(&mut self, bins: &BinRegistry) -> HashSet<RowKey> {
        let keys = selected_members(bins);
        debug!("requesting hilite of {} rows", keys.len());
        self.authority.fire_hilite(&keys);
        keys
    }

    pub fn request_unhilite(&mut self, bins: &BinRegistry) -> HashSet<RowKey> {
        let keys = selected_members(bins);
        debug!("requesting unhilite of {} rows", keys.len());
        self.authority.fire_unhilite(&keys);
        keys
    }

    pub fn request_clear_all(&mut self) {
        self.authority.fire_clear_all();
    }

    // -- incoming notifications --

    /// Mark every bin whose members are all in `hilit` as highlighted.
    /// Other bins keep their current flag.
    pub fn on_external_hilite(&self, bins: &mut BinRegistry, hilit: &HashSet<RowKey>) {
        for bin in bins.bins_mut() {
            if bin.is_subset_of(hilit) {
                bin.set_highlighted(true);
            }
        }
    }

    /// Clear the flag on every bin sharing at least one key with `unhilited`.
    pub fn on_external_unhilite(&self, bins: &mut BinRegistry, unhilited: &HashSet<RowKey>) {
        for bin in bins.bins_mut() {
            if bin.intersects(unhilited) {
                bin.set_highlighted(false);
            }
        }
    }

    pub fn on_external_clear_all(&self, bins: &mut BinRegistry) {
        for bin in bins.bins_mut() {
            bin.set_highlighted(false);
        }
    }

    /// Dispatch an event received from the authority.
    pub fn apply(&self, bins: &mut BinRegistry, event: &HiliteEvent) {
        match event {
            HiliteEvent::Hilite(hilit) => self.on_external_hilite(bins, hilit),
            HiliteEvent::Unhilite(keys) => self.on_external_unhilite(bins, keys),
            HiliteEvent::ClearAll => self.on_external_clear_all(bins),
        }
    }
}

pub fn clear_selection(bins: &mut BinRegistry) {
    for bin in bins.bins_mut() {
        bin.set_selected(false);
    }
}

/// Union of the members of all selected bins.
pub fn selected_members(bins: &BinRegistry) -> HashSet<RowKey> {
    bins.bins()
        .iter()
        .filter(|b| b.is_selected())
        .flat_map(|b| b.members().iter().cloned())
        .collect()
}
