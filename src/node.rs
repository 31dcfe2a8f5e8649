use std::path::Path;

use log::{info, warn};

use crate::binning::assign::{assign_all, CancelFlag};
use crate::binning::interval::{compute_intervals, IntervalModel};
use crate::binning::persist;
use crate::binning::range::scan_range;
use crate::binning::registry::BinRegistry;
use crate::data::model::{ColumnKind, ColumnSpec, DataTable};
use crate::error::{BinningError, Result};
use crate::settings::BinnerSettings;

/// Name of the derived column holding the bin index.
pub const OUTPUT_COLUMN_NAME: &str = "Bin Number";

// ---------------------------------------------------------------------------
// BinnerNode – engine state across configure / execute / save / load
// ---------------------------------------------------------------------------

/// The binning engine as a stateful object. The host drives it through
/// `configure`, `execute`, `reset` and the internals save / load hooks.
pub struct BinnerNode {
    settings: BinnerSettings,
    /// Bins of the last successful execution (or restored membership).
    bins: Option<BinRegistry>,
}

impl BinnerNode {
    pub fn new(settings: BinnerSettings) -> Self {
        Self {
            settings,
            bins: None,
        }
    }

    pub fn settings(&self) -> &BinnerSettings {
        &self.settings
    }

    /// Validate then apply new settings. Existing bins are dropped since they
    /// no longer match the configuration.
    pub fn load_settings(&mut self, settings: BinnerSettings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        self.reset();
        Ok(())
    }

    pub fn bins(&self) -> Option<&BinRegistry> {
        self.bins.as_ref()
    }

    pub fn bins_mut(&mut self) -> Option<&mut BinRegistry> {
        self.bins.as_mut()
    }

    /// Boundaries of the current execution, if any.
    pub fn interval_model(&self) -> Option<IntervalModel> {
        self.bins
            .as_ref()
            .and_then(BinRegistry::intervals)
            .map(IntervalModel::new)
    }

    /// Check the input table against the settings and describe the derived
    /// column. Fails fast; nothing is executed.
    pub fn configure(&self, table: &DataTable) -> Result<ColumnSpec> {
        self.settings.validate()?;
        if !table.has_numeric_column() {
            return Err(BinningError::NoNumericColumn);
        }
        match table.column_spec(&self.settings.column_name) {
            Some(spec) if spec.is_numeric() => {}
            _ => return Err(BinningError::ColumnNotFound(self.settings.column_name.clone())),
        }
        Ok(self.output_column_spec())
    }

    /// `Bin Number`, integer-valued with domain `[0, numberOfBins - 1]`.
    pub fn output_column_spec(&self) -> ColumnSpec {
        ColumnSpec {
            name: OUTPUT_COLUMN_NAME.to_string(),
            kind: ColumnKind::Numeric,
            domain: Some((0.0, (self.settings.bin_count() - 1) as f64)),
        }
    }

    /// Bin the configured column of `table`. Returns one label per row.
    ///
    /// On success the new bins replace the old ones; on any failure the node
    /// is left without bins.
    pub fn execute(&mut self, table: &DataTable, cancel: &CancelFlag) -> Result<Vec<Option<usize>>> {
        self.bins = None;
        self.configure(table)?;

        let column = &self.settings.column_name;
        let records = table.numeric_values(column)?;

        let (min, max) = match table.column_spec(column).and_then(|s| s.domain) {
            Some(domain) => {
                info!("using precomputed domain [{}, {}] of '{column}'", domain.0, domain.1);
                domain
            }
            None => scan_range(records.iter().map(|(_, v)| *v))?,
        };

        let intervals = compute_intervals(min, max, self.settings.number_of_bins)?;
        let (registry, labels) = assign_all(intervals, records, cancel)?;
        self.bins = Some(registry);
        Ok(labels)
    }

    pub fn reset(&mut self) {
        self.bins = None;
    }

    /// Persist bin membership into `dir`. A node without bins writes nothing.
    pub fn save_internals(&self, dir: &Path) -> Result<()> {
        match &self.bins {
            Some(bins) => persist::save_membership(bins, dir),
            None => Ok(()),
        }
    }

    /// Restore membership for the configured number of bins. On failure the
    /// node keeps no bins and the error is handed back.
    pub fn load_internals(&mut self, dir: &Path) -> Result<()> {
        self.bins = None;
        match persist::load_membership(dir, self.settings.bin_count()) {
            Ok(bins) => {
                self.bins = Some(bins);
                Ok(())
            }
            Err(e) => {
                warn!("could not restore bins from {}: {e}", dir.display());
                Err(e)
            }
        }
    }
}
