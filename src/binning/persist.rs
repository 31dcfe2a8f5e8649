use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::registry::BinRegistry;
use crate::data::model::RowKey;
use crate::error::{BinningError, Result};

/// Name of the membership file inside a node's internals directory.
pub const INTERNALS_FILE_NAME: &str = "numeric_binner_internals.json";

/// On-disk layout: one record per bin with its ordered member keys.
///
/// ```json
/// {
///   "numberOfBins": 2,
///   "bins": [ { "rowIds": ["Row0", "Row3"] }, { "rowIds": [] } ]
/// }
/// ```
///
/// Interval bounds are not stored; they are recomputed from the live
/// configuration on every execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembershipFile {
    number_of_bins: usize,
    bins: Vec<BinRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinRecord {
    row_ids: Vec<RowKey>,
}

/// Write the registry's membership into `dir`.
pub fn save_membership(registry: &BinRegistry, dir: &Path) -> Result<()> {
    let doc = MembershipFile {
        number_of_bins: registry.bin_count(),
        bins: registry
            .serialize_membership()
            .into_iter()
            .map(|row_ids| BinRecord { row_ids })
            .collect(),
    };

    let path = dir.join(INTERNALS_FILE_NAME);
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer(&mut writer, &doc)?;
    writer.flush()?;

    info!(
        "saved membership of {} bins to {}",
        doc.number_of_bins,
        path.display()
    );
    Ok(())
}

/// Read membership for `expected_bins` bins back from `dir`.
///
/// Unparseable content, a stored count that disagrees with the stored
/// records, or a count different from `expected_bins` all yield
/// [`BinningError::SettingsCorrupt`].
pub fn load_membership(dir: &Path, expected_bins: usize) -> Result<BinRegistry> {
    let path = dir.join(INTERNALS_FILE_NAME);
    let reader = BufReader::new(File::open(&path)?);
    let doc: MembershipFile = serde_json::from_reader(reader).map_err(|e| {
        warn!("unreadable internals file {}: {e}", path.display());
        BinningError::SettingsCorrupt(format!("{}: {e}", path.display()))
    })?;

    if doc.number_of_bins != doc.bins.len() {
        return Err(BinningError::SettingsCorrupt(format!(
            "file declares {} bins but holds {}",
            doc.number_of_bins,
            doc.bins.len()
        )));
    }

    let data = doc.bins.into_iter().map(|b| b.row_ids).collect();
    let registry = BinRegistry::deserialize_membership(data, expected_bins)?;
    info!(
        "loaded membership of {} bins from {}",
        registry.bin_count(),
        path.display()
    );
    Ok(registry)
}
