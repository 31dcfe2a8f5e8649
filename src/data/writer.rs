use std::path::Path;

use anyhow::{bail, Context, Result};

use super::loader::ROW_ID_COLUMN;
use super::model::DataTable;

/// Write `table` as CSV with one extra column `label_column` holding each
/// row's bin label. Rows without a label get an empty cell.
pub fn write_csv(
    table: &DataTable,
    labels: &[Option<usize>],
    label_column: &str,
    path: &Path,
) -> Result<()> {
    if labels.len() != table.len() {
        bail!(
            "{} labels for a table of {} rows",
            labels.len(),
            table.len()
        );
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec![ROW_ID_COLUMN];
    header.extend(table.columns.iter().map(|c| c.name.as_str()));
    header.push(label_column);
    writer.write_record(&header).context("writing CSV header")?;

    for (row, label) in table.rows.iter().zip(labels) {
        let mut record: Vec<String> = Vec::with_capacity(row.cells.len() + 2);
        record.push(row.key.to_string());
        record.extend(row.cells.iter().map(|c| c.to_string()));
        record.push(label.map(|l| l.to_string()).unwrap_or_default());
        writer
            .write_record(&record)
            .with_context(|| format!("writing row {}", row.key))?;
    }

    writer.flush().context("flushing CSV output")?;
    Ok(())
}
