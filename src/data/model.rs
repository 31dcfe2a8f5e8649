use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BinningError;

// ---------------------------------------------------------------------------
// RowKey – opaque record identifier
// ---------------------------------------------------------------------------

/// Identifies one source record. Only ever compared for equality / ordering
/// when tracking membership, never used as a value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(String);

impl RowKey {
    pub fn new(key: impl Into<String>) -> Self {
        RowKey(key.into())
    }

    /// Key generated for the `index`-th row when the source carries none.
    pub fn from_index(index: usize) -> Self {
        RowKey(format!("Row{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        RowKey(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the input table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Float(f64),
    Integer(i64),
    String(String),
    Bool(bool),
    Null,
}

impl CellValue {
    /// Numeric reading of the cell. NaN counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    fn kind(&self) -> Option<ColumnKind> {
        match self {
            CellValue::Float(_) | CellValue::Integer(_) => Some(ColumnKind::Numeric),
            CellValue::String(_) => Some(ColumnKind::Text),
            CellValue::Bool(_) => Some(ColumnKind::Boolean),
            CellValue::Null => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnSpec – name, type and optional domain of one column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
    Boolean,
    /// Cells of more than one kind.
    Mixed,
}

/// Column metadata. `domain` carries precomputed `(min, max)` bounds when the
/// producer already knows them, which lets the binner skip range discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    pub domain: Option<(f64, f64)>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        ColumnSpec {
            name: name.into(),
            kind,
            domain: None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }
}

// ---------------------------------------------------------------------------
// DataRow / DataTable – the complete loaded dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DataRow {
    pub key: RowKey,
    /// One cell per column, aligned with [`DataTable::columns`].
    pub cells: Vec<CellValue>,
}

/// A row-oriented table with typed column specs.
#[derive(Debug, Clone)]
pub struct DataTable {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<DataRow>,
}

impl DataTable {
    /// Build a table, inferring each column's kind from its non-null cells.
    /// A column with no non-null cells is considered numeric.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<DataRow>) -> Self {
        let columns = column_names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let kind = rows
                    .iter()
                    .filter_map(|r| r.cells.get(idx).and_then(CellValue::kind))
                    .fold(None, |acc, k| match acc {
                        None => Some(k),
                        Some(prev) if prev == k => Some(prev),
                        Some(_) => Some(ColumnKind::Mixed),
                    })
                    .unwrap_or(ColumnKind::Numeric);
                ColumnSpec::new(name, kind)
            })
            .collect();
        DataTable { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_spec(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_numeric_column(&self) -> bool {
        self.columns.iter().any(ColumnSpec::is_numeric)
    }

    /// Attach precomputed bounds to a column. Bounds must be finite with
    /// `min <= max`.
    pub fn set_domain(&mut self, column: &str, min: f64, max: f64) -> Result<(), BinningError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(BinningError::InvalidRange { min, max });
        }
        let spec = self
            .columns
            .iter_mut()
            .find(|c| c.name == column)
            .ok_or_else(|| BinningError::ColumnNotFound(column.to_string()))?;
        spec.domain = Some((min, max));
        Ok(())
    }

    /// `(key, value)` pairs of one column in row order. Non-numeric cells
    /// and NaN come back as `None`.
    pub fn numeric_values(&self, column: &str) -> Result<Vec<(RowKey, Option<f64>)>, BinningError> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| BinningError::ColumnNotFound(column.to_string()))?;
        Ok(self
            .rows
            .iter()
            .map(|row| {
                let value = row.cells.get(idx).and_then(CellValue::as_f64);
                (row.key.clone(), value)
            })
            .collect())
    }
}
