/// Data layer: table types, loading, and writing.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → DataTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ DataTable │  Vec<DataRow> keyed by RowKey, typed ColumnSpecs
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  table + derived label column → .csv
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod writer;
