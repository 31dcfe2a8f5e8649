/// Binning engine: boundaries, assignment and bin membership.
///
/// Architecture:
/// ```text
///   column values (RowKey, Option<f64>)
///        │
///        ▼
///   ┌──────────┐
///   │  range    │  (min, max) unless the column carries a domain
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ interval  │  N equal-width, contiguous intervals
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  assign   │  value → bin index, fills membership
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ registry  │  N bins: members, size, selected, highlighted
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ persist   │  membership ⇄ JSON internals file
///   └──────────┘
/// ```

pub mod assign;
pub mod interval;
pub mod persist;
pub mod range;
pub mod registry;

pub use assign::{assign_all, assign_value, Assignment, BinAssigner, CancelFlag};
pub use interval::{compute_intervals, Interval, IntervalModel, MAX_NUMBER_OF_BINS};
pub use range::scan_range;
pub use registry::{Bin, BinRegistry};
