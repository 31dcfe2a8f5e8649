//! Equal-width numeric binning with per-bin membership, selection and
//! hilite tracking.
//!
//! ```text
//!   DataTable ──► BinnerNode::execute ──► labels (Bin Number column)
//!                        │
//!                        ▼
//!                   BinRegistry ◄──► SelectionCoordinator ◄──► HiliteAuthority
//! ```

pub mod binning;
pub mod data;
pub mod error;
pub mod hilite;
pub mod node;
pub mod selection;
pub mod settings;

pub use binning::{BinRegistry, CancelFlag, Interval};
pub use data::model::{DataTable, RowKey};
pub use error::{BinningError, Result};
pub use hilite::{HiliteAuthority, HiliteEvent, HiliteHandler};
pub use node::BinnerNode;
pub use selection::SelectionCoordinator;
pub use settings::BinnerSettings;
