//! Data layer: records, column specs, and file loaders.
//!
//! Everything above this layer treats the collection as immutable; edits
//! arrive as a whole new collection from the caller.

pub mod column;
pub mod loaders;
pub mod record;

pub use column::{columns_from_records, ColumnSpec};
pub use loaders::{load_path, records_from_json, RecordSet};
pub use record::{CellValue, Record};
