//! Output handling: the CSV table schema, title aggregation, and
//! spreadsheet conversion.
//!
//! The CSV table is the source of truth. Spreadsheet conversion and
//! aggregation both re-read it from disk rather than reusing in-memory
//! rows, so they always reflect exactly what was persisted.

pub mod aggregate;
pub mod table;
#[cfg(feature = "xlsx")]
pub mod xlsx;

pub use aggregate::aggregate_table;
pub use table::{AGG_COLUMNS, AggregatedRow, COLUMNS, OutputRow};
