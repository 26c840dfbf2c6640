/// Data layer: core types, loading, writing and the pure table transforms.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet / SQL rows
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  column names + Vec<Vec<Value>>
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────────────────┐
///   │ transform / aggregate / join   │  Table → Table
///   └────────────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  Table → .csv
///   └──────────┘
/// ```

pub mod aggregate;
pub mod join;
pub mod loader;
pub mod model;
pub mod transform;
pub mod writer;

pub use model::{Table, Value};

use thiserror::Error;

/// Failures raised by the table operations themselves (as opposed to I/O,
/// which is reported through `anyhow` with context at the call site).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("row {row}: expected {expected} values but found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("row {row}, column '{column}': value is not finite")]
    NotFinite { column: String, row: usize },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}
