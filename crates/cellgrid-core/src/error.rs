//! Error types for cellgrid-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellgrid-core
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed coordinate text
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// A range rule that could not be parsed
    #[error("Unmatched range rule: {0}")]
    UnmatchedRange(String),

    /// Unknown style attribute name
    #[error("Unknown style attribute: {0}")]
    InvalidStyleKey(String),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (rows: {1})")]
    RowOutOfBounds(usize, usize),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (columns: {1})")]
    ColumnOutOfBounds(usize, usize),

    /// A coordinate lies beyond the configured growth limits
    #[error("Cell {address} exceeds the table limits ({max_rows} rows, {max_cols} columns)")]
    DimensionLimit {
        address: String,
        max_rows: usize,
        max_cols: usize,
    },

    /// The table declaration could not be decoded
    #[error("Invalid table declaration: {0}")]
    Declaration(#[from] serde_json::Error),
}
