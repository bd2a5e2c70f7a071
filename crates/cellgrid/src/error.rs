//! Error types for the table engine

use std::fmt;

use thiserror::Error;

use crate::session::EditPhase;

/// Boxed error returned by a document service
pub type ServiceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`EngineError`]
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by [`TableEngine`](crate::TableEngine)
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Table error: {0}")]
    Core(#[from] cellgrid_core::Error),

    /// The document service rejected a row or column change
    #[error("{operation} failed: {source}")]
    StructuralEditFailure {
        operation: StructuralOp,
        source: ServiceError,
    },

    #[error("Saving cell {address} failed: {source}")]
    SaveFailed {
        address: String,
        source: ServiceError,
    },

    #[error("Loading cell {address} failed: {source}")]
    LoadFailed {
        address: String,
        source: ServiceError,
    },

    /// A structural edit did not complete; the matrix must be rebuilt
    #[error("Table is waiting for a rebuild after a structural edit")]
    MatrixStale,

    #[error("No active cell")]
    NoActiveCell,

    #[error("Cannot {action} while {phase}")]
    InvalidEditState {
        action: &'static str,
        phase: EditPhase,
    },
}

/// A row or column change sent to the document service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralOp {
    AddRow(usize),
    RemoveRow(usize),
    AddColumn(usize),
    RemoveColumn(usize),
}

impl fmt::Display for StructuralOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralOp::AddRow(i) => write!(f, "Adding row {i}"),
            StructuralOp::RemoveRow(i) => write!(f, "Removing row {i}"),
            StructuralOp::AddColumn(i) => write!(f, "Adding column {i}"),
            StructuralOp::RemoveColumn(i) => write!(f, "Removing column {i}"),
        }
    }
}
