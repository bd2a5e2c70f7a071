//! Row declarations

use serde::{Deserialize, Serialize};

use crate::cell::CellEntity;
use crate::style::StyleAttrs;

/// A literal row of the table declaration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowDecl {
    /// Cells of the row, left to right
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub row: Vec<CellEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Row-level style attributes
    #[serde(flatten)]
    pub style: StyleAttrs,
}

impl RowDecl {
    /// Create a row from its cells
    pub fn new<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CellEntity>,
    {
        Self {
            row: cells.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Number of declared cells
    pub fn len(&self) -> usize {
        self.row.len()
    }

    /// Check if the row declares no cells
    pub fn is_empty(&self) -> bool {
        self.row.is_empty()
    }
}
