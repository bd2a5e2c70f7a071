//! Resolved matrix cells

use serde::Serialize;

use super::{CellContent, CellCoord, CellPatch};
use crate::style::StyleAttrs;

/// Position of an owner cell among the rendered cells
///
/// `x` counts rendered cells within the row, so it skips subsumed cells;
/// `y` is the row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RenderPos {
    pub x: usize,
    pub y: usize,
}

/// A cell of the resolved matrix
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub content: CellContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colspan: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rowspan: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "StyleAttrs::is_empty")]
    pub style: StyleAttrs,
    /// Set for owner cells once spans are resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderPos>,
    /// Set when another cell's span covers this one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subsumed_by: Option<CellCoord>,
}

impl Cell {
    /// Create an empty cell
    pub fn empty() -> Self {
        Self::default()
    }

    /// Effective column span (at least 1)
    pub fn colspan(&self) -> usize {
        self.colspan.map_or(1, |s| s.max(1) as usize)
    }

    /// Effective row span (at least 1)
    pub fn rowspan(&self) -> usize {
        self.rowspan.map_or(1, |s| s.max(1) as usize)
    }

    /// True if this cell covers more than itself
    pub fn is_spanning(&self) -> bool {
        self.colspan() > 1 || self.rowspan() > 1
    }

    /// True if no other cell's span covers this one
    pub fn is_owner(&self) -> bool {
        self.subsumed_by.is_none()
    }

    /// Apply a declared patch attribute by attribute
    pub fn apply(&mut self, patch: &CellPatch) {
        if let Some(content) = &patch.cell {
            self.content = content.clone();
        }
        if patch.colspan.is_some() {
            self.colspan = patch.colspan;
        }
        if patch.rowspan.is_some() {
            self.rowspan = patch.rowspan;
        }
        if patch.id.is_some() {
            self.id = patch.id.clone();
        }
        self.style.merge_from(&patch.style);
    }

    pub(crate) fn reset_spans(&mut self) {
        self.render = None;
        self.subsumed_by = None;
    }
}
