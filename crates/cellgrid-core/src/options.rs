//! Grid resolution options

use crate::{MAX_COLS, MAX_ROWS};

/// Options controlling matrix building and style resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOptions {
    /// Largest row count an overlay entry may grow the matrix to
    pub max_rows: usize,
    /// Largest column count an overlay entry may grow the matrix to
    pub max_cols: usize,
    /// Give empty cells a placeholder height and width so they stay clickable
    pub empty_cell_placeholder: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            max_rows: MAX_ROWS,
            max_cols: MAX_COLS,
            empty_cell_placeholder: true,
        }
    }
}

impl GridOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the growth limits
    pub fn with_limits(mut self, max_rows: usize, max_cols: usize) -> Self {
        self.max_rows = max_rows;
        self.max_cols = max_cols;
        self
    }

    /// Enable or disable the empty-cell placeholder size
    pub fn with_empty_cell_placeholder(mut self, enabled: bool) -> Self {
        self.empty_cell_placeholder = enabled;
        self
    }
}
