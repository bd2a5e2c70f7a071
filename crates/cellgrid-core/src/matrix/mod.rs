//! The resolved dense cell matrix
//!
//! - [`CellMatrix`] - Dense rows x cols grid of resolved [`Cell`]s
//! - [`CellMatrixBuilder`] - Merges a declaration and overlays into a matrix
//! - [`resolve_spans`] - Assigns span ownership and render positions

mod builder;
mod span;

pub use builder::CellMatrixBuilder;
pub use span::resolve_spans;

use serde::Serialize;

use crate::cell::{Cell, CellContent, CellCoord};
use crate::error::{Error, Result};

/// A dense, rectangular grid of cells
///
/// Every row has exactly [`col_count`](Self::col_count) cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CellMatrix {
    rows: Vec<Vec<Cell>>,
    #[serde(skip)]
    cols: usize,
}

impl CellMatrix {
    /// Create a `rows` x `cols` matrix of empty cells
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: (0..rows).map(|_| vec![Cell::empty(); cols]).collect(),
            cols,
        }
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn col_count(&self) -> usize {
        self.cols
    }

    /// True if the matrix has no cells
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols == 0
    }

    /// Check whether a coordinate lies inside the matrix
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.row < self.rows.len() && coord.col < self.cols
    }

    /// Get a cell by row and column indices
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get a mutable cell by row and column indices
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Get a cell by coordinate
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.get(coord.row, coord.col)
    }

    /// Get a mutable cell by coordinate
    pub fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.get_mut(coord.row, coord.col)
    }

    /// Get a cell, failing with an index error when outside the matrix
    pub fn try_cell(&self, coord: CellCoord) -> Result<&Cell> {
        if coord.row >= self.rows.len() {
            return Err(Error::RowOutOfBounds(coord.row, self.rows.len()));
        }
        self.cell(coord)
            .ok_or(Error::ColumnOutOfBounds(coord.col, self.cols))
    }

    /// A row of cells
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Iterate owner cells in render order
    pub fn owners(&self) -> impl Iterator<Item = (CellCoord, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_owner())
                .map(move |(x, cell)| (CellCoord::new(y, x), cell))
        })
    }

    /// Follow the subsumed-by chain to the cell that owns `coord`
    ///
    /// Returns `None` when `coord` is outside the matrix. A broken chain (a
    /// back-reference leaving the matrix or looping) stops at the last cell
    /// reached.
    pub fn owner_of(&self, coord: CellCoord) -> Option<CellCoord> {
        let mut current = coord;
        let mut cell = self.cell(current)?;
        let mut steps = 0;
        while let Some(owner) = cell.subsumed_by {
            steps += 1;
            match self.cell(owner) {
                Some(next) if steps <= self.rows.len() * self.cols => {
                    current = owner;
                    cell = next;
                }
                _ => break,
            }
        }
        Some(current)
    }

    /// Grow the matrix to at least `rows` x `cols`, padding with empty cells
    pub fn ensure_size(&mut self, rows: usize, cols: usize) {
        if cols > self.cols {
            for row in &mut self.rows {
                row.resize(cols, Cell::empty());
            }
            self.cols = cols;
        }
        if rows > self.rows.len() {
            let width = self.cols;
            self.rows.resize_with(rows, || vec![Cell::empty(); width]);
        }
    }

    /// Replace the content of one cell in place
    pub fn set_content(&mut self, coord: CellCoord, content: CellContent) -> Result<()> {
        self.try_cell(coord)?;
        if let Some(cell) = self.cell_mut(coord) {
            cell.content = content;
        }
        Ok(())
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Vec<Cell>] {
        &mut self.rows
    }
}
