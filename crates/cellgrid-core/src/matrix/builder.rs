//! Building the dense matrix from a declaration and its overlays

use super::{resolve_spans, CellMatrix};
use crate::cell::CellCoord;
use crate::error::Error;
use crate::options::GridOptions;
use crate::overlay::OverlayMap;
use crate::table::TableDeclaration;

/// Builder that merges a [`TableDeclaration`] with overlay maps
///
/// Overlays are applied in order after the literal rows: first the
/// declaration's own data block, then each overlay added with
/// [`with_overlay`](Self::with_overlay). Later entries win attribute by
/// attribute.
///
/// # Example
///
/// ```
/// use cellgrid_core::{CellMatrixBuilder, OverlayMap, TableDeclaration};
///
/// let decl = TableDeclaration::with_size(3, 3);
/// let overlay: OverlayMap = [("E10", "x")].into_iter().collect();
/// let matrix = CellMatrixBuilder::new(&decl).with_overlay(&overlay).build();
/// assert_eq!(matrix.row_count(), 10);
/// assert_eq!(matrix.col_count(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct CellMatrixBuilder<'a> {
    declaration: &'a TableDeclaration,
    overlays: Vec<&'a OverlayMap>,
    options: GridOptions,
}

impl<'a> CellMatrixBuilder<'a> {
    /// Start building from a declaration
    pub fn new(declaration: &'a TableDeclaration) -> Self {
        Self {
            declaration,
            overlays: Vec::new(),
            options: GridOptions::default(),
        }
    }

    /// Layer an additional overlay on top of everything added before it
    pub fn with_overlay(mut self, overlay: &'a OverlayMap) -> Self {
        self.overlays.push(overlay);
        self
    }

    /// Use the given options
    pub fn with_options(mut self, options: &GridOptions) -> Self {
        self.options = options.clone();
        self
    }

    /// Build the matrix and resolve spans
    pub fn build(&self) -> CellMatrix {
        let decl = self.declaration;
        let mut matrix = CellMatrix::new(decl.declared_rows(), decl.declared_cols());

        for (y, row) in decl.rows.iter().enumerate() {
            for (x, entity) in row.row.iter().enumerate() {
                if let Some(cell) = matrix.get_mut(y, x) {
                    cell.apply(&entity.to_patch());
                }
            }
        }

        for overlay in decl.overlay().into_iter().chain(self.overlays.iter().copied()) {
            self.apply_overlay(&mut matrix, overlay);
        }

        resolve_spans(&mut matrix);
        matrix
    }

    fn apply_overlay(&self, matrix: &mut CellMatrix, overlay: &OverlayMap) {
        for (address, entity) in overlay.iter() {
            let coord = match CellCoord::parse(address) {
                Ok(coord) => coord,
                Err(e) => {
                    tracing::warn!("skipping overlay entry: {e}");
                    continue;
                }
            };

            if coord.row >= self.options.max_rows || coord.col >= self.options.max_cols {
                let e = Error::DimensionLimit {
                    address: address.to_string(),
                    max_rows: self.options.max_rows,
                    max_cols: self.options.max_cols,
                };
                tracing::warn!("skipping overlay entry: {e}");
                continue;
            }

            matrix.ensure_size(coord.row + 1, coord.col + 1);
            if let Some(cell) = matrix.cell_mut(coord) {
                cell.apply(&entity.to_patch());
            }
        }
    }
}
