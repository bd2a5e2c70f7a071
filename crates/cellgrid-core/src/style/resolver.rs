//! Style cascades for tables, rows, columns and cells

use super::{StyleKey, StyleMap, StyleScope};
use crate::matrix::CellMatrix;
use crate::options::GridOptions;
use crate::table::TableDeclaration;

const PLACEHOLDER_HEIGHT: &str = "2em";
const PLACEHOLDER_WIDTH: &str = "1.5em";

/// Resolves effective styles against a declaration and its built matrix
///
/// Range rules are evaluated against the matrix dimensions, so the matrix
/// must have been built from the same declaration.
#[derive(Debug, Clone, Copy)]
pub struct StyleResolver<'a> {
    declaration: &'a TableDeclaration,
    matrix: &'a CellMatrix,
    options: &'a GridOptions,
}

impl<'a> StyleResolver<'a> {
    pub fn new(
        declaration: &'a TableDeclaration,
        matrix: &'a CellMatrix,
        options: &'a GridOptions,
    ) -> Self {
        Self {
            declaration,
            matrix,
            options,
        }
    }

    /// Effective style of the cell at (`row`, `col`)
    ///
    /// Stages, later ones overriding earlier ones per attribute:
    /// column cell attributes, the empty cell placeholder, flat cell
    /// defaults, ranged cell defaults in declaration order, and finally the
    /// cell's own attributes.
    pub fn cell_style(&self, row: usize, col: usize) -> StyleMap {
        let decl = self.declaration;
        let mut styles = StyleMap::new();

        if let Some(column) = decl.columns.get(col) {
            column.style.apply_to(&mut styles, StyleScope::ColumnCell);
        }

        let cell = self.matrix.get(row, col);
        if self.options.empty_cell_placeholder && cell.map_or(true, |c| c.content.is_empty()) {
            styles.insert(StyleKey::Height, PLACEHOLDER_HEIGHT);
            styles.insert(StyleKey::Width, PLACEHOLDER_WIDTH);
        }

        if let Some(def) = &decl.defcells {
            def.apply_to(&mut styles, StyleScope::Cell);
        }

        let (rows, cols) = (self.matrix.row_count(), self.matrix.col_count());
        for ranged in &decl.defcellsrange {
            if ranged.range.matches(rows, cols, row, col) {
                ranged.def.apply_to(&mut styles, StyleScope::Cell);
            }
        }

        if let Some(cell) = cell {
            cell.style.apply_to(&mut styles, StyleScope::Cell);
        }
        styles
    }

    /// Effective style of a whole row
    pub fn row_style(&self, row: usize) -> StyleMap {
        let decl = self.declaration;
        let mut styles = StyleMap::new();

        if let Some(def) = &decl.defrows {
            def.apply_to(&mut styles, StyleScope::Row);
        }
        let rows = self.matrix.row_count();
        for ranged in &decl.defrowsrange {
            if ranged.range.matches_index(rows, row) {
                ranged.def.apply_to(&mut styles, StyleScope::Row);
            }
        }
        if let Some(declared) = decl.rows.get(row) {
            declared.style.apply_to(&mut styles, StyleScope::Row);
        }
        styles
    }

    /// Effective style of a whole column
    pub fn column_style(&self, col: usize) -> StyleMap {
        let decl = self.declaration;
        let mut styles = StyleMap::new();

        if let Some(def) = &decl.defcols {
            def.apply_to(&mut styles, StyleScope::Column);
        }
        let cols = self.matrix.col_count();
        for ranged in &decl.defcolsrange {
            if ranged.range.matches_index(cols, col) {
                ranged.def.apply_to(&mut styles, StyleScope::Column);
            }
        }
        if let Some(declared) = decl.columns.get(col) {
            declared.style.apply_to(&mut styles, StyleScope::Column);
        }
        styles
    }

    /// Style of the table element
    pub fn table_style(&self) -> StyleMap {
        let mut styles = StyleMap::new();
        self.declaration
            .style
            .apply_to(&mut styles, StyleScope::Table);
        styles
    }
}
