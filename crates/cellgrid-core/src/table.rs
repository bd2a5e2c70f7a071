//! The table declaration

use serde::{Deserialize, Serialize};

use crate::cell::{CellContent, CellCoord, CellEntity};
use crate::column::ColumnDecl;
use crate::error::{Error, Result};
use crate::overlay::{DataBlock, OverlayMap};
use crate::range::RangedDefault;
use crate::row::RowDecl;
use crate::style::StyleAttrs;

/// A sparse, attribute-driven table description
///
/// Declared counts, literal rows, default rules and an optional data block
/// overlay. The resolved matrix is built from this by
/// [`CellMatrixBuilder`](crate::CellMatrixBuilder).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_row: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_col: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<RowDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnDecl>,
    /// Flat defaults for every row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defrows: Option<StyleAttrs>,
    /// Flat defaults for every column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defcols: Option<StyleAttrs>,
    /// Flat defaults for every cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defcells: Option<StyleAttrs>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defrowsrange: Vec<RangedDefault>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defcolsrange: Vec<RangedDefault>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defcellsrange: Vec<RangedDefault>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabledatablock: Option<DataBlock>,
    /// Attributes of the table element itself
    #[serde(flatten)]
    pub style: StyleAttrs,
}

impl TableDeclaration {
    /// Create an empty declaration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a declaration of `rows` x `cols` empty cells
    pub fn with_size(rows: usize, cols: usize) -> Self {
        Self {
            count_row: Some(rows),
            count_col: Some(cols),
            ..Self::default()
        }
    }

    /// Decode a declaration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the declaration as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Declared rows: the larger of `countRow` and the literal rows
    pub fn declared_rows(&self) -> usize {
        self.count_row.unwrap_or(0).max(self.rows.len())
    }

    /// Declared columns: the larger of `countCol` and the widest literal row
    pub fn declared_cols(&self) -> usize {
        self.rows
            .iter()
            .map(RowDecl::len)
            .fold(self.count_col.unwrap_or(0), usize::max)
    }

    /// The data block overlay, if any
    pub fn overlay(&self) -> Option<&OverlayMap> {
        self.tabledatablock.as_ref().map(|b| &b.cells)
    }

    /// Rows and columns covered by literal rows, counts and the data block
    pub fn extent(&self) -> (usize, usize) {
        let (rows, cols) = self.overlay().map_or((0, 0), OverlayMap::extent);
        (rows.max(self.declared_rows()), cols.max(self.declared_cols()))
    }

    /// Stored content of a cell: the data block wins over the literal rows
    pub fn cell_content(&self, coord: CellCoord) -> CellContent {
        if let Some(content) = self
            .overlay()
            .and_then(|o| o.get_at(coord))
            .and_then(CellEntity::content)
        {
            return content.clone();
        }
        self.rows
            .get(coord.row)
            .and_then(|r| r.row.get(coord.col))
            .and_then(CellEntity::content)
            .cloned()
            .unwrap_or_default()
    }

    /// Store content for a cell
    ///
    /// A cell that already has a data block entry is updated there; otherwise
    /// the literal rows are extended as needed and the literal cell updated.
    pub fn set_cell_content(&mut self, coord: CellCoord, content: CellContent) {
        if let Some(block) = &mut self.tabledatablock {
            if block.cells.get_at(coord).is_some() {
                block.cells.set_content(coord, content);
                return;
            }
        }

        if self.rows.len() <= coord.row {
            self.rows.resize_with(coord.row + 1, RowDecl::default);
        }
        let row = &mut self.rows[coord.row].row;
        if row.len() <= coord.col {
            row.resize(coord.col + 1, CellEntity::Plain(CellContent::Empty));
        }
        match &mut row[coord.col] {
            CellEntity::Plain(existing) => *existing = content,
            CellEntity::Styled(patch) => patch.cell = Some(content),
        }
    }

    /// Insert an empty row before `at` (`at == rows` appends)
    pub fn insert_row(&mut self, at: usize) -> Result<()> {
        let (rows, _) = self.extent();
        if at > rows {
            return Err(Error::RowOutOfBounds(at, rows));
        }
        if at <= self.rows.len() {
            self.rows.insert(at, RowDecl::default());
        }
        if let Some(count) = &mut self.count_row {
            if at <= *count {
                *count += 1;
            }
        }
        if let Some(block) = &mut self.tabledatablock {
            block.cells.insert_row(at);
        }
        Ok(())
    }

    /// Remove row `at`
    pub fn remove_row(&mut self, at: usize) -> Result<()> {
        let (rows, _) = self.extent();
        if at >= rows {
            return Err(Error::RowOutOfBounds(at, rows));
        }
        if at < self.rows.len() {
            self.rows.remove(at);
        }
        if let Some(count) = &mut self.count_row {
            if at < *count {
                *count -= 1;
            }
        }
        if let Some(block) = &mut self.tabledatablock {
            block.cells.remove_row(at);
        }
        Ok(())
    }

    /// Insert an empty column before `at` (`at == cols` appends)
    pub fn insert_column(&mut self, at: usize) -> Result<()> {
        let (_, cols) = self.extent();
        if at > cols {
            return Err(Error::ColumnOutOfBounds(at, cols));
        }
        for row in &mut self.rows {
            if at <= row.row.len() && !row.row.is_empty() {
                row.row.insert(at, CellEntity::Plain(CellContent::Empty));
            }
        }
        if at <= self.columns.len() && !self.columns.is_empty() {
            self.columns.insert(at, ColumnDecl::default());
        }
        if let Some(count) = &mut self.count_col {
            if at <= *count {
                *count += 1;
            }
        }
        if let Some(block) = &mut self.tabledatablock {
            block.cells.insert_column(at);
        }
        Ok(())
    }

    /// Remove column `at`
    pub fn remove_column(&mut self, at: usize) -> Result<()> {
        let (_, cols) = self.extent();
        if at >= cols {
            return Err(Error::ColumnOutOfBounds(at, cols));
        }
        for row in &mut self.rows {
            if at < row.row.len() {
                row.row.remove(at);
            }
        }
        if at < self.columns.len() {
            self.columns.remove(at);
        }
        if let Some(count) = &mut self.count_col {
            if at < *count {
                *count -= 1;
            }
        }
        if let Some(block) = &mut self.tabledatablock {
            block.cells.remove_column(at);
        }
        Ok(())
    }
}
