//! The document service the engine persists through
//!
//! The transport behind it is up to the caller. Coordinates cross this
//! boundary as [`CellCoord`], which serializes as A1 text.

use cellgrid_core::{CellContent, CellCoord, TableDeclaration};

/// Persists cell content and structural edits
///
/// Structural operations answer with the full replacement declaration; the
/// engine rebuilds its matrix from it.
#[allow(async_fn_in_trait)]
pub trait DocumentService {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store new content for a cell, returning the content as persisted
    async fn save_cell_content(
        &mut self,
        coord: CellCoord,
        content: CellContent,
    ) -> Result<CellContent, Self::Error>;

    /// Fetch the stored content of a cell for editing
    async fn load_cell_content(&mut self, coord: CellCoord) -> Result<CellContent, Self::Error>;

    /// Insert an empty row before `index`
    async fn add_row(&mut self, index: usize) -> Result<TableDeclaration, Self::Error>;

    async fn remove_row(&mut self, index: usize) -> Result<TableDeclaration, Self::Error>;

    /// Insert an empty column before `index`
    async fn add_column(&mut self, index: usize) -> Result<TableDeclaration, Self::Error>;

    async fn remove_column(&mut self, index: usize) -> Result<TableDeclaration, Self::Error>;
}
