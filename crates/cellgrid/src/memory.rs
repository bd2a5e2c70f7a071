//! A document service backed by an in-memory declaration

use cellgrid_core::{CellContent, CellCoord, TableDeclaration};

use crate::service::DocumentService;

/// Keeps the authoritative declaration in memory
///
/// Useful for tests and for tools that edit a declaration file directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryDocument {
    declaration: TableDeclaration,
}

impl InMemoryDocument {
    pub fn new(declaration: TableDeclaration) -> Self {
        Self { declaration }
    }

    pub fn declaration(&self) -> &TableDeclaration {
        &self.declaration
    }

    pub fn into_declaration(self) -> TableDeclaration {
        self.declaration
    }
}

impl DocumentService for InMemoryDocument {
    type Error = cellgrid_core::Error;

    async fn save_cell_content(
        &mut self,
        coord: CellCoord,
        content: CellContent,
    ) -> Result<CellContent, Self::Error> {
        self.declaration.set_cell_content(coord, content.clone());
        Ok(content)
    }

    async fn load_cell_content(&mut self, coord: CellCoord) -> Result<CellContent, Self::Error> {
        Ok(self.declaration.cell_content(coord))
    }

    async fn add_row(&mut self, index: usize) -> Result<TableDeclaration, Self::Error> {
        self.declaration.insert_row(index)?;
        Ok(self.declaration.clone())
    }

    async fn remove_row(&mut self, index: usize) -> Result<TableDeclaration, Self::Error> {
        self.declaration.remove_row(index)?;
        Ok(self.declaration.clone())
    }

    async fn add_column(&mut self, index: usize) -> Result<TableDeclaration, Self::Error> {
        self.declaration.insert_column(index)?;
        Ok(self.declaration.clone())
    }

    async fn remove_column(&mut self, index: usize) -> Result<TableDeclaration, Self::Error> {
        self.declaration.remove_column(index)?;
        Ok(self.declaration.clone())
    }
}
