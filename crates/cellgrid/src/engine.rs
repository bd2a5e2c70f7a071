//! The table engine handed to a presentation surface

use cellgrid_core::{
    CellContent, CellCoord, CellEntity, CellMatrix, CellMatrixBuilder, GridOptions, OverlayMap, StyleMap,
    StyleResolver, TableDeclaration,
};

use crate::error::{EngineError, Result, StructuralOp};
use crate::navigation::{Direction, Navigator, Selection};
use crate::persistence::{PendingSaves, SaveOutcome, SaveTicket};
use crate::service::DocumentService;
use crate::session::{EditDraft, EditKey, EditPhase, EditSession, ExpandedAction};

/// One table: its declaration, local overlay, resolved matrix, selection and
/// edit session
///
/// Content edits patch the matrix in place. Structural edits go through the
/// [`DocumentService`] and rebuild the whole matrix from the replacement
/// declaration it returns.
#[derive(Debug)]
pub struct TableEngine<S> {
    service: S,
    declaration: TableDeclaration,
    overlay: OverlayMap,
    options: GridOptions,
    matrix: CellMatrix,
    navigator: Navigator,
    session: EditSession,
    pending: PendingSaves,
    stale: bool,
}

impl<S: DocumentService> TableEngine<S> {
    /// Create an engine with default options
    pub fn new(declaration: TableDeclaration, service: S) -> Self {
        Self::with_options(declaration, service, GridOptions::default())
    }

    pub fn with_options(declaration: TableDeclaration, service: S, options: GridOptions) -> Self {
        let mut engine = Self {
            service,
            declaration,
            overlay: OverlayMap::new(),
            options,
            matrix: CellMatrix::default(),
            navigator: Navigator::new(),
            session: EditSession::new(),
            pending: PendingSaves::new(),
            stale: true,
        };
        engine.rebuild();
        engine
    }

    /// Layer a local overlay on top of the declaration
    pub fn with_overlay(mut self, overlay: OverlayMap) -> Self {
        self.overlay = overlay;
        self.rebuild();
        self
    }

    pub fn declaration(&self) -> &TableDeclaration {
        &self.declaration
    }

    /// Local edits layered on top of the declaration
    pub fn overlay(&self) -> &OverlayMap {
        &self.overlay
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    pub fn into_service(self) -> S {
        self.service
    }

    /// True between a structural request and the rebuild that follows it
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Rebuild the matrix from the declaration and overlay
    pub fn rebuild(&mut self) {
        let matrix = CellMatrixBuilder::new(&self.declaration)
            .with_overlay(&self.overlay)
            .with_options(&self.options)
            .build();
        self.matrix = matrix;
        self.navigator.revalidate(&self.matrix);
        self.stale = false;
    }

    /// Swap in a new authoritative declaration and rebuild
    pub fn replace_declaration(&mut self, declaration: TableDeclaration) {
        self.declaration = declaration;
        self.pending.clear();
        self.rebuild();
    }

    fn ensure_fresh(&self) -> Result<()> {
        if self.stale {
            return Err(EngineError::MatrixStale);
        }
        Ok(())
    }

    fn ready(&self) -> Result<&CellMatrix> {
        self.ensure_fresh()?;
        Ok(&self.matrix)
    }

    fn styles(&self) -> Result<StyleResolver<'_>> {
        let matrix = self.ready()?;
        Ok(StyleResolver::new(&self.declaration, matrix, &self.options))
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Read-only snapshot of the resolved matrix
    pub fn resolved_matrix(&self) -> Result<&CellMatrix> {
        self.ready()
    }

    /// Effective style of the cell at (`row`, `col`)
    pub fn effective_style(&self, row: usize, col: usize) -> Result<StyleMap> {
        Ok(self.styles()?.cell_style(row, col))
    }

    pub fn row_style(&self, row: usize) -> Result<StyleMap> {
        Ok(self.styles()?.row_style(row))
    }

    pub fn column_style(&self, col: usize) -> Result<StyleMap> {
        Ok(self.styles()?.column_style(col))
    }

    pub fn table_style(&self) -> Result<StyleMap> {
        Ok(self.styles()?.table_style())
    }

    // ========================================================================
    // Selection and navigation
    // ========================================================================

    pub fn selection(&self) -> Option<Selection> {
        self.navigator.selection()
    }

    pub fn active_cell(&self) -> Option<CellCoord> {
        self.navigator.active()
    }

    /// True when the cell lies in the selected rectangle
    pub fn is_selected(&self, row: usize, col: usize) -> bool {
        self.navigator
            .selection()
            .map_or(false, |s| s.contains(CellCoord::new(row, col)))
    }

    pub fn phase(&self) -> EditPhase {
        self.session.phase()
    }

    /// The draft of the cell being edited
    pub fn draft(&self) -> Option<&EditDraft> {
        self.session.draft()
    }

    /// Select a cell without opening an editor
    ///
    /// With `extend` the anchor stays put and the selection becomes a range.
    pub fn select_cell(&mut self, row: usize, col: usize, extend: bool) -> Result<CellCoord> {
        if self.session.phase().is_editing() {
            return Err(EngineError::InvalidEditState {
                action: "select a cell",
                phase: self.session.phase(),
            });
        }
        self.ensure_fresh()?;
        let coord = CellCoord::new(row, col);
        self.matrix.try_cell(coord)?;
        let owner = self
            .navigator
            .click(&self.matrix, coord, extend)
            .ok_or(EngineError::NoActiveCell)?;
        self.session.select()?;
        Ok(owner)
    }

    /// Move the active cell one step, wrapping at the edges
    ///
    /// Editors must be closed; keyboard input while editing goes through
    /// [`handle_key`](Self::handle_key).
    pub fn dispatch_move(&mut self, direction: Direction, extend: bool) -> Result<CellCoord> {
        if self.session.phase().is_editing() {
            return Err(EngineError::InvalidEditState {
                action: "move the active cell",
                phase: self.session.phase(),
            });
        }
        self.ensure_fresh()?;
        let target = self
            .navigator
            .move_active(&self.matrix, direction, extend)
            .ok_or(EngineError::NoActiveCell)?;
        self.session.select()?;
        Ok(target)
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Handle a click on (`row`, `col`)
    ///
    /// The first click selects the cell. Clicking the active cell again, or
    /// clicking any cell while another one is being edited, commits the
    /// current draft and opens the inline editor on the clicked cell. Clicks
    /// are ignored while the expanded editor is open.
    pub async fn activate_cell_for_editing(&mut self, row: usize, col: usize) -> Result<()> {
        if self.session.phase() == EditPhase::ExpandedEditing {
            tracing::debug!("ignoring click while the expanded editor is open");
            return Ok(());
        }
        self.ensure_fresh()?;
        let coord = CellCoord::new(row, col);
        self.matrix.try_cell(coord)?;

        let owner = self.matrix.owner_of(coord).ok_or(EngineError::NoActiveCell)?;
        if self.session.editing() == Some(owner) {
            self.navigator.click(&self.matrix, coord, false);
            return Ok(());
        }

        let reopen = self.session.phase() == EditPhase::InlineEditing
            || self.navigator.active() == Some(owner);
        if reopen {
            // A failed commit leaves the editor and selection on the previous cell
            self.commit_draft().await?;
        }
        self.navigator.click(&self.matrix, coord, false);
        if reopen {
            self.open_editor(owner).await
        } else {
            self.session.select()
        }
    }

    /// Replace the editor text
    pub fn update_draft<T: Into<String>>(&mut self, text: T) -> Result<()> {
        let phase = self.session.phase();
        let draft = self
            .session
            .draft_mut()
            .ok_or(EngineError::InvalidEditState {
                action: "edit the draft",
                phase,
            })?;
        draft.text = text.into();
        Ok(())
    }

    /// Commit `content` for the cell being edited and close the editor
    pub async fn commit_edit<T: Into<String>>(&mut self, content: T) -> Result<Option<SaveOutcome>> {
        self.update_draft(content)?;
        self.commit_draft().await
    }

    /// Close the inline editor, saving the draft if it changed
    ///
    /// When the save fails the editor stays open with the draft intact.
    pub async fn commit_draft(&mut self) -> Result<Option<SaveOutcome>> {
        match self.session.finish()? {
            Some(draft) if draft.is_modified() => {
                let content = CellContent::text(draft.text.as_str());
                match self.save_cell(draft.coord, content).await {
                    Ok(outcome) => Ok(Some(outcome)),
                    Err(e) => {
                        self.session.open_inline(draft)?;
                        Err(e)
                    }
                }
            }
            _ => Ok(None),
        }
    }

    /// Close the inline editor and discard the draft
    pub fn cancel_edit(&mut self) -> Result<()> {
        if let Some(draft) = self.session.finish()? {
            tracing::debug!("discarding edit of {}", draft.coord);
        }
        Ok(())
    }

    /// Open the expanded editor for the cell being edited inline
    pub fn expand_editor(&mut self) -> Result<()> {
        self.session.expand()
    }

    /// Close the expanded editor and return to the inline editor
    ///
    /// Saving persists the text right away and makes it the new baseline of
    /// the inline draft.
    pub async fn finish_expanded(&mut self, action: ExpandedAction) -> Result<()> {
        self.session.collapse()?;
        if let ExpandedAction::Save(text) = action {
            let coord = self.session.editing().ok_or(EngineError::NoActiveCell)?;
            self.save_cell(coord, CellContent::text(text.as_str())).await?;
            if let Some(draft) = self.session.draft_mut() {
                draft.initial = text.clone();
                draft.text = text;
            }
        }
        Ok(())
    }

    /// Handle a key forwarded by the presentation surface
    ///
    /// Keys are ignored while the expanded editor is open.
    pub async fn handle_key(&mut self, key: EditKey) -> Result<()> {
        let phase = self.session.phase();
        if phase == EditPhase::ExpandedEditing {
            return Ok(());
        }
        let editing = phase == EditPhase::InlineEditing;

        match key {
            EditKey::Enter { shift: true } => self.step(Direction::Up, false).await,
            EditKey::Enter { shift: false } if editing => {
                let direction = match self.session.editing() {
                    Some(coord) if coord.row + 1 >= self.ready()?.row_count() => Direction::Right,
                    _ => Direction::Down,
                };
                self.step(direction, false).await
            }
            EditKey::Enter { shift: false } => self.open_active().await,
            EditKey::Tab { shift } => {
                let direction = if shift { Direction::Left } else { Direction::Right };
                self.step(direction, false).await
            }
            EditKey::Escape => self.cancel_edit(),
            EditKey::F2 if editing => self.expand_editor(),
            EditKey::F2 => self.open_active().await,
            EditKey::Arrow { direction, extend } => self.step(direction, extend && !editing).await,
        }
    }

    /// Move the active cell; when editing inline, commit first and reopen the
    /// editor on the destination
    async fn step(&mut self, direction: Direction, extend: bool) -> Result<()> {
        if self.navigator.active().is_none() {
            return Ok(());
        }
        if self.session.phase() != EditPhase::InlineEditing {
            self.dispatch_move(direction, extend)?;
            return Ok(());
        }
        self.commit_draft().await?;
        self.ensure_fresh()?;
        let target = self
            .navigator
            .move_active(&self.matrix, direction, false)
            .ok_or(EngineError::NoActiveCell)?;
        self.open_editor(target).await
    }

    async fn open_active(&mut self) -> Result<()> {
        match self.navigator.active() {
            Some(coord) => self.open_editor(coord).await,
            None => Ok(()),
        }
    }

    async fn open_editor(&mut self, coord: CellCoord) -> Result<()> {
        let content = self
            .service
            .load_cell_content(coord)
            .await
            .map_err(|e| EngineError::LoadFailed {
                address: coord.to_a1_string(),
                source: Box::new(e),
            })?;
        self.session.open_inline(EditDraft::new(coord, content.to_string()))
    }

    // ========================================================================
    // Content persistence
    // ========================================================================

    /// Apply new content locally and issue a save ticket for it
    ///
    /// Any outstanding save for the same cell is superseded.
    pub fn begin_cell_save(&mut self, coord: CellCoord, content: CellContent) -> Result<SaveTicket> {
        if self.stale {
            return Err(EngineError::MatrixStale);
        }
        self.matrix.set_content(coord, content.clone())?;
        self.overlay.set_content(coord, content.clone());
        Ok(self.pending.issue(coord, content))
    }

    /// Apply the service's answer for `ticket` unless it was superseded
    ///
    /// A response is accepted only when no newer save was issued for the cell
    /// and the cell still holds the content the ticket applied.
    pub fn finish_cell_save(&mut self, ticket: SaveTicket, persisted: CellContent) -> SaveOutcome {
        let latest = self.pending.complete(&ticket);
        let unchanged = !self.stale
            && self
                .matrix
                .cell(ticket.coord)
                .map_or(false, |cell| cell.content == ticket.content);

        if !(latest && unchanged) {
            tracing::debug!(
                "discarding stale save response for {} (generation {})",
                ticket.coord,
                ticket.generation
            );
            return SaveOutcome::Superseded;
        }

        if persisted != ticket.content {
            if let Some(cell) = self.matrix.cell_mut(ticket.coord) {
                cell.content = persisted.clone();
            }
            self.overlay.set_content(ticket.coord, persisted.clone());
        }
        SaveOutcome::Applied(persisted)
    }

    /// Drop a ticket whose save failed
    pub fn abandon_cell_save(&mut self, ticket: &SaveTicket) {
        self.pending.complete(ticket);
    }

    fn restore_cell(
        &mut self,
        coord: CellCoord,
        content: Option<CellContent>,
        entry: Option<CellEntity>,
    ) {
        if let (Some(cell), Some(content)) = (self.matrix.cell_mut(coord), content) {
            cell.content = content;
        }
        let address = coord.to_a1_string();
        match entry {
            Some(entry) => {
                self.overlay.insert(address, entry);
            }
            None => {
                self.overlay.remove(&address);
            }
        }
    }

    /// Save content for a cell through the document service
    ///
    /// When the service fails, the content shown before the save is restored
    /// unless a newer save for the cell was issued meanwhile.
    pub async fn save_cell(&mut self, coord: CellCoord, content: CellContent) -> Result<SaveOutcome> {
        let previous = self.matrix.cell(coord).map(|cell| cell.content.clone());
        let previous_entry = self.overlay.get_at(coord).cloned();
        let ticket = self.begin_cell_save(coord, content)?;
        match self
            .service
            .save_cell_content(coord, ticket.content.clone())
            .await
        {
            Ok(persisted) => Ok(self.finish_cell_save(ticket, persisted)),
            Err(e) => {
                if self.pending.complete(&ticket) && !self.stale {
                    self.restore_cell(coord, previous, previous_entry);
                }
                tracing::warn!("saving {coord} failed: {e}");
                Err(EngineError::SaveFailed {
                    address: coord.to_a1_string(),
                    source: Box::new(e),
                })
            }
        }
    }

    // ========================================================================
    // Structural edits
    // ========================================================================

    /// Insert a row before `index`, or append when `index` is `None`
    ///
    /// Default indices come from the declaration, not from rows the local
    /// overlay added, since the service only knows the declaration.
    pub async fn add_row(&mut self, index: Option<usize>) -> Result<()> {
        let at = index.unwrap_or(self.declaration.extent().0);
        self.structural(StructuralOp::AddRow(at)).await
    }

    /// Remove row `index`, or the last row when `index` is `None`
    ///
    /// A table with fewer than two rows is left alone.
    pub async fn remove_row(&mut self, index: Option<usize>) -> Result<()> {
        let rows = self.matrix.row_count();
        if rows < 2 {
            tracing::debug!("refusing to remove a row from a table with {rows} rows");
            return Ok(());
        }
        let at = index.unwrap_or(self.declaration.extent().0.saturating_sub(1));
        self.structural(StructuralOp::RemoveRow(at)).await
    }

    /// Insert a column before `index`, or append when `index` is `None`
    pub async fn add_column(&mut self, index: Option<usize>) -> Result<()> {
        let at = index.unwrap_or(self.declaration.extent().1);
        self.structural(StructuralOp::AddColumn(at)).await
    }

    /// Remove column `index`, or the last column when `index` is `None`
    pub async fn remove_column(&mut self, index: Option<usize>) -> Result<()> {
        let at = index.unwrap_or(self.declaration.extent().1.saturating_sub(1));
        self.structural(StructuralOp::RemoveColumn(at)).await
    }

    async fn structural(&mut self, operation: StructuralOp) -> Result<()> {
        self.stale = true;
        self.pending.clear();
        self.navigator.clear();
        self.session.reset_to_selected();

        let result = match operation {
            StructuralOp::AddRow(i) => self.service.add_row(i).await,
            StructuralOp::RemoveRow(i) => self.service.remove_row(i).await,
            StructuralOp::AddColumn(i) => self.service.add_column(i).await,
            StructuralOp::RemoveColumn(i) => self.service.remove_column(i).await,
        };

        match result {
            Ok(declaration) => {
                match operation {
                    StructuralOp::AddRow(i) => self.overlay.insert_row(i),
                    StructuralOp::RemoveRow(i) => self.overlay.remove_row(i),
                    StructuralOp::AddColumn(i) => self.overlay.insert_column(i),
                    StructuralOp::RemoveColumn(i) => self.overlay.remove_column(i),
                }
                self.declaration = declaration;
                self.rebuild();
                tracing::info!(
                    "{operation} applied; table is now {}x{}",
                    self.matrix.row_count(),
                    self.matrix.col_count()
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!("{operation} rejected: {e}");
                // The previous matrix is still consistent with the declaration
                self.stale = false;
                Err(EngineError::StructuralEditFailure {
                    operation,
                    source: Box::new(e),
                })
            }
        }
    }

    // ========================================================================
    // Attribute edits over the selection
    // ========================================================================

    /// Set an attribute on every cell of the selection and rebuild
    pub fn set_selection_attribute(&mut self, key: &str, value: &str) -> Result<()> {
        let selection = self.editable_selection()?;
        for coord in selection.cells() {
            self.overlay.set_attribute(coord, key, value);
        }
        self.rebuild();
        Ok(())
    }

    /// Remove one attribute from every cell of the selection and rebuild
    pub fn clear_selection_attribute(&mut self, key: &str) -> Result<()> {
        let selection = self.editable_selection()?;
        for coord in selection.cells() {
            self.overlay.clear_attribute(coord, key);
        }
        self.rebuild();
        Ok(())
    }

    /// Remove every attribute from the selection, keeping content, and rebuild
    pub fn clear_selection_attributes(&mut self) -> Result<()> {
        let selection = self.editable_selection()?;
        for coord in selection.cells() {
            self.overlay.clear_attributes(coord);
        }
        self.rebuild();
        Ok(())
    }

    fn editable_selection(&self) -> Result<Selection> {
        self.ensure_fresh()?;
        self.navigator.selection().ok_or(EngineError::NoActiveCell)
    }
}
