//! End-to-end scenarios for the table engine

use cellgrid::prelude::*;
use cellgrid::{EditDraft, ExpandedAction, StructuralOp};
use pretty_assertions::assert_eq;

const MERGED: &str = r#"{
    "countRow": 3,
    "countCol": 3,
    "rows": [
        {"row": [{"cell": "wide", "colspan": 2}, "c1"]},
        {"row": ["a2", "b2", "c2"]},
        {"row": ["a3", "b3", "c3"]}
    ]
}"#;

fn engine(json: &str) -> TableEngine<InMemoryDocument> {
    let decl = TableDeclaration::from_json(json).unwrap();
    TableEngine::new(decl.clone(), InMemoryDocument::new(decl))
}

fn at(row: usize, col: usize) -> CellCoord {
    CellCoord::new(row, col)
}

/// A service whose every call fails
#[derive(Debug, Default)]
struct Unreachable;

#[derive(Debug, thiserror::Error)]
#[error("service unreachable")]
struct Offline;

impl DocumentService for Unreachable {
    type Error = Offline;

    async fn save_cell_content(&mut self, _: CellCoord, _: CellContent) -> Result<CellContent, Offline> {
        Err(Offline)
    }

    async fn load_cell_content(&mut self, _: CellCoord) -> Result<CellContent, Offline> {
        Err(Offline)
    }

    async fn add_row(&mut self, _: usize) -> Result<TableDeclaration, Offline> {
        Err(Offline)
    }

    async fn remove_row(&mut self, _: usize) -> Result<TableDeclaration, Offline> {
        Err(Offline)
    }

    async fn add_column(&mut self, _: usize) -> Result<TableDeclaration, Offline> {
        Err(Offline)
    }

    async fn remove_column(&mut self, _: usize) -> Result<TableDeclaration, Offline> {
        Err(Offline)
    }
}

/// Serves loads from a declaration but rejects every write
#[derive(Debug)]
struct ReadOnly(TableDeclaration);

impl DocumentService for ReadOnly {
    type Error = Offline;

    async fn save_cell_content(&mut self, _: CellCoord, _: CellContent) -> Result<CellContent, Offline> {
        Err(Offline)
    }

    async fn load_cell_content(&mut self, coord: CellCoord) -> Result<CellContent, Offline> {
        Ok(self.0.cell_content(coord))
    }

    async fn add_row(&mut self, _: usize) -> Result<TableDeclaration, Offline> {
        Err(Offline)
    }

    async fn remove_row(&mut self, _: usize) -> Result<TableDeclaration, Offline> {
        Err(Offline)
    }

    async fn add_column(&mut self, _: usize) -> Result<TableDeclaration, Offline> {
        Err(Offline)
    }

    async fn remove_column(&mut self, _: usize) -> Result<TableDeclaration, Offline> {
        Err(Offline)
    }
}

#[test]
fn test_right_from_colspan_owner() {
    let mut engine = engine(r#"{"countRow": 3, "countCol": 3, "rows": [{"row": [{"cell": "x", "colspan": 2}]}]}"#);
    engine.select_cell(0, 0, false).unwrap();
    assert_eq!(engine.dispatch_move(Direction::Right, false).unwrap(), at(0, 2));
}

#[test]
fn test_overlay_grows_matrix() {
    let decl = TableDeclaration::with_size(3, 3);
    let overlay: OverlayMap = [("E10", "x")].into_iter().collect();
    let engine = TableEngine::new(decl.clone(), InMemoryDocument::new(decl)).with_overlay(overlay);

    let matrix = engine.resolved_matrix().unwrap();
    assert!(matrix.row_count() >= 10);
    assert!(matrix.col_count() >= 5);
    assert_eq!(matrix.get(9, 4).unwrap().content, CellContent::text("x"));
    assert!(matrix.get(9, 3).unwrap().content.is_empty());
}

#[test]
fn test_wraparound_on_every_row() {
    let mut engine = engine(r#"{"countRow": 4, "countCol": 5}"#);
    for row in 0..4 {
        engine.select_cell(row, 0, false).unwrap();
        assert_eq!(engine.dispatch_move(Direction::Left, false).unwrap(), at(row, 4));
    }
    engine.select_cell(0, 2, false).unwrap();
    assert_eq!(engine.dispatch_move(Direction::Up, false).unwrap(), at(3, 2));
}

#[test]
fn test_ranged_row_default_and_explicit_cell_style() {
    let engine = engine(
        r#"{
            "countRow": 3, "countCol": 2,
            "rows": [{"row": [{"cell": "x", "backgroundColor": "blue"}]}],
            "columns": [{"color": "black"}],
            "defrowsrange": [{"range": [0, -1], "def": {"backgroundColor": "red"}}],
            "defcellsrange": [{"range": [0, 0], "def": {"color": "gray", "backgroundColor": "green"}}]
        }"#,
    );
    for row in 0..3 {
        assert_eq!(
            engine.row_style(row).unwrap().get(StyleKey::BackgroundColor),
            Some("red")
        );
    }
    let style = engine.effective_style(0, 0).unwrap();
    assert_eq!(style.get(StyleKey::BackgroundColor), Some("blue"));
    assert_eq!(style.get(StyleKey::Color), Some("gray"));
}

#[test]
fn test_selection_rectangle() {
    let mut engine = engine(MERGED);
    engine.select_cell(1, 0, false).unwrap();
    engine.dispatch_move(Direction::Right, true).unwrap();
    engine.dispatch_move(Direction::Down, true).unwrap();

    assert!(engine.is_selected(1, 0));
    assert!(engine.is_selected(2, 1));
    assert!(!engine.is_selected(0, 0));
    assert!(!engine.is_selected(2, 2));
    assert_eq!(engine.phase(), EditPhase::Selected);
}

#[test]
fn test_selection_attributes() {
    let mut engine = engine(MERGED);
    engine.select_cell(1, 0, false).unwrap();
    engine.select_cell(2, 1, true).unwrap();
    engine.set_selection_attribute("backgroundColor", "##ff0000").unwrap();

    for (row, col) in [(1, 0), (1, 1), (2, 0), (2, 1)] {
        assert_eq!(
            engine.effective_style(row, col).unwrap().get(StyleKey::BackgroundColor),
            Some("#ff0000")
        );
    }
    assert_eq!(engine.effective_style(1, 2).unwrap().get(StyleKey::BackgroundColor), None);

    engine.clear_selection_attribute("backgroundColor").unwrap();
    assert_eq!(engine.effective_style(1, 0).unwrap().get(StyleKey::BackgroundColor), None);

    engine.set_selection_attribute("textAlign", "right").unwrap();
    engine.clear_selection_attributes().unwrap();
    assert_eq!(engine.effective_style(2, 1).unwrap().get(StyleKey::TextAlign), None);
    // Content survives attribute clearing
    assert_eq!(
        engine.resolved_matrix().unwrap().get(2, 1).unwrap().content,
        CellContent::text("b3")
    );
}

#[test]
fn test_clearing_attributes_keeps_declared_content() {
    let mut engine = engine(r#"{"countRow": 2, "countCol": 2, "rows": [{"row": ["keep"]}]}"#);
    engine.select_cell(0, 0, false).unwrap();
    engine.set_selection_attribute("color", "red").unwrap();
    assert_eq!(engine.effective_style(0, 0).unwrap().get(StyleKey::Color), Some("red"));

    engine.clear_selection_attributes().unwrap();
    assert_eq!(
        engine.resolved_matrix().unwrap().get(0, 0).unwrap().content,
        CellContent::text("keep")
    );
    assert_eq!(engine.effective_style(0, 0).unwrap().get(StyleKey::Color), None);
    assert!(engine.overlay().is_empty());
}

#[test]
fn test_colspan_attribute_merges_selection() {
    let mut engine = engine(MERGED);
    engine.select_cell(1, 1, false).unwrap();
    engine.set_selection_attribute("colspan", "2").unwrap();
    let matrix = engine.resolved_matrix().unwrap();
    assert_eq!(matrix.get(1, 2).unwrap().subsumed_by, Some(at(1, 1)));
}

#[tokio::test]
async fn test_click_twice_opens_editor_and_commit_saves() {
    let mut engine = engine(MERGED);

    engine.activate_cell_for_editing(1, 1).await.unwrap();
    assert_eq!(engine.phase(), EditPhase::Selected);

    engine.activate_cell_for_editing(1, 1).await.unwrap();
    assert_eq!(engine.phase(), EditPhase::InlineEditing);
    assert_eq!(engine.draft(), Some(&EditDraft::new(at(1, 1), "b2")));

    let outcome = engine.commit_edit("changed").await.unwrap();
    assert_eq!(outcome, Some(SaveOutcome::Applied(CellContent::text("changed"))));
    assert_eq!(engine.phase(), EditPhase::Selected);
    assert_eq!(
        engine.service().declaration().cell_content(at(1, 1)),
        CellContent::text("changed")
    );
    assert_eq!(
        engine.resolved_matrix().unwrap().get(1, 1).unwrap().content,
        CellContent::text("changed")
    );
}

#[tokio::test]
async fn test_unchanged_draft_is_not_saved() {
    let mut engine = engine(MERGED);
    engine.select_cell(2, 2, false).unwrap();
    engine.handle_key(EditKey::Enter { shift: false }).await.unwrap();
    assert_eq!(engine.phase(), EditPhase::InlineEditing);
    assert_eq!(engine.commit_draft().await.unwrap(), None);
    assert!(engine.overlay().is_empty());
}

#[tokio::test]
async fn test_clicking_elsewhere_while_editing_commits() {
    let mut engine = engine(MERGED);
    engine.select_cell(1, 0, false).unwrap();
    engine.handle_key(EditKey::F2).await.unwrap();
    engine.update_draft("edited").unwrap();

    engine.activate_cell_for_editing(0, 1).await.unwrap();
    // The click landed on the owner of the merged cell
    assert_eq!(engine.draft().map(|d| d.coord), Some(at(0, 0)));
    assert_eq!(engine.draft().map(|d| d.text.as_str()), Some("wide"));
    assert_eq!(
        engine.service().declaration().cell_content(at(1, 0)),
        CellContent::text("edited")
    );
}

#[tokio::test]
async fn test_keyboard_while_editing() {
    let mut engine = engine(MERGED);
    engine.select_cell(0, 0, false).unwrap();
    engine.handle_key(EditKey::Enter { shift: false }).await.unwrap();
    assert_eq!(engine.draft().map(|d| d.coord), Some(at(0, 0)));

    // Enter commits and moves down, reopening the editor
    engine.update_draft("top").unwrap();
    engine.handle_key(EditKey::Enter { shift: false }).await.unwrap();
    assert_eq!(engine.active_cell(), Some(at(1, 0)));
    assert_eq!(engine.phase(), EditPhase::InlineEditing);
    assert_eq!(engine.service().declaration().cell_content(at(0, 0)), CellContent::text("top"));

    // Tab moves right, Shift+Tab moves back
    engine.handle_key(EditKey::Tab { shift: false }).await.unwrap();
    assert_eq!(engine.active_cell(), Some(at(1, 1)));
    engine.handle_key(EditKey::Tab { shift: true }).await.unwrap();
    assert_eq!(engine.active_cell(), Some(at(1, 0)));

    // Shift+Enter moves up
    engine.handle_key(EditKey::Enter { shift: true }).await.unwrap();
    assert_eq!(engine.active_cell(), Some(at(0, 0)));

    // Enter on the last row moves right instead of down
    engine.handle_key(EditKey::Escape).await.unwrap();
    assert_eq!(engine.phase(), EditPhase::Selected);
    engine.select_cell(2, 0, false).unwrap();
    engine.handle_key(EditKey::Enter { shift: false }).await.unwrap();
    engine.handle_key(EditKey::Enter { shift: false }).await.unwrap();
    assert_eq!(engine.active_cell(), Some(at(2, 1)));
}

#[tokio::test]
async fn test_escape_discards_draft() {
    let mut engine = engine(MERGED);
    engine.select_cell(1, 1, false).unwrap();
    engine.handle_key(EditKey::F2).await.unwrap();
    engine.update_draft("never saved").unwrap();
    engine.handle_key(EditKey::Escape).await.unwrap();

    assert_eq!(engine.phase(), EditPhase::Selected);
    assert_eq!(engine.service().declaration().cell_content(at(1, 1)), CellContent::text("b2"));
}

#[tokio::test]
async fn test_expanded_editor() {
    let mut engine = engine(MERGED);
    engine.select_cell(2, 2, false).unwrap();
    engine.handle_key(EditKey::F2).await.unwrap();
    engine.handle_key(EditKey::F2).await.unwrap();
    assert_eq!(engine.phase(), EditPhase::ExpandedEditing);

    // Keys and moves are ignored or refused while expanded
    engine
        .handle_key(EditKey::Arrow { direction: Direction::Up, extend: false })
        .await
        .unwrap();
    assert_eq!(engine.active_cell(), Some(at(2, 2)));
    assert!(matches!(
        engine.dispatch_move(Direction::Up, false),
        Err(EngineError::InvalidEditState { .. })
    ));

    engine
        .finish_expanded(ExpandedAction::Save("long text".into()))
        .await
        .unwrap();
    assert_eq!(engine.phase(), EditPhase::InlineEditing);
    assert_eq!(engine.draft().map(|d| d.text.as_str()), Some("long text"));
    assert_eq!(
        engine.service().declaration().cell_content(at(2, 2)),
        CellContent::text("long text")
    );

    engine.expand_editor().unwrap();
    engine.finish_expanded(ExpandedAction::Cancel).await.unwrap();
    assert_eq!(engine.phase(), EditPhase::InlineEditing);
}

#[test]
fn test_late_save_is_discarded() {
    let mut engine = engine(MERGED);
    let b2 = at(1, 1);

    let first = engine.begin_cell_save(b2, CellContent::text("first")).unwrap();
    let second = engine.begin_cell_save(b2, CellContent::text("second")).unwrap();

    // The response for the first save arrives after the second edit
    assert_eq!(
        engine.finish_cell_save(first, CellContent::text("first")),
        SaveOutcome::Superseded
    );
    assert_eq!(
        engine.resolved_matrix().unwrap().get(1, 1).unwrap().content,
        CellContent::text("second")
    );

    assert_eq!(
        engine.finish_cell_save(second, CellContent::text("<p>second</p>")),
        SaveOutcome::Applied(CellContent::text("<p>second</p>"))
    );
    assert_eq!(
        engine.resolved_matrix().unwrap().get(1, 1).unwrap().content,
        CellContent::text("<p>second</p>")
    );
}

#[tokio::test]
async fn test_structural_edit_clears_selection() {
    let mut engine = engine(MERGED);
    engine.select_cell(1, 1, false).unwrap();
    engine.handle_key(EditKey::F2).await.unwrap();

    engine.add_row(Some(0)).await.unwrap();
    assert_eq!(engine.active_cell(), None);
    assert_eq!(engine.phase(), EditPhase::Selected);
    assert!(!engine.is_stale());

    let matrix = engine.resolved_matrix().unwrap();
    assert_eq!(matrix.row_count(), 4);
    assert!(matrix.get(0, 0).unwrap().content.is_empty());
    assert_eq!(matrix.get(1, 0).unwrap().content, CellContent::text("wide"));
    assert_eq!(matrix.get(1, 1).unwrap().subsumed_by, Some(at(1, 0)));
}

#[tokio::test]
async fn test_structural_edits_at_end() {
    let mut engine = engine(MERGED);
    engine.add_column(None).await.unwrap();
    assert_eq!(engine.resolved_matrix().unwrap().col_count(), 4);
    engine.remove_column(None).await.unwrap();
    engine.remove_row(None).await.unwrap();
    let matrix = engine.resolved_matrix().unwrap();
    assert_eq!((matrix.row_count(), matrix.col_count()), (2, 3));
}

#[tokio::test]
async fn test_local_overlay_follows_structural_edits() {
    let mut engine = engine(MERGED);
    engine.select_cell(2, 2, false).unwrap();
    engine.set_selection_attribute("color", "red").unwrap();

    engine.remove_row(Some(0)).await.unwrap();
    assert_eq!(engine.effective_style(1, 2).unwrap().get(StyleKey::Color), Some("red"));
    assert_eq!(engine.effective_style(0, 2).unwrap().get(StyleKey::Color), None);
}

#[tokio::test]
async fn test_single_row_is_never_removed() {
    let mut engine = engine(r#"{"countRow": 1, "countCol": 2}"#);
    engine.remove_row(None).await.unwrap();
    assert_eq!(engine.resolved_matrix().unwrap().row_count(), 1);
}

#[tokio::test]
async fn test_structural_failure_keeps_matrix() {
    let decl = TableDeclaration::from_json(MERGED).unwrap();
    let mut engine = TableEngine::new(decl, Unreachable);
    engine.select_cell(1, 1, false).unwrap();
    let before = engine.resolved_matrix().unwrap().clone();

    let err = engine.add_row(Some(1)).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::StructuralEditFailure { operation: StructuralOp::AddRow(1), .. }
    ));
    assert_eq!(err.to_string(), "Adding row 1 failed: service unreachable");

    assert_eq!(engine.active_cell(), None);
    assert_eq!(engine.phase(), EditPhase::Selected);
    assert!(!engine.is_stale());
    assert_eq!(engine.resolved_matrix().unwrap(), &before);
}

#[tokio::test]
async fn test_failed_save_and_load_are_surfaced() {
    let decl = TableDeclaration::from_json(MERGED).unwrap();
    let mut engine = TableEngine::new(decl, Unreachable);

    let err = engine.save_cell(at(0, 2), CellContent::text("x")).await.unwrap_err();
    assert!(matches!(err, EngineError::SaveFailed { ref address, .. } if address == "C1"));

    engine.select_cell(0, 2, false).unwrap();
    let err = engine.handle_key(EditKey::F2).await.unwrap_err();
    assert!(matches!(err, EngineError::LoadFailed { .. }));
    assert_eq!(engine.phase(), EditPhase::Selected);
}

#[test]
fn test_moving_without_active_cell() {
    let mut engine = engine(MERGED);
    assert!(matches!(
        engine.dispatch_move(Direction::Down, false),
        Err(EngineError::NoActiveCell)
    ));
    assert!(engine.select_cell(5, 5, false).is_err());
}

#[tokio::test]
async fn test_structural_edits_after_overlay_growth() {
    let decl = TableDeclaration::with_size(3, 3);
    let overlay: OverlayMap = [("E10", "x")].into_iter().collect();
    let mut engine = TableEngine::new(decl.clone(), InMemoryDocument::new(decl)).with_overlay(overlay);

    engine.add_row(None).await.unwrap();
    assert_eq!(engine.service().declaration().declared_rows(), 4);
    assert_eq!(
        engine.resolved_matrix().unwrap().get(10, 4).unwrap().content,
        CellContent::text("x")
    );

    engine.remove_row(None).await.unwrap();
    engine.add_column(None).await.unwrap();
    assert_eq!(
        engine.resolved_matrix().unwrap().get(9, 5).unwrap().content,
        CellContent::text("x")
    );
    engine.remove_column(None).await.unwrap();

    let declaration = engine.service().declaration();
    assert_eq!((declaration.declared_rows(), declaration.declared_cols()), (3, 3));
    assert_eq!(
        engine.resolved_matrix().unwrap().get(9, 4).unwrap().content,
        CellContent::text("x")
    );
}

#[tokio::test]
async fn test_failed_commit_keeps_draft_and_content() {
    let decl = TableDeclaration::from_json(MERGED).unwrap();
    let mut engine = TableEngine::new(decl.clone(), ReadOnly(decl));
    engine.select_cell(1, 1, false).unwrap();
    engine.handle_key(EditKey::F2).await.unwrap();
    engine.update_draft("kept").unwrap();

    let err = engine.commit_draft().await.unwrap_err();
    assert!(matches!(err, EngineError::SaveFailed { .. }));
    assert_eq!(engine.phase(), EditPhase::InlineEditing);
    assert_eq!(engine.draft().map(|d| d.text.as_str()), Some("kept"));
    assert_eq!(
        engine.resolved_matrix().unwrap().get(1, 1).unwrap().content,
        CellContent::text("b2")
    );
    assert!(engine.overlay().is_empty());

    // Clicking away cannot commit either, so the editor stays put
    assert!(engine.activate_cell_for_editing(2, 2).await.is_err());
    assert_eq!(engine.active_cell(), Some(at(1, 1)));
    assert_eq!(engine.draft().map(|d| d.coord), Some(at(1, 1)));
    assert_eq!(engine.draft().map(|d| d.text.as_str()), Some("kept"));
}
