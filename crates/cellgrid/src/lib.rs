//! # cellgrid
//!
//! Navigation, editing and persistence coordination for cellgrid tables.
//!
//! [`TableEngine`] owns one table: the declaration, a local overlay of edits,
//! the resolved [`CellMatrix`], the selection and the edit session. Saves and
//! row/column changes go through a [`DocumentService`].
//!
//! ## Example
//!
//! ```rust
//! use cellgrid::prelude::*;
//!
//! # async fn example() -> cellgrid::Result<()> {
//! let decl = TableDeclaration::from_json(
//!     r#"{"countRow": 3, "countCol": 3, "rows": [{"row": [{"cell": "wide", "colspan": 2}]}]}"#,
//! )?;
//! let mut engine = TableEngine::new(decl.clone(), InMemoryDocument::new(decl));
//!
//! engine.select_cell(0, 0, false)?;
//! assert_eq!(engine.dispatch_move(Direction::Right, false)?, CellCoord::new(0, 2));
//!
//! engine.save_cell(CellCoord::new(1, 1), CellContent::text("x")).await?;
//! engine.add_row(None).await?;
//! assert_eq!(engine.resolved_matrix()?.row_count(), 4);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod memory;
pub mod navigation;
pub mod persistence;
pub mod prelude;
pub mod service;
pub mod session;

pub use engine::TableEngine;
pub use error::{EngineError, Result, ServiceError, StructuralOp};
pub use memory::InMemoryDocument;
pub use navigation::{Axis, AxisLock, Direction, Navigator, ParseDirectionError, Selection};
pub use persistence::{PendingSaves, SaveOutcome, SaveTicket};
pub use service::DocumentService;
pub use session::{EditDraft, EditKey, EditPhase, EditSession, ExpandedAction};

// Re-export core types
pub use cellgrid_core::{
    decode, encode, Cell, CellContent, CellCoord, CellEntity, CellMatrix, CellMatrixBuilder,
    CellPatch, ColumnDecl, GridOptions, OverlayMap, RangeRule, RangedDefault, RenderPos, RowDecl,
    StyleAttrs, StyleKey, StyleMap, StyleResolver, StyleScope, TableDeclaration,
};
