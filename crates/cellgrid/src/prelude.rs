//! Prelude module - common imports for cellgrid users
//!
//! ```rust
//! use cellgrid::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellContent,
    CellCoord,
    CellMatrix,
    // Navigation and editing
    Direction,
    DocumentService,
    EditKey,
    EditPhase,
    // Error types
    EngineError,
    GridOptions,
    InMemoryDocument,
    OverlayMap,
    SaveOutcome,
    Selection,
    // Styles
    StyleKey,
    StyleMap,
    TableDeclaration,
    TableEngine,
};
