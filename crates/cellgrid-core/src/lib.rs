//! # cellgrid-core
//!
//! Core data structures for the cellgrid table engine.
//!
//! This crate turns a sparse, attribute-driven table declaration into a
//! dense matrix of display-ready cells:
//! - [`CellCoord`] - A1 addresses ("C5") and zero-based coordinates
//! - [`RangeRule`] - Index range rules used by ranged default styles
//! - [`TableDeclaration`] / [`OverlayMap`] - The declared table and its overlays
//! - [`CellMatrixBuilder`] / [`CellMatrix`] - The resolved matrix with spans
//! - [`StyleResolver`] - Table, row, column and cell style cascades
//!
//! ## Example
//!
//! ```rust
//! use cellgrid_core::{CellMatrixBuilder, GridOptions, StyleKey, StyleResolver, TableDeclaration};
//!
//! let decl = TableDeclaration::from_json(
//!     r#"{"countRow": 3, "countCol": 3,
//!         "rows": [{"row": [{"cell": "wide", "colspan": 2}]}],
//!         "defrowsrange": [{"range": [0, -1], "def": {"backgroundColor": "red"}}]}"#,
//! )
//! .unwrap();
//!
//! let matrix = CellMatrixBuilder::new(&decl).build();
//! assert!(matrix.get(0, 1).unwrap().subsumed_by.is_some());
//!
//! let options = GridOptions::default();
//! let styles = StyleResolver::new(&decl, &matrix, &options);
//! assert_eq!(styles.row_style(2).get(StyleKey::BackgroundColor), Some("red"));
//! ```

pub mod cell;
pub mod column;
pub mod error;
pub mod matrix;
pub mod options;
pub mod overlay;
pub mod range;
pub mod row;
pub mod style;
pub mod table;

// Re-exports for convenience
pub use cell::{decode, encode, Cell, CellContent, CellCoord, CellEntity, CellPatch, RenderPos};
pub use column::ColumnDecl;
pub use error::{Error, Result};
pub use matrix::{resolve_spans, CellMatrix, CellMatrixBuilder};
pub use options::GridOptions;
pub use overlay::{DataBlock, DataBlockKind, OverlayMap};
pub use range::{NormalizedRange, RangeRule, RangedDefault};
pub use row::RowDecl;
pub use style::{StyleAttrs, StyleKey, StyleMap, StyleResolver, StyleScope};
pub use table::TableDeclaration;

/// Maximum number of rows a matrix may grow to (worksheet limit)
pub const MAX_ROWS: usize = 1_048_576;

/// Maximum number of columns a matrix may grow to (worksheet limit)
pub const MAX_COLS: usize = 16_384;
