//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellCoord`] - A cell's location (e.g., "C5") and the A1 codec
//! - [`CellContent`] - The value shown in a cell
//! - [`CellEntity`] / [`CellPatch`] - Cells as declared
//! - [`Cell`] - A fully resolved cell of the matrix

mod address;
mod entity;
mod resolved;
mod value;

pub use address::{decode, encode, CellCoord};
pub use entity::{CellEntity, CellPatch};
pub(crate) use entity::lenient_span;
pub use resolved::{Cell, RenderPos};
pub use value::CellContent;
