//! Span resolution
//!
//! Walks the matrix top to bottom, left to right. Each cell not yet covered by
//! another cell's span becomes an owner and gets the next render index of its
//! row; cells inside its rowspan x colspan region are marked as subsumed by it.
//!
//! When two span regions intersect, the owner processed first keeps the
//! contested cell and the later region stops expanding along that row.

use super::CellMatrix;
use crate::cell::{CellCoord, RenderPos};

/// Assign span ownership and render positions across the whole matrix
///
/// Previous results are discarded first, so resolving twice is idempotent.
pub fn resolve_spans(matrix: &mut CellMatrix) {
    let rows = matrix.rows_mut();
    for row in rows.iter_mut() {
        for cell in row.iter_mut() {
            cell.reset_spans();
        }
    }

    let height = rows.len();
    for y in 0..height {
        let width = rows[y].len();
        let mut render_x = 0;

        for x in 0..width {
            if rows[y][x].subsumed_by.is_some() {
                continue;
            }
            rows[y][x].render = Some(RenderPos { x: render_x, y });
            render_x += 1;

            let colspan = rows[y][x].colspan();
            let rowspan = rows[y][x].rowspan();
            if colspan == 1 && rowspan == 1 {
                continue;
            }

            let owner = CellCoord::new(y, x);
            for dy in 0..rowspan {
                let Some(span_row) = rows.get_mut(y + dy) else {
                    break;
                };
                for dx in 0..colspan {
                    if dy == 0 && dx == 0 {
                        continue;
                    }
                    let Some(target) = span_row.get_mut(x + dx) else {
                        break;
                    };
                    if target.subsumed_by.is_some() {
                        tracing::debug!(
                            "span of {} intersects an earlier span at {}",
                            owner,
                            CellCoord::new(y + dy, x + dx)
                        );
                        break;
                    }
                    target.subsumed_by = Some(owner);
                }
            }
        }
    }
}
