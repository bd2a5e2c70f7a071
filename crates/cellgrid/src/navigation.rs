//! Cursor movement over a resolved matrix
//!
//! Moves always land on span owners. Stepping along one axis through merged
//! cells of different sizes remembers the coordinate on the other axis, so
//! repeated Down presses stay in the same visual column even after passing
//! through a wide cell.

use std::fmt;
use std::str::FromStr;

use cellgrid_core::{CellCoord, CellMatrix};

/// The axis a movement runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// One of the four movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The axis this direction moves along
    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a direction name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown direction: {0}")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDirectionError(s.to_string()))
    }
}

/// The remembered perpendicular coordinate of the last move
///
/// After a vertical move `coord` is a column; after a horizontal move it is
/// a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisLock {
    pub axis: Axis,
    pub coord: usize,
}

/// The active cell plus the anchor of a range selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub active: CellCoord,
    pub anchor: CellCoord,
}

impl Selection {
    /// A selection of a single cell
    pub fn single(coord: CellCoord) -> Self {
        Self {
            active: coord,
            anchor: coord,
        }
    }

    /// Top-left corner of the selected rectangle
    pub fn top_left(&self) -> CellCoord {
        CellCoord::new(
            self.active.row.min(self.anchor.row),
            self.active.col.min(self.anchor.col),
        )
    }

    /// Bottom-right corner of the selected rectangle (inclusive)
    pub fn bottom_right(&self) -> CellCoord {
        CellCoord::new(
            self.active.row.max(self.anchor.row),
            self.active.col.max(self.anchor.col),
        )
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        let (start, end) = (self.top_left(), self.bottom_right());
        (start.row..=end.row).contains(&coord.row) && (start.col..=end.col).contains(&coord.col)
    }

    /// Every coordinate in the rectangle, row by row
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let (start, end) = (self.top_left(), self.bottom_right());
        (start.row..=end.row)
            .flat_map(move |row| (start.col..=end.col).map(move |col| CellCoord::new(row, col)))
    }
}

/// Selection state and the movement algorithm
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    selection: Option<Selection>,
    lock: Option<AxisLock>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn active(&self) -> Option<CellCoord> {
        self.selection.map(|s| s.active)
    }

    pub fn lock(&self) -> Option<AxisLock> {
        self.lock
    }

    /// Forget the selection and the axis lock
    pub fn clear(&mut self) {
        self.selection = None;
        self.lock = None;
    }

    /// Select the owner of `coord` directly, as a click does
    ///
    /// Clears the axis lock. Returns the owner, or `None` when `coord` lies
    /// outside the matrix.
    pub fn click(&mut self, matrix: &CellMatrix, coord: CellCoord, extend: bool) -> Option<CellCoord> {
        let owner = matrix.owner_of(coord)?;
        self.lock = None;
        self.place(owner, extend);
        Some(owner)
    }

    /// Move the active cell one step in `direction`
    ///
    /// Returns the new active cell, or `None` when nothing is active or the
    /// matrix is empty.
    pub fn move_active(
        &mut self,
        matrix: &CellMatrix,
        direction: Direction,
        extend: bool,
    ) -> Option<CellCoord> {
        let active = self.active()?;
        if matrix.is_empty() {
            return None;
        }
        let (rows, cols) = (matrix.row_count(), matrix.col_count());

        let mut source = active;
        if let Some(lock) = self.lock.filter(|l| l.axis == direction.axis()) {
            match lock.axis {
                Axis::Vertical => source.col = lock.coord,
                Axis::Horizontal => source.row = lock.coord,
            }
        }
        source = CellCoord::new(source.row.min(rows - 1), source.col.min(cols - 1));

        let owner = matrix.owner_of(source)?;
        let cell = matrix.cell(owner)?;
        let neighbour = match direction {
            Direction::Up => CellCoord::new(wrap(owner.row.checked_sub(1), rows), source.col),
            Direction::Down => CellCoord::new(wrap(Some(owner.row + cell.rowspan()), rows), source.col),
            Direction::Left => CellCoord::new(source.row, wrap(owner.col.checked_sub(1), cols)),
            Direction::Right => CellCoord::new(source.row, wrap(Some(owner.col + cell.colspan()), cols)),
        };

        self.lock = Some(AxisLock {
            axis: direction.axis(),
            coord: match direction.axis() {
                Axis::Vertical => neighbour.col,
                Axis::Horizontal => neighbour.row,
            },
        });

        let target = matrix.owner_of(neighbour)?;
        tracing::debug!("move {direction} from {active} lands on {target}");
        self.place(target, extend);
        Some(target)
    }

    /// Re-resolve the selection against a rebuilt matrix
    ///
    /// Cells that became subsumed move to their owner; a selection that fell
    /// outside the matrix is dropped.
    pub fn revalidate(&mut self, matrix: &CellMatrix) {
        self.selection = self.selection.and_then(|s| {
            Some(Selection {
                active: matrix.owner_of(s.active)?,
                anchor: matrix.owner_of(s.anchor)?,
            })
        });
        if self.selection.is_none() {
            self.lock = None;
        }
    }

    fn place(&mut self, owner: CellCoord, extend: bool) {
        self.selection = match self.selection {
            Some(s) if extend => Some(Selection {
                active: owner,
                anchor: s.anchor,
            }),
            _ => Some(Selection::single(owner)),
        };
    }
}

/// Wrap an index into `0..n`: below zero becomes the last index and at or
/// past the end becomes zero
fn wrap(index: Option<usize>, n: usize) -> usize {
    match index {
        None => n - 1,
        Some(i) if i >= n => 0,
        Some(i) => i,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgrid_core::{CellMatrixBuilder, TableDeclaration};
    use pretty_assertions::assert_eq;

    fn matrix(json: &str) -> CellMatrix {
        CellMatrixBuilder::new(&TableDeclaration::from_json(json).unwrap()).build()
    }

    fn at(row: usize, col: usize) -> CellCoord {
        CellCoord::new(row, col)
    }

    #[test]
    fn test_right_skips_colspan() {
        let m = matrix(r#"{"countRow": 3, "countCol": 3, "rows": [{"row": [{"cell": "a", "colspan": 2}]}]}"#);
        let mut nav = Navigator::new();
        nav.click(&m, at(0, 0), false);
        assert_eq!(nav.move_active(&m, Direction::Right, false), Some(at(0, 2)));
    }

    #[test]
    fn test_click_on_subsumed_selects_owner() {
        let m = matrix(r#"{"countRow": 3, "countCol": 3, "rows": [{"row": [{"cell": "a", "colspan": 2}]}]}"#);
        let mut nav = Navigator::new();
        assert_eq!(nav.click(&m, at(0, 1), false), Some(at(0, 0)));
        assert_eq!(nav.click(&m, at(7, 7), false), None);
    }

    #[test]
    fn test_wraparound() {
        let m = matrix(r#"{"countRow": 3, "countCol": 4}"#);
        let mut nav = Navigator::new();
        for row in 0..3 {
            nav.click(&m, at(row, 0), false);
            assert_eq!(nav.move_active(&m, Direction::Left, false), Some(at(row, 3)));
            assert_eq!(nav.move_active(&m, Direction::Right, false), Some(at(row, 0)));
        }
        for col in 0..4 {
            nav.click(&m, at(0, col), false);
            assert_eq!(nav.move_active(&m, Direction::Up, false), Some(at(2, col)));
            assert_eq!(nav.move_active(&m, Direction::Down, false), Some(at(0, col)));
        }
    }

    #[test]
    fn test_down_skips_rowspan() {
        let m = matrix(r#"{"countRow": 4, "countCol": 2, "rows": [{"row": [{"cell": "a", "rowspan": 3}]}]}"#);
        let mut nav = Navigator::new();
        nav.click(&m, at(0, 0), false);
        assert_eq!(nav.move_active(&m, Direction::Down, false), Some(at(3, 0)));
    }

    #[test]
    fn test_vertical_moves_keep_column_through_wide_cell() {
        let m = matrix(r#"{"countRow": 3, "countCol": 3, "rows": [{"row": [{"cell": "wide", "colspan": 2}]}]}"#);
        let mut nav = Navigator::new();
        nav.click(&m, at(2, 1), false);

        assert_eq!(nav.move_active(&m, Direction::Up, false), Some(at(1, 1)));
        assert_eq!(nav.move_active(&m, Direction::Up, false), Some(at(0, 0)));
        assert_eq!(nav.lock(), Some(AxisLock { axis: Axis::Vertical, coord: 1 }));
        // Back down into column B rather than column A
        assert_eq!(nav.move_active(&m, Direction::Down, false), Some(at(1, 1)));
    }

    #[test]
    fn test_horizontal_moves_keep_row_through_tall_cell() {
        let m = matrix(r#"{"countRow": 3, "countCol": 3, "rows": [{"row": [{"cell": "tall", "rowspan": 2}]}]}"#);
        let mut nav = Navigator::new();
        nav.click(&m, at(1, 2), false);

        assert_eq!(nav.move_active(&m, Direction::Left, false), Some(at(1, 1)));
        assert_eq!(nav.move_active(&m, Direction::Left, false), Some(at(0, 0)));
        assert_eq!(nav.move_active(&m, Direction::Right, false), Some(at(1, 1)));
    }

    #[test]
    fn test_click_clears_lock() {
        let m = matrix(r#"{"countRow": 3, "countCol": 3}"#);
        let mut nav = Navigator::new();
        nav.click(&m, at(0, 0), false);
        nav.move_active(&m, Direction::Down, false);
        assert!(nav.lock().is_some());
        nav.click(&m, at(2, 2), false);
        assert_eq!(nav.lock(), None);
    }

    #[test]
    fn test_extend_keeps_anchor() {
        let m = matrix(r#"{"countRow": 3, "countCol": 3}"#);
        let mut nav = Navigator::new();
        nav.click(&m, at(0, 0), false);
        nav.move_active(&m, Direction::Right, true);
        nav.move_active(&m, Direction::Down, true);

        let sel = nav.selection().unwrap();
        assert_eq!(sel.anchor, at(0, 0));
        assert_eq!(sel.active, at(1, 1));
        assert_eq!(sel.cells().count(), 4);
        assert!(sel.contains(at(1, 0)));
        assert!(!sel.contains(at(2, 0)));

        nav.move_active(&m, Direction::Down, false);
        assert_eq!(nav.selection(), Some(Selection::single(at(2, 1))));
    }

    #[test]
    fn test_no_active_cell_does_nothing() {
        let m = matrix(r#"{"countRow": 2, "countCol": 2}"#);
        let mut nav = Navigator::new();
        assert_eq!(nav.move_active(&m, Direction::Down, false), None);
    }

    #[test]
    fn test_revalidate() {
        let mut nav = Navigator::new();
        let m = matrix(r#"{"countRow": 3, "countCol": 3}"#);
        nav.click(&m, at(0, 1), false);

        let merged = matrix(r#"{"countRow": 3, "countCol": 3, "rows": [{"row": [{"cell": "a", "colspan": 2}]}]}"#);
        nav.revalidate(&merged);
        assert_eq!(nav.active(), Some(at(0, 0)));

        nav.click(&merged, at(2, 2), false);
        nav.revalidate(&matrix(r#"{"countRow": 2, "countCol": 2}"#));
        assert_eq!(nav.selection(), None);
    }

    #[test]
    fn test_direction_names() {
        assert_eq!("Up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!(" right ".parse::<Direction>().unwrap(), Direction::Right);
        assert!("north".parse::<Direction>().is_err());
    }
}
