//! Coordinate-addressed overlays layered on top of the literal declaration

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cell::{CellContent, CellCoord, CellEntity, CellPatch};

/// Sparse map from A1 text ("B12") to a content or attribute patch
///
/// Keys are kept as text so entries that fail to decode survive a
/// round-trip; the matrix builder skips them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayMap {
    cells: BTreeMap<String, CellEntity>,
}

impl OverlayMap {
    /// Create an empty overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the overlay has no entries
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get the entry stored under an address
    pub fn get(&self, address: &str) -> Option<&CellEntity> {
        self.cells.get(address)
    }

    /// Get the entry for a coordinate
    pub fn get_at(&self, coord: CellCoord) -> Option<&CellEntity> {
        self.cells.get(&coord.to_a1_string())
    }

    /// Insert an entry under a raw address, returning the previous one
    pub fn insert<K: Into<String>, E: Into<CellEntity>>(
        &mut self,
        address: K,
        entity: E,
    ) -> Option<CellEntity> {
        self.cells.insert(address.into(), entity.into())
    }

    /// Remove an entry
    pub fn remove(&mut self, address: &str) -> Option<CellEntity> {
        self.cells.remove(address)
    }

    /// Iterate entries in address order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellEntity)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Largest decodable coordinate extent as (rows, cols)
    pub fn extent(&self) -> (usize, usize) {
        self.cells
            .keys()
            .filter_map(|k| CellCoord::parse(k).ok())
            .fold((0, 0), |(rows, cols), c| {
                (rows.max(c.row + 1), cols.max(c.col + 1))
            })
    }

    /// Record new content for a coordinate
    ///
    /// Plain entries stay plain; attribute entries keep their attributes.
    pub fn set_content(&mut self, coord: CellCoord, content: CellContent) {
        let entry = self
            .cells
            .entry(coord.to_a1_string())
            .or_insert(CellEntity::Plain(CellContent::Empty));
        match entry {
            CellEntity::Plain(existing) => *existing = content,
            CellEntity::Styled(patch) => patch.cell = Some(content),
        }
    }

    /// Set a single attribute, upgrading a plain entry to the attribute form
    pub fn set_attribute(&mut self, coord: CellCoord, key: &str, value: &str) {
        // Colour pickers sometimes hand over a doubled '#'
        let value = if value.starts_with("##") {
            &value[1..]
        } else {
            value
        };

        let entry = self
            .cells
            .entry(coord.to_a1_string())
            .or_insert_with(|| CellEntity::Styled(CellPatch::default()));
        if let CellEntity::Plain(content) = entry {
            let upgraded = CellEntity::Styled(CellPatch::content(content.clone()));
            *entry = upgraded;
        }
        if let CellEntity::Styled(patch) = entry {
            patch.set_attribute(key, value);
        }
    }

    /// Remove one attribute. Returns whether anything changed.
    pub fn clear_attribute(&mut self, coord: CellCoord, key: &str) -> bool {
        match self.cells.get_mut(&coord.to_a1_string()) {
            Some(CellEntity::Styled(patch)) => patch.remove_attribute(key),
            _ => false,
        }
    }

    /// Drop every attribute, leaving only the content. Returns whether anything changed.
    ///
    /// An entry that carried attributes but no content is removed, so the
    /// declared content shows through again.
    pub fn clear_attributes(&mut self, coord: CellCoord) -> bool {
        let address = coord.to_a1_string();
        match self.cells.get(&address) {
            Some(CellEntity::Styled(patch)) => {
                match patch.cell.clone() {
                    Some(content) => {
                        self.cells.insert(address, CellEntity::Plain(content));
                    }
                    None => {
                        self.cells.remove(&address);
                    }
                }
                true
            }
            _ => false,
        }
    }

    /// Shift entries at or below `at` one row down
    pub fn insert_row(&mut self, at: usize) {
        self.remap(|c| Some(if c.row >= at { CellCoord::new(c.row + 1, c.col) } else { c }));
    }

    /// Drop entries on row `at` and shift the rows below it up
    pub fn remove_row(&mut self, at: usize) {
        self.remap(|c| match c.row.cmp(&at) {
            std::cmp::Ordering::Less => Some(c),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(CellCoord::new(c.row - 1, c.col)),
        });
    }

    /// Shift entries at or right of `at` one column right
    pub fn insert_column(&mut self, at: usize) {
        self.remap(|c| Some(if c.col >= at { CellCoord::new(c.row, c.col + 1) } else { c }));
    }

    /// Drop entries in column `at` and shift the columns right of it left
    pub fn remove_column(&mut self, at: usize) {
        self.remap(|c| match c.col.cmp(&at) {
            std::cmp::Ordering::Less => Some(c),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(CellCoord::new(c.row, c.col - 1)),
        });
    }

    /// Re-key every decodable entry; undecodable keys are carried over as-is.
    fn remap<F: Fn(CellCoord) -> Option<CellCoord>>(&mut self, f: F) {
        let old = std::mem::take(&mut self.cells);
        for (key, entity) in old {
            match CellCoord::parse(&key) {
                Ok(coord) => {
                    if let Some(target) = f(coord) {
                        self.cells.insert(target.to_a1_string(), entity);
                    }
                }
                Err(_) => {
                    self.cells.insert(key, entity);
                }
            }
        }
    }
}

impl<K: Into<String>, E: Into<CellEntity>> FromIterator<(K, E)> for OverlayMap {
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, e)| (k.into(), e.into()))
                .collect(),
        }
    }
}

/// How data block addresses are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataBlockKind {
    #[default]
    Relative,
    Abstract,
}

/// The overlay stored inside a table declaration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataBlock {
    #[serde(rename = "type", default)]
    pub kind: DataBlockKind,
    #[serde(default)]
    pub cells: OverlayMap,
}

impl DataBlock {
    pub fn new(cells: OverlayMap) -> Self {
        Self {
            kind: DataBlockKind::Relative,
            cells,
        }
    }
}
