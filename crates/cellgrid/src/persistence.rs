//! Tracking of in-flight cell saves
//!
//! Every save is issued a ticket carrying a per-coordinate generation. Only
//! the newest ticket for a coordinate may apply its response; older ones are
//! superseded.

use std::collections::HashMap;

use cellgrid_core::{CellContent, CellCoord};

/// A cell save that has been applied locally and is waiting for the service
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    pub coord: CellCoord,
    pub generation: u64,
    /// Content applied locally when the save was issued
    pub content: CellContent,
}

/// What happened to a service response
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The persisted content was applied to the matrix
    Applied(CellContent),
    /// A newer edit exists for the cell; the response was discarded
    Superseded,
}

impl SaveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SaveOutcome::Applied(_))
    }
}

/// Newest issued generation per coordinate
#[derive(Debug, Clone, Default)]
pub struct PendingSaves {
    latest: HashMap<CellCoord, u64>,
    next: u64,
}

impl PendingSaves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket, superseding any outstanding one for the same cell
    pub fn issue(&mut self, coord: CellCoord, content: CellContent) -> SaveTicket {
        self.next += 1;
        if self.latest.insert(coord, self.next).is_some() {
            tracing::debug!("save for {coord} supersedes an outstanding one");
        }
        SaveTicket {
            coord,
            generation: self.next,
            content,
        }
    }

    /// True when no newer ticket was issued for the ticket's cell
    pub fn is_latest(&self, ticket: &SaveTicket) -> bool {
        self.latest.get(&ticket.coord) == Some(&ticket.generation)
    }

    /// True when a save for `coord` is outstanding
    pub fn in_flight(&self, coord: CellCoord) -> bool {
        self.latest.contains_key(&coord)
    }

    /// Number of cells with an outstanding save
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }

    /// Retire a ticket; returns whether it was the newest for its cell
    pub fn complete(&mut self, ticket: &SaveTicket) -> bool {
        if self.is_latest(ticket) {
            self.latest.remove(&ticket.coord);
            true
        } else {
            false
        }
    }

    /// Forget every outstanding save, so their responses are all superseded
    pub fn clear(&mut self) {
        self.latest.clear();
    }
}
