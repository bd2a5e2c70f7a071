//! The single-cell edit session state machine
//!
//! ```text
//! Idle ──select──▶ Selected ──open──▶ InlineEditing ──expand──▶ ExpandedEditing
//!                     ▲                  │      ▲                    │
//!                     └──finish/discard──┘      └──────collapse──────┘
//! ```

use std::fmt;

use cellgrid_core::CellCoord;

use crate::error::{EngineError, Result};
use crate::navigation::Direction;

/// Where the edit session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditPhase {
    #[default]
    Idle,
    Selected,
    InlineEditing,
    ExpandedEditing,
}

impl EditPhase {
    /// True while an editor (inline or expanded) is open
    pub fn is_editing(self) -> bool {
        matches!(self, EditPhase::InlineEditing | EditPhase::ExpandedEditing)
    }
}

impl fmt::Display for EditPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EditPhase::Idle => "idle",
            EditPhase::Selected => "a cell is selected",
            EditPhase::InlineEditing => "editing inline",
            EditPhase::ExpandedEditing => "the expanded editor is open",
        })
    }
}

/// Text being edited for one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub coord: CellCoord,
    /// Content when the editor was opened
    pub initial: String,
    /// Current editor text
    pub text: String,
}

impl EditDraft {
    pub fn new<S: Into<String>>(coord: CellCoord, initial: S) -> Self {
        let initial = initial.into();
        Self {
            coord,
            text: initial.clone(),
            initial,
        }
    }

    /// True when the text differs from what the editor was opened with
    pub fn is_modified(&self) -> bool {
        self.text != self.initial
    }
}

/// Keys the presentation surface forwards to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter { shift: bool },
    Tab { shift: bool },
    Escape,
    F2,
    Arrow { direction: Direction, extend: bool },
}

/// Outcome of the expanded editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandedAction {
    Save(String),
    Cancel,
}

/// Phase plus the draft of the cell being edited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    phase: EditPhase,
    draft: Option<EditDraft>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut EditDraft> {
        self.draft.as_mut()
    }

    /// Coordinate of the cell being edited, if any
    pub fn editing(&self) -> Option<CellCoord> {
        self.draft.as_ref().map(|d| d.coord)
    }

    /// A cell became selected without opening an editor
    pub fn select(&mut self) -> Result<()> {
        match self.phase {
            EditPhase::Idle | EditPhase::Selected => {
                self.phase = EditPhase::Selected;
                Ok(())
            }
            phase => Err(invalid("select a cell", phase)),
        }
    }

    /// Open the inline editor with `draft`
    ///
    /// Any previous draft must have been finished first.
    pub fn open_inline(&mut self, draft: EditDraft) -> Result<()> {
        match self.phase {
            EditPhase::Idle | EditPhase::Selected => {
                self.draft = Some(draft);
                self.phase = EditPhase::InlineEditing;
                Ok(())
            }
            phase => Err(invalid("open the inline editor", phase)),
        }
    }

    /// Switch from the inline editor to the expanded editor
    pub fn expand(&mut self) -> Result<()> {
        match self.phase {
            EditPhase::InlineEditing => {
                self.phase = EditPhase::ExpandedEditing;
                Ok(())
            }
            phase => Err(invalid("open the expanded editor", phase)),
        }
    }

    /// Return from the expanded editor to the inline editor
    pub fn collapse(&mut self) -> Result<()> {
        match self.phase {
            EditPhase::ExpandedEditing => {
                self.phase = EditPhase::InlineEditing;
                Ok(())
            }
            phase => Err(invalid("close the expanded editor", phase)),
        }
    }

    /// Close the inline editor and hand back its draft
    pub fn finish(&mut self) -> Result<Option<EditDraft>> {
        match self.phase {
            EditPhase::InlineEditing => {
                self.phase = EditPhase::Selected;
                Ok(self.draft.take())
            }
            EditPhase::Idle | EditPhase::Selected => Ok(None),
            phase => Err(invalid("finish editing", phase)),
        }
    }

    /// Drop any editor and draft, keeping a selected phase
    pub fn reset_to_selected(&mut self) {
        if let Some(draft) = self.draft.take() {
            tracing::debug!("discarding draft for {}", draft.coord);
        }
        self.phase = EditPhase::Selected;
    }

    /// Back to idle with nothing selected
    pub fn reset(&mut self) {
        self.draft = None;
        self.phase = EditPhase::Idle;
    }
}

fn invalid(action: &'static str, phase: EditPhase) -> EngineError {
    EngineError::InvalidEditState { action, phase }
}
