//! Selection/caret controller.
//!
//! # Responsibility
//! - Translate surface hit points into model positions and back.
//! - Keep the caret valid after every structural mutation.
//!
//! # Invariants
//! - A stored selection always references an existing caret-addressable
//!   block with offsets clamped to its text length.
//! - A collapsed caret inside a todo item but outside its text run is moved
//!   to the end of that text run; checkbox hits never move it.

use crate::model::block::BlockId;
use crate::model::document::{Document, Position};

/// Part of a block the host reported a pointer or caret in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    /// The editable text run itself.
    TextRun,
    /// The non-editable todo checkbox.
    TodoCheckbox,
    /// Todo padding or container outside the text run.
    TodoDecoration,
}

/// A point on the editable surface as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfacePoint {
    pub block_id: BlockId,
    pub offset: usize,
    pub region: HitRegion,
}

impl SurfacePoint {
    pub fn text(block_id: BlockId, offset: usize) -> Self {
        Self {
            block_id,
            offset,
            region: HitRegion::TextRun,
        }
    }
}

/// Anchor/focus pair; collapsed when both are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn collapsed(position: Position) -> Self {
        Self {
            anchor: position,
            focus: position,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Owns the current selection of the editable surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionController {
    current: Selection,
}

impl SelectionController {
    pub fn new(document: &Document) -> Self {
        Self {
            current: Selection::collapsed(document.first_caret()),
        }
    }

    pub fn current(&self) -> Selection {
        self.current
    }

    /// Collapsed caret (the focus end of the selection).
    pub fn caret(&self) -> Position {
        self.current.focus
    }

    /// Applies a host-reported caret; returns the resulting caret.
    pub fn set_caret(&mut self, document: &Document, point: SurfacePoint) -> Position {
        match point.region {
            HitRegion::TodoCheckbox => self.caret(),
            HitRegion::TodoDecoration => {
                let target = document
                    .find(point.block_id)
                    .map(|block| Position::new(block.id, block.text_len()));
                match target {
                    Some(position) => self.restore(document, position),
                    None => self.caret(),
                }
            }
            HitRegion::TextRun => {
                self.restore(document, Position::new(point.block_id, point.offset))
            }
        }
    }

    /// Applies a host-reported range selection.
    pub fn select(&mut self, document: &Document, anchor: Position, focus: Position) -> Selection {
        match (document.clamp(anchor), document.clamp(focus)) {
            (Some(anchor), Some(focus)) => self.current = Selection { anchor, focus },
            _ => {
                self.revalidate(document);
            }
        }
        self.current
    }

    /// Places a collapsed caret at `target` after a mutation.
    pub fn restore(&mut self, document: &Document, target: Position) -> Position {
        let position = document
            .clamp(target)
            .unwrap_or_else(|| document.first_caret());
        self.current = Selection::collapsed(position);
        position
    }

    /// Re-clamps the stored selection after an edit that may have removed
    /// or shortened its blocks.
    pub fn revalidate(&mut self, document: &Document) {
        let anchor = document.clamp(self.current.anchor);
        let focus = document.clamp(self.current.focus);
        self.current = match (anchor, focus) {
            (Some(anchor), Some(focus)) => Selection { anchor, focus },
            (_, Some(focus)) => Selection::collapsed(focus),
            _ => Selection::collapsed(document.first_caret()),
        };
    }
}
