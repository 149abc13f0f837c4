//! Positions and selections inside a document.

use serde::{Deserialize, Serialize};

/// A position in the document: a top-level block and a character offset
/// into that block's flattened text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Top-level block index
    pub block: usize,
    /// Character offset within the block text
    pub offset: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// A user selection between an anchor and a head position.
///
/// The anchor is where the selection started; the head may be before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Where the selection started
    pub anchor: Position,
    /// Where the selection currently ends
    pub head: Position,
}

impl Selection {
    /// Create a selection between two positions.
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// A collapsed selection (caret) at a position.
    pub fn caret(at: Position) -> Self {
        Self::new(at, at)
    }

    /// A selection inside one block between two character offsets.
    pub fn within(block: usize, from: usize, to: usize) -> Self {
        Self::new(Position::new(block, from), Position::new(block, to))
    }

    /// The earlier endpoint.
    pub fn from(&self) -> Position {
        self.anchor.min(self.head)
    }

    /// The later endpoint.
    pub fn to(&self) -> Position {
        self.anchor.max(self.head)
    }

    /// Check if the selection is collapsed.
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Check if the selection spans more than one block.
    pub fn is_multi_block(&self) -> bool {
        self.anchor.block != self.head.block
    }
}
