//! Editor session: the live document shared between the user and the
//! insertion pipeline.
//!
//! Both sides take the session lock for one operation at a time and never
//! hold it across an await, so user edits interleave with streamed blocks
//! between chunks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::model::{merge_adjacent, split_inline, Document, Node, Position, Selection};

/// Session shared between direct edits and the command dispatcher.
pub type SharedSession = Arc<Mutex<EditorSession>>;

/// Lock a shared session.
///
/// A panic while the lock was held leaves the document in whatever state the
/// last completed operation produced, so the lock is recovered rather than
/// propagated.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, EditorSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One open editing session.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    /// The document being edited
    pub document: Document,

    /// Current user selection
    pub selection: Selection,

    /// Text typed into the prompt box, cleared after a successful generation
    pub prompt_draft: String,
}

impl EditorSession {
    /// Open a session on a document with the caret at its start.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    /// Wrap the session for sharing.
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// Replace the selection.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Text covered by the current selection.
    pub fn selected_text(&self) -> String {
        self.document.text_in(&self.selection)
    }

    /// Type text at the caret, replacing the selection if there is one.
    ///
    /// Inside a paragraph or heading the text joins the block; anywhere else
    /// it becomes a new paragraph after the caret block.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let caret = self.collapse_selection();
        let len = text.chars().count();

        match self.document.block_mut(caret.block) {
            Some(block) if block.node_type.is_textblock() => {
                let (mut left, right) = split_inline(&block.content, caret.offset);
                left.push(Node::text(text));
                left.extend(right);
                block.content = merge_adjacent(left);
                self.selection = Selection::caret(Position::new(caret.block, caret.offset + len));
            }
            _ => {
                let at = if self.document.is_empty() {
                    0
                } else {
                    (caret.block + 1).min(self.document.block_count())
                };
                self.document
                    .insert_blocks(at, vec![Node::paragraph_text(text)]);
                self.selection = Selection::caret(Position::new(at, len));
            }
        }
    }

    /// Insert a block after the caret block and move the caret into it.
    ///
    /// Returns the index of the new block.
    pub fn insert_block(&mut self, block: Node) -> usize {
        let caret = self.collapse_selection();
        let at = if self.document.is_empty() {
            0
        } else {
            (caret.block + 1).min(self.document.block_count())
        };
        self.document.insert_blocks(at, vec![block]);
        self.selection = Selection::caret(Position::new(at, 0));
        at
    }

    /// Delete a non-empty selection and return the caret position.
    fn collapse_selection(&mut self) -> Position {
        if self.selection.is_empty() {
            return self.selection.head;
        }
        let from = self.selection.from();
        let at = self.document.delete_selection(&self.selection);
        // When the head fragment was kept the caret stays at its end,
        // otherwise at the start of whatever now sits at the insertion index.
        let caret = if at > from.block {
            from
        } else {
            Position::new(at, 0)
        };
        self.selection = Selection::caret(caret);
        caret
    }
}
