//! Document model types for article and change-log content.
//!
//! A document is a tree of typed nodes rooted at a single `doc` node. The
//! same tree is what the editor mutates, what the insertion pipeline splices
//! into and what the storage collaborator persists as opaque JSON.

mod document;
mod node;
mod selection;

pub use document::Document;
pub(crate) use document::block_text;
pub use node::{Attrs, LinkAttrs, Mark, Node, NodeType};
pub(crate) use node::{inline_text, merge_adjacent, split_inline};
pub use selection::{Position, Selection};
