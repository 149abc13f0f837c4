//! Document-level types.

use super::node::{byte_index, split_inline};
use super::{Node, NodeType, Selection};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// An article or change-log body.
///
/// The document owns a `doc` root node whose children are the top-level
/// blocks. Deserialization validates the tree, so a `Document` read from
/// storage always satisfies the structural invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Node", into = "Node")]
pub struct Document {
    root: Node,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            root: Node::new(NodeType::Doc),
        }
    }

    /// Create a document from top-level blocks.
    pub fn from_blocks(blocks: Vec<Node>) -> Self {
        Self {
            root: Node::with_content(NodeType::Doc, blocks),
        }
    }

    /// Parse and validate a persisted document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a document from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize to compact JSON for storage.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Convert to a JSON value for the persistence boundary.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// The `doc` root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Top-level blocks.
    pub fn blocks(&self) -> &[Node] {
        &self.root.content
    }

    /// Get a top-level block.
    pub fn block(&self, index: usize) -> Option<&Node> {
        self.root.content.get(index)
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.root.content.get_mut(index)
    }

    /// Number of top-level blocks.
    pub fn block_count(&self) -> usize {
        self.root.content.len()
    }

    /// Check if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.root.content.is_empty()
    }

    /// Append a block at the end.
    pub fn push_block(&mut self, block: Node) {
        self.root.content.push(block);
    }

    /// Insert blocks at `index`, clamped to the document length.
    ///
    /// Returns the index range now occupied by the inserted blocks.
    pub fn insert_blocks(&mut self, index: usize, blocks: Vec<Node>) -> Range<usize> {
        let at = index.min(self.root.content.len());
        let count = blocks.len();
        self.root.content.splice(at..at, blocks);
        at..at + count
    }

    /// Remove a top-level block.
    pub fn remove_block(&mut self, index: usize) -> Option<Node> {
        if index < self.root.content.len() {
            Some(self.root.content.remove(index))
        } else {
            None
        }
    }

    /// Plain text of the whole document, blocks separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.blocks()
            .iter()
            .map(block_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// The text covered by a selection.
    ///
    /// Offsets apply to textblocks; other blocks touched by the selection
    /// contribute their whole text.
    pub fn text_in(&self, selection: &Selection) -> String {
        if selection.is_empty() || self.is_empty() {
            return String::new();
        }
        let last = self.block_count() - 1;
        let from = selection.from();
        let to = selection.to();
        // Past the end: nothing is selected, as in `delete_selection`.
        if from.block > last {
            return String::new();
        }
        let end = to.block.min(last);

        let mut parts = Vec::new();
        for index in from.block..=end {
            let block = &self.blocks()[index];
            if !block.node_type.is_textblock() {
                parts.push(block_text(block));
                continue;
            }
            let text = block.text_content();
            let lo = if index == from.block { from.offset } else { 0 };
            let hi = if index == to.block {
                to.offset
            } else {
                usize::MAX
            };
            parts.push(char_slice(&text, lo, hi).to_string());
        }
        parts.join("\n")
    }

    /// Delete the selected content and return the block index where new
    /// content should be inserted.
    ///
    /// Text before the selection start and after the selection end is kept;
    /// fragments that end up empty are dropped, so a fully selected block
    /// disappears. Non-text blocks touched by the selection are removed whole.
    pub fn delete_selection(&mut self, selection: &Selection) -> usize {
        if self.is_empty() {
            return 0;
        }
        let last = self.block_count() - 1;
        let from = selection.from();
        let to = selection.to();
        if from.block > last {
            return self.block_count();
        }
        if selection.is_empty() {
            return (from.block + 1).min(self.block_count());
        }
        let end = to.block.min(last);
        let end_offset = if to.block > last { usize::MAX } else { to.offset };

        let head = {
            let block = &self.blocks()[from.block];
            if block.node_type.is_textblock() && from.offset > 0 {
                let (left, _) = split_inline(&block.content, from.offset);
                Some(Node {
                    content: left,
                    ..block.clone()
                })
            } else {
                None
            }
        }
        .filter(|node| !node.content.is_empty());
        let tail = {
            let block = &self.blocks()[end];
            if block.node_type.is_textblock() && end_offset < block.char_len() {
                let (_, right) = split_inline(&block.content, end_offset);
                Some(Node {
                    content: right,
                    ..block.clone()
                })
            } else {
                None
            }
        }
        .filter(|node| !node.content.is_empty());

        let insert_at = from.block + usize::from(head.is_some());
        let kept: Vec<Node> = head.into_iter().chain(tail).collect();

        log::debug!(
            "Deleting selection {}:{}..{}:{} ({} fragments kept)",
            from.block,
            from.offset,
            end,
            end_offset,
            kept.len()
        );

        self.root.content.splice(from.block..=end, kept);
        insert_at
    }

    /// Check the structural invariants of the tree.
    pub fn validate(&self) -> Result<()> {
        if self.root.node_type != NodeType::Doc {
            return Err(Error::InvalidDocument(format!(
                "root must be doc, found {}",
                self.root.node_type
            )));
        }
        for (i, child) in self.root.content.iter().enumerate() {
            if !child.node_type.is_block() {
                return Err(Error::InvalidDocument(format!(
                    "{} is not allowed at top level (/{})",
                    child.node_type, i
                )));
            }
            validate_node(child, &format!("/{}", i))?;
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Node> for Document {
    type Error = Error;

    fn try_from(root: Node) -> Result<Self> {
        let doc = Self { root };
        doc.validate()?;
        Ok(doc)
    }
}

impl From<Document> for Node {
    fn from(doc: Document) -> Self {
        doc.root
    }
}

fn validate_node(node: &Node, path: &str) -> Result<()> {
    let invalid = |msg: String| Err(Error::InvalidDocument(format!("{} ({})", msg, path)));

    match node.node_type {
        NodeType::Doc => return invalid("doc may only appear as the root".to_string()),
        NodeType::Text => {
            if !node.content.is_empty() {
                return invalid("text nodes cannot have children".to_string());
            }
            if node.text.is_none() {
                return invalid("text node without text".to_string());
            }
            return Ok(());
        }
        NodeType::Heading => {
            if node.heading_level().is_none() {
                return invalid(format!(
                    "heading level must be 1-6, found {}",
                    node.attr("level")
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "none".to_string())
                ));
            }
        }
        _ => {}
    }

    if node.text.is_some() {
        return invalid(format!("{} cannot carry text", node.node_type));
    }

    for (i, child) in node.content.iter().enumerate() {
        let child_path = format!("{}/{}", path, i);
        let ok = match node.node_type {
            NodeType::BulletList | NodeType::OrderedList => child.node_type == NodeType::ListItem,
            NodeType::ListItem | NodeType::Blockquote => child.node_type.is_block(),
            NodeType::Paragraph | NodeType::Heading | NodeType::CodeBlock => {
                child.node_type.is_inline()
            }
            _ => child.node_type != NodeType::Doc,
        };
        if !ok {
            return Err(Error::InvalidDocument(format!(
                "{} cannot contain {} ({})",
                node.node_type, child.node_type, child_path
            )));
        }
        validate_node(child, &child_path)?;
    }
    Ok(())
}

/// Text of a block; nested blocks are separated by newlines.
pub(crate) fn block_text(node: &Node) -> String {
    if node.node_type.is_textblock() || node.node_type.is_inline() {
        return node.text_content();
    }
    node.content
        .iter()
        .map(block_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Slice by character offsets, clamped to the string.
fn char_slice(text: &str, from: usize, to: usize) -> &str {
    let start = byte_index(text, from);
    let end = byte_index(text, to).max(start);
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    fn sample() -> Document {
        Document::from_blocks(vec![
            Node::heading_text(1, "Title"),
            Node::paragraph_text("Hello world"),
            Node::paragraph_text("Second"),
        ])
    }

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.block_count(), 0);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_insert_blocks_clamps() {
        let mut doc = sample();
        let range = doc.insert_blocks(99, vec![Node::paragraph_text("end")]);
        assert_eq!(range, 3..4);
        assert_eq!(doc.block(3).unwrap().text_content(), "end");
    }

    #[test]
    fn test_text_in_single_block() {
        let doc = sample();
        let sel = Selection::within(1, 6, 11);
        assert_eq!(doc.text_in(&sel), "world");
    }

    #[test]
    fn test_text_in_multi_block() {
        let doc = sample();
        let sel = Selection::new(Position::new(1, 6), Position::new(2, 3));
        assert_eq!(doc.text_in(&sel), "world\nSec");
    }

    #[test]
    fn test_stale_selection_selects_nothing() {
        let mut doc = Document::from_blocks(vec![
            Node::paragraph_text("a"),
            Node::paragraph_text("keep me"),
        ]);
        let stale = Selection::within(5, 0, 3);

        assert_eq!(doc.text_in(&stale), "");
        assert_eq!(doc.delete_selection(&stale), 2);
        assert_eq!(doc.plain_text(), "a\n\nkeep me");
    }

    #[test]
    fn test_delete_whole_block() {
        let mut doc = sample();
        let at = doc.delete_selection(&Selection::within(1, 0, 11));
        assert_eq!(at, 1);
        assert_eq!(doc.block_count(), 2);
        assert_eq!(doc.block(1).unwrap().text_content(), "Second");
    }

    #[test]
    fn test_delete_middle_of_block_splits() {
        let mut doc = sample();
        let at = doc.delete_selection(&Selection::within(1, 5, 6));
        assert_eq!(at, 2);
        assert_eq!(doc.block(1).unwrap().text_content(), "Hello");
        assert_eq!(doc.block(2).unwrap().text_content(), "world");
        assert_eq!(doc.block(3).unwrap().text_content(), "Second");
    }

    #[test]
    fn test_delete_across_blocks() {
        let mut doc = sample();
        let at = doc.delete_selection(&Selection::new(Position::new(1, 5), Position::new(2, 3)));
        assert_eq!(at, 2);
        assert_eq!(doc.block_count(), 3);
        assert_eq!(doc.block(1).unwrap().text_content(), "Hello");
        assert_eq!(doc.block(2).unwrap().text_content(), "ond");
    }

    #[test]
    fn test_delete_suffix_keeps_head() {
        let mut doc = sample();
        let at = doc.delete_selection(&Selection::within(1, 5, 11));
        assert_eq!(at, 2);
        assert_eq!(doc.block(1).unwrap().text_content(), "Hello");
        assert_eq!(doc.block(2).unwrap().text_content(), "Second");
    }

    #[test]
    fn test_delete_prefix_keeps_tail() {
        let mut doc = sample();
        let at = doc.delete_selection(&Selection::within(1, 0, 6));
        assert_eq!(at, 1);
        assert_eq!(doc.block(1).unwrap().text_content(), "world");
    }

    #[test]
    fn test_validate_heading_level() {
        let doc = Document::from_blocks(vec![Node::with_content(
            NodeType::Heading,
            vec![Node::text("x")],
        )
        .with_attr("level", 7)]);
        assert!(matches!(doc.validate(), Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_validate_nested_doc() {
        let doc = Document::from_blocks(vec![Node::blockquote(vec![Node::new(NodeType::Doc)])]);
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_validate_list_item_children() {
        let doc = Document::from_blocks(vec![Node::bullet_list(vec![Node::list_item(vec![
            Node::text("inline"),
        ])])]);
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_validates() {
        let json = r#"{"type":"doc","content":[{"type":"heading","attrs":{"level":2},"content":[{"type":"text","text":"Hi"}]}]}"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.block(0).unwrap().heading_level(), Some(2));
        assert_eq!(doc.to_json().unwrap(), json);

        let bad = r#"{"type":"paragraph"}"#;
        assert!(Document::from_json(bad).is_err());
    }
}
