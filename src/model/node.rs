//! Node-level types: node kinds, marks and the tree node itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Node attributes, keyed by attribute name.
pub type Attrs = BTreeMap<String, Value>;

/// The kind of a document node.
///
/// Node names follow the camelCase names used in persisted article bodies.
/// Names this crate does not know are kept verbatim in [`NodeType::Other`]
/// so that a load/save cycle never loses them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    /// The document root
    Doc,
    /// A paragraph of inline content
    Paragraph,
    /// A heading with a `level` attribute (1-6)
    Heading,
    /// An unordered list of `listItem`s
    BulletList,
    /// An ordered list of `listItem`s with an optional `start` attribute
    OrderedList,
    /// A list item wrapping block nodes
    ListItem,
    /// A block quotation wrapping block nodes
    Blockquote,
    /// A run of text with optional marks
    Text,
    /// An image with `src`, `alt`, `title` and `width` attributes
    Image,
    /// Preformatted code with an optional `language` attribute
    CodeBlock,
    /// A thematic break
    HorizontalRule,
    /// A hard line break inside a textblock
    HardBreak,
    /// Any other node type, kept by name
    Other(String),
}

impl NodeType {
    /// The persisted name of this node type.
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Doc => "doc",
            NodeType::Paragraph => "paragraph",
            NodeType::Heading => "heading",
            NodeType::BulletList => "bulletList",
            NodeType::OrderedList => "orderedList",
            NodeType::ListItem => "listItem",
            NodeType::Blockquote => "blockquote",
            NodeType::Text => "text",
            NodeType::Image => "image",
            NodeType::CodeBlock => "codeBlock",
            NodeType::HorizontalRule => "horizontalRule",
            NodeType::HardBreak => "hardBreak",
            NodeType::Other(name) => name,
        }
    }

    /// Whether nodes of this type live inside textblocks.
    pub fn is_inline(&self) -> bool {
        matches!(self, NodeType::Text | NodeType::HardBreak)
    }

    /// Whether nodes of this type may appear as block children.
    pub fn is_block(&self) -> bool {
        !self.is_inline() && *self != NodeType::Doc
    }

    /// Whether this is a block holding inline content directly.
    pub fn is_textblock(&self) -> bool {
        matches!(
            self,
            NodeType::Paragraph | NodeType::Heading | NodeType::CodeBlock
        )
    }

    /// Whether this is a list container.
    pub fn is_list(&self) -> bool {
        matches!(self, NodeType::BulletList | NodeType::OrderedList)
    }
}

impl From<String> for NodeType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "doc" => NodeType::Doc,
            "paragraph" => NodeType::Paragraph,
            "heading" => NodeType::Heading,
            "bulletList" => NodeType::BulletList,
            "orderedList" => NodeType::OrderedList,
            "listItem" => NodeType::ListItem,
            "blockquote" => NodeType::Blockquote,
            "text" => NodeType::Text,
            "image" => NodeType::Image,
            "codeBlock" => NodeType::CodeBlock,
            "horizontalRule" => NodeType::HorizontalRule,
            "hardBreak" => NodeType::HardBreak,
            _ => NodeType::Other(name),
        }
    }
}

impl From<NodeType> for String {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inline mark applied to a text node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    /// Strong emphasis
    Bold,
    /// Emphasis
    Italic,
    /// Inline code
    Code,
    /// Strikethrough
    Strike,
    /// Underline
    Underline,
    /// Hyperlink
    Link {
        /// Link target and title
        attrs: LinkAttrs,
    },
    /// A mark type this crate does not model
    #[serde(other)]
    Unsupported,
}

impl Mark {
    /// Create a link mark.
    pub fn link(href: impl Into<String>) -> Self {
        Mark::Link {
            attrs: LinkAttrs {
                href: href.into(),
                title: None,
            },
        }
    }
}

/// Attributes of a link mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAttrs {
    /// Link URL
    pub href: String,

    /// Link title (tooltip)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A node of the document tree.
///
/// Block nodes carry `content`; `text` nodes carry `text` and `marks` and
/// never have children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node kind
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Node attributes (heading level, image source, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: Attrs,

    /// Ordered children
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,

    /// Text payload of `text` nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Marks of `text` nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl Node {
    /// Create an empty node of the given type.
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            attrs: Attrs::new(),
            content: Vec::new(),
            text: None,
            marks: Vec::new(),
        }
    }

    /// Create a node with children.
    pub fn with_content(node_type: NodeType, content: Vec<Node>) -> Self {
        Self {
            content,
            ..Self::new(node_type)
        }
    }

    /// Create a plain text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(NodeType::Text)
        }
    }

    /// Create a text node with marks.
    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self {
            marks,
            ..Self::text(text)
        }
    }

    /// Create a paragraph from inline nodes.
    pub fn paragraph(inline: Vec<Node>) -> Self {
        Self::with_content(NodeType::Paragraph, inline)
    }

    /// Create a paragraph holding a single plain text run.
    ///
    /// An empty string yields an empty paragraph.
    pub fn paragraph_text(text: &str) -> Self {
        Self::paragraph(inline_text(text))
    }

    /// Create a heading. The level is clamped to 1-6.
    pub fn heading(level: u8, inline: Vec<Node>) -> Self {
        Self::with_content(NodeType::Heading, inline).with_attr("level", level.clamp(1, 6))
    }

    /// Create a heading holding a single plain text run.
    pub fn heading_text(level: u8, text: &str) -> Self {
        Self::heading(level, inline_text(text))
    }

    /// Create a bullet list.
    pub fn bullet_list(items: Vec<Node>) -> Self {
        Self::with_content(NodeType::BulletList, items)
    }

    /// Create an ordered list starting at `start`.
    pub fn ordered_list(start: u64, items: Vec<Node>) -> Self {
        Self::with_content(NodeType::OrderedList, items).with_attr("start", start)
    }

    /// Create a list item wrapping block nodes.
    pub fn list_item(blocks: Vec<Node>) -> Self {
        Self::with_content(NodeType::ListItem, blocks)
    }

    /// Create a blockquote wrapping block nodes.
    pub fn blockquote(blocks: Vec<Node>) -> Self {
        Self::with_content(NodeType::Blockquote, blocks)
    }

    /// Create a code block.
    pub fn code_block(language: Option<&str>, code: &str) -> Self {
        let mut node = Self::with_content(NodeType::CodeBlock, inline_text(code));
        if let Some(lang) = language.filter(|l| !l.is_empty()) {
            node.set_attr("language", lang);
        }
        node
    }

    /// Create an image node.
    pub fn image(src: impl Into<String>, alt: Option<&str>, title: Option<&str>) -> Self {
        let mut node = Self::new(NodeType::Image).with_attr("src", src.into());
        if let Some(alt) = alt {
            node.set_attr("alt", alt);
        }
        if let Some(title) = title {
            node.set_attr("title", title);
        }
        node
    }

    /// Create a horizontal rule.
    pub fn horizontal_rule() -> Self {
        Self::new(NodeType::HorizontalRule)
    }

    /// Create a hard break.
    pub fn hard_break() -> Self {
        Self::new(NodeType::HardBreak)
    }

    /// Set an attribute, builder style.
    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, name: &str, value: impl Into<Value>) {
        self.attrs.insert(name.to_string(), value.into());
    }

    /// Get an attribute.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// Get a string attribute.
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(Value::as_str)
    }

    /// Get an unsigned integer attribute.
    pub fn attr_u64(&self, name: &str) -> Option<u64> {
        self.attr(name).and_then(Value::as_u64)
    }

    /// Heading level, if this is a heading with a valid level.
    pub fn heading_level(&self) -> Option<u8> {
        if self.node_type != NodeType::Heading {
            return None;
        }
        self.attr_u64("level")
            .filter(|l| (1..=6).contains(l))
            .map(|l| l as u8)
    }

    /// Check if this is a text node.
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Check if this node has a given mark.
    pub fn has_mark(&self, mark: &Mark) -> bool {
        self.marks.contains(mark)
    }

    /// Flattened text content. Hard breaks become `\n`.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(self.text.as_deref().unwrap_or_default()),
            NodeType::HardBreak => out.push('\n'),
            _ => {
                for child in &self.content {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Length of the flattened text content in characters.
    pub fn char_len(&self) -> usize {
        match self.node_type {
            NodeType::Text => self.text.as_deref().map_or(0, |t| t.chars().count()),
            NodeType::HardBreak => 1,
            _ => self.content.iter().map(Node::char_len).sum(),
        }
    }

    /// Check if this node holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.text.as_deref().map_or(true, str::is_empty)
    }

    /// Count nodes in this subtree (including self).
    pub fn node_count(&self) -> usize {
        1 + self.content.iter().map(Node::node_count).sum::<usize>()
    }
}

/// Inline content for a plain string: one text node, or nothing when empty.
pub(crate) fn inline_text(text: &str) -> Vec<Node> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Node::text(text)]
    }
}

/// Split inline content at a character offset.
///
/// Text nodes straddling the offset are cut in two, keeping their marks.
pub(crate) fn split_inline(content: &[Node], offset: usize) -> (Vec<Node>, Vec<Node>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut seen = 0;

    for node in content {
        let len = node.char_len();
        if seen + len <= offset {
            left.push(node.clone());
        } else if seen >= offset {
            right.push(node.clone());
        } else {
            // Only text nodes can straddle the offset; hard breaks are one char.
            let text = node.text.as_deref().unwrap_or_default();
            let cut = byte_index(text, offset - seen);
            let (head, tail) = text.split_at(cut);
            if !head.is_empty() {
                left.push(Node::marked_text(head, node.marks.clone()));
            }
            if !tail.is_empty() {
                right.push(Node::marked_text(tail, node.marks.clone()));
            }
        }
        seen += len;
    }

    (left, right)
}

/// Join adjacent text nodes that carry identical marks.
pub(crate) fn merge_adjacent(nodes: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let Some(last) = merged.last_mut() {
            if last.is_text() && node.is_text() && last.marks == node.marks {
                let tail = node.text.unwrap_or_default();
                last.text.get_or_insert_with(String::new).push_str(&tail);
                continue;
            }
        }
        merged.push(node);
    }
    merged
}

/// Byte index of the `chars`-th character, or the string length.
pub(crate) fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_names() {
        assert_eq!(NodeType::BulletList.as_str(), "bulletList");
        assert_eq!(NodeType::from("codeBlock".to_string()), NodeType::CodeBlock);
        assert_eq!(
            NodeType::from("callout".to_string()),
            NodeType::Other("callout".to_string())
        );
        assert_eq!(String::from(NodeType::Other("callout".into())), "callout");
    }

    #[test]
    fn test_heading_level_clamped() {
        let h = Node::heading_text(9, "Deep");
        assert_eq!(h.heading_level(), Some(6));
        let h = Node::heading_text(0, "Top");
        assert_eq!(h.heading_level(), Some(1));
    }

    #[test]
    fn test_text_content() {
        let p = Node::paragraph(vec![
            Node::text("Hello"),
            Node::hard_break(),
            Node::marked_text("world", vec![Mark::Bold]),
        ]);
        assert_eq!(p.text_content(), "Hello\nworld");
        assert_eq!(p.char_len(), 11);
    }

    #[test]
    fn test_empty_paragraph() {
        let p = Node::paragraph_text("");
        assert!(p.content.is_empty());
        assert!(p.is_empty());
    }

    #[test]
    fn test_split_inline_keeps_marks() {
        let content = vec![
            Node::text("ab"),
            Node::marked_text("cdé", vec![Mark::Italic]),
        ];
        let (left, right) = split_inline(&content, 3);
        assert_eq!(left.len(), 2);
        assert_eq!(left[1], Node::marked_text("c", vec![Mark::Italic]));
        assert_eq!(right, vec![Node::marked_text("dé", vec![Mark::Italic])]);
    }

    #[test]
    fn test_serialize_shape() {
        let p = Node::paragraph(vec![Node::marked_text("x", vec![Mark::link("https://a.b")])]);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["type"], "paragraph");
        assert!(json.get("attrs").is_none());
        assert_eq!(json["content"][0]["marks"][0]["type"], "link");
        assert_eq!(json["content"][0]["marks"][0]["attrs"]["href"], "https://a.b");
    }

    #[test]
    fn test_unknown_mark_deserializes() {
        let node: Node =
            serde_json::from_str(r#"{"type":"text","text":"x","marks":[{"type":"highlight"}]}"#)
                .unwrap();
        assert_eq!(node.marks, vec![Mark::Unsupported]);
    }
}
