//! Plain markup rendering.
//!
//! Produces the line-oriented markup the parser reads, one line per block.
//! For headings, flat lists, blockquotes and paragraphs with simple marks,
//! parsing the output gives back the same document.

use crate::model::{Document, Mark, Node, NodeType};

/// Convert a document to plain markup.
///
/// # Example
///
/// ```
/// use helpdoc::{parse_markup_to_document, render::to_markup};
///
/// let doc = parse_markup_to_document("## Steps\n1. open\n2. save");
/// assert_eq!(to_markup(&doc), "## Steps\n1. open\n2. save");
/// ```
pub fn to_markup(doc: &Document) -> String {
    let mut lines = Vec::new();
    for block in doc.blocks() {
        block_lines(block, &mut lines);
    }
    lines.join("\n")
}

fn block_lines(node: &Node, lines: &mut Vec<String>) {
    match node.node_type {
        NodeType::Paragraph => lines.push(inline_to_markup(&node.content)),
        NodeType::Heading => {
            let level = node.heading_level().unwrap_or(1) as usize;
            lines.push(format!(
                "{} {}",
                "#".repeat(level),
                inline_to_markup(&node.content)
            ));
        }
        NodeType::BulletList => {
            for item in &node.content {
                lines.push(format!("* {}", item_text(item)));
            }
        }
        NodeType::OrderedList => {
            let start = node.attr_u64("start").unwrap_or(1);
            for (i, item) in node.content.iter().enumerate() {
                lines.push(format!("{}. {}", start + i as u64, item_text(item)));
            }
        }
        NodeType::Blockquote => {
            let mut inner = Vec::new();
            for child in &node.content {
                block_lines(child, &mut inner);
            }
            lines.extend(inner.into_iter().map(|line| format!("> {line}")));
        }
        NodeType::CodeBlock => {
            lines.push(format!("```{}", node.attr_str("language").unwrap_or("")));
            lines.extend(node.text_content().split('\n').map(str::to_string));
            lines.push("```".to_string());
        }
        NodeType::Image => {
            let alt = node.attr_str("alt").unwrap_or("");
            let src = node.attr_str("src").unwrap_or("");
            lines.push(format!("![{alt}]({src})"));
        }
        NodeType::HorizontalRule => lines.push("---".to_string()),
        NodeType::ListItem => lines.push(item_text(node)),
        _ => {
            let text = node.text_content();
            if !text.is_empty() {
                lines.push(text);
            }
        }
    }
}

/// Text of a list item on one line. Nested blocks are joined with spaces.
fn item_text(item: &Node) -> String {
    item.content
        .iter()
        .map(|child| match child.node_type {
            NodeType::Paragraph | NodeType::Heading => inline_to_markup(&child.content),
            _ => child.text_content(),
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render inline nodes as markup, writing marks as delimiters.
pub fn inline_to_markup(content: &[Node]) -> String {
    let mut out = String::new();
    for node in content {
        match node.node_type {
            NodeType::Text => out.push_str(&marked(node)),
            // A hard break cannot be expressed inside one markup line.
            NodeType::HardBreak => out.push(' '),
            _ => out.push_str(&node.text_content()),
        }
    }
    out
}

fn marked(node: &Node) -> String {
    let mut text = node.text.clone().unwrap_or_default();
    // Innermost first so the first mark ends up outermost.
    for mark in node.marks.iter().rev() {
        text = match mark {
            Mark::Bold => format!("**{text}**"),
            Mark::Italic => format!("*{text}*"),
            Mark::Code => format!("`{text}`"),
            Mark::Strike => format!("~~{text}~~"),
            Mark::Link { attrs } => format!("[{text}]({})", attrs.href),
            Mark::Underline | Mark::Unsupported => text,
        };
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_markup_to_document;

    #[test]
    fn test_reparse_gives_same_document() {
        let source = "# Title\n* a\n* b\n3. c\n> quote\n\nplain **bold** and [link](https://x.test)";
        let doc = parse_markup_to_document(source);
        let markup = to_markup(&doc);

        assert_eq!(markup, source);
        assert_eq!(parse_markup_to_document(&markup), doc);
    }

    #[test]
    fn test_code_block_fence() {
        let doc = Document::from_blocks(vec![Node::code_block(Some("sh"), "ls\npwd")]);
        assert_eq!(to_markup(&doc), "```sh\nls\npwd\n```");
    }

    #[test]
    fn test_nested_marks() {
        let node = Node::marked_text("x", vec![Mark::Bold, Mark::Code]);
        assert_eq!(inline_to_markup(&[node]), "**`x`**");
    }

    #[test]
    fn test_image() {
        let doc = Document::from_blocks(vec![Node::image("a.png", Some("alt"), None)]);
        assert_eq!(to_markup(&doc), "![alt](a.png)");
    }
}
