//! Line-oriented markup parser.

use regex::Regex;
use std::sync::OnceLock;

use super::{parse_inline, ParseOptions};
use crate::model::{inline_text, Document, Node, NodeType};

/// Parse plain markup into a document with default options.
///
/// Never fails: lines that match no recognised form become paragraphs.
///
/// # Example
///
/// ```
/// use helpdoc::parse_markup_to_document;
///
/// let doc = parse_markup_to_document("# Title\n* one\n* two");
/// assert_eq!(doc.block_count(), 2);
/// assert_eq!(doc.block(0).unwrap().heading_level(), Some(1));
/// ```
pub fn parse_markup_to_document(text: &str) -> Document {
    default_parser().parse(text)
}

/// Parse plain markup into a document with custom options.
pub fn parse_markup_with_options(text: &str, options: ParseOptions) -> Document {
    MarkupParser::new(options).parse(text)
}

fn default_parser() -> &'static MarkupParser {
    static PARSER: OnceLock<MarkupParser> = OnceLock::new();
    PARSER.get_or_init(|| MarkupParser::new(ParseOptions::default()))
}

/// A classified source line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Fence(&'a str),
    Heading(u8, &'a str),
    Bullet(&'a str),
    Ordered(u64, &'a str),
    Quote(&'a str),
    Blank,
    Plain(&'a str),
}

/// Parser for the restricted line-oriented markup.
///
/// Recognised line forms, in priority order: heading (`#`..`######` and a
/// space), bullet item (`* `), ordered item (`<digits>. `), blockquote
/// (`> `), blank line, plain paragraph. Consecutive list lines of the same
/// kind are grouped into one list.
pub struct MarkupParser {
    options: ParseOptions,
    heading_regex: Regex,
    ordered_regex: Regex,
}

impl MarkupParser {
    /// Create a parser with the given options.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            heading_regex: Regex::new(r"^(#{1,6}) (.*)$").expect("valid heading pattern"),
            ordered_regex: Regex::new(r"^([0-9]+)\. (.*)$").expect("valid ordered item pattern"),
        }
    }

    /// Get the parser options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse text into a document.
    pub fn parse(&self, text: &str) -> Document {
        Document::from_blocks(self.parse_blocks(text))
    }

    /// Parse text into top-level blocks.
    ///
    /// A single trailing newline terminates the last line and does not add
    /// an empty paragraph.
    pub fn parse_blocks(&self, text: &str) -> Vec<Node> {
        if text.is_empty() {
            return Vec::new();
        }
        let body = text.strip_suffix('\n').unwrap_or(text);
        self.parse_lines(body.split('\n'))
    }

    /// Parse already-split lines into top-level blocks.
    pub fn parse_lines<'a, I>(&self, lines: I) -> Vec<Node>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut blocks = Vec::new();
        let mut open_list: Option<Node> = None;
        let mut fence: Option<(String, Vec<&'a str>)> = None;

        for raw in lines {
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if let Some((language, body)) = fence.as_mut() {
                if line.trim_start().starts_with("```") {
                    blocks.push(Node::code_block(Some(language.as_str()), &body.join("\n")));
                    fence = None;
                } else {
                    body.push(line);
                }
                continue;
            }

            match self.classify(line) {
                Line::Fence(info) => {
                    close_list(&mut open_list, &mut blocks);
                    fence = Some((info.trim().to_string(), Vec::new()));
                }
                Line::Bullet(text) => {
                    let item = self.list_item(text);
                    push_item(&mut open_list, &mut blocks, NodeType::BulletList, 1, item);
                }
                Line::Ordered(number, text) => {
                    let item = self.list_item(text);
                    push_item(&mut open_list, &mut blocks, NodeType::OrderedList, number, item);
                }
                other => {
                    close_list(&mut open_list, &mut blocks);
                    blocks.push(self.single_block(other));
                }
            }
        }

        close_list(&mut open_list, &mut blocks);
        if let Some((language, body)) = fence {
            log::debug!("Unterminated code fence, closing at end of input");
            blocks.push(Node::code_block(Some(language.as_str()), &body.join("\n")));
        }
        blocks
    }

    fn classify<'a>(&self, line: &'a str) -> Line<'a> {
        if self.options.code_fences {
            if let Some(info) = line.trim_start().strip_prefix("```") {
                return Line::Fence(info);
            }
        }
        if let Some(caps) = self.heading_regex.captures(line) {
            let level = caps.get(1).map_or(1, |m| m.as_str().len()) as u8;
            let text = caps.get(2).map_or("", |m| m.as_str());
            return Line::Heading(level, text.trim_end());
        }
        if let Some(text) = line.strip_prefix("* ") {
            return Line::Bullet(text);
        }
        if let Some(caps) = self.ordered_regex.captures(line) {
            let number = caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok());
            if let (Some(number), Some(text)) = (number, caps.get(2)) {
                return Line::Ordered(number, text.as_str());
            }
            // Numbers too large for u64 degrade to a plain paragraph.
            return Line::Plain(line);
        }
        if let Some(text) = line.strip_prefix("> ") {
            return Line::Quote(text);
        }
        if line.trim().is_empty() {
            return Line::Blank;
        }
        Line::Plain(line)
    }

    fn single_block(&self, line: Line<'_>) -> Node {
        match line {
            Line::Heading(level, text) => Node::heading(level, self.inline(text)),
            Line::Quote(text) => Node::blockquote(vec![Node::paragraph(self.inline(text))]),
            Line::Blank => Node::paragraph(Vec::new()),
            Line::Plain(text) => Node::paragraph(self.inline(text)),
            // Lists and fences are handled by the caller.
            Line::Bullet(text) | Line::Ordered(_, text) | Line::Fence(text) => {
                Node::paragraph(self.inline(text))
            }
        }
    }

    fn list_item(&self, text: &str) -> Node {
        Node::list_item(vec![Node::paragraph(self.inline(text))])
    }

    fn inline(&self, text: &str) -> Vec<Node> {
        if self.options.inline_marks {
            parse_inline(text)
        } else {
            inline_text(text)
        }
    }
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

fn push_item(
    open_list: &mut Option<Node>,
    blocks: &mut Vec<Node>,
    kind: NodeType,
    number: u64,
    item: Node,
) {
    if open_list.as_ref().is_some_and(|list| list.node_type != kind) {
        close_list(open_list, blocks);
    }
    let list = open_list.get_or_insert_with(|| match kind {
        NodeType::OrderedList => Node::ordered_list(number, Vec::new()),
        _ => Node::bullet_list(Vec::new()),
    });
    list.content.push(item);
}

fn close_list(open_list: &mut Option<Node>, blocks: &mut Vec<Node>) {
    if let Some(list) = open_list.take() {
        blocks.push(list);
    }
}
