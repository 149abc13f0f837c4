//! HTML rendering for documents.
//!
//! This is the read-only display projection. It never feeds back into an
//! editable document, so it is allowed to be lossy: inline marks are dropped
//! unless [`RenderOptions::include_marks`] is set, and node types the
//! renderer does not know produce no output.

use crate::model::{Document, Mark, Node, NodeType};

use super::visitor::{NodeVisitor, VisitorAction};
use super::{RenderOptions, RenderResult, RenderStats};

/// Render a document to HTML with default options.
///
/// # Example
///
/// ```
/// use helpdoc::{parse_markup_to_document, render_document_to_markup};
///
/// let doc = parse_markup_to_document("# Title\n* one");
/// assert_eq!(
///     render_document_to_markup(&doc),
///     "<h1>Title</h1><ul><li><p>one</p></li></ul>"
/// );
/// ```
pub fn render_document_to_markup(doc: &Document) -> String {
    to_html(doc, &RenderOptions::default())
}

/// Render a document to HTML.
pub fn to_html(doc: &Document, options: &RenderOptions) -> String {
    HtmlRenderer::new(options.clone()).render(doc)
}

/// Render a document to HTML with statistics.
pub fn to_html_with_stats(doc: &Document, options: &RenderOptions) -> RenderResult {
    let mut options = options.clone();
    options.collect_stats = true;
    HtmlRenderer::new(options).render_with_stats(doc)
}

/// HTML renderer.
pub struct HtmlRenderer {
    options: RenderOptions,
    visitor: Option<Box<dyn NodeVisitor>>,
    stats: RenderStats,
}

impl HtmlRenderer {
    /// Create a new HTML renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            visitor: None,
            stats: RenderStats::new(),
        }
    }

    /// Attach a visitor consulted before each block node.
    pub fn with_visitor<V: NodeVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitor = Some(Box::new(visitor));
        self
    }

    /// Render a document to HTML.
    pub fn render(mut self, doc: &Document) -> String {
        let mut out = String::new();
        for block in doc.blocks() {
            self.render_node(&mut out, block);
        }
        out
    }

    /// Render a document to HTML with statistics.
    pub fn render_with_stats(mut self, doc: &Document) -> RenderResult {
        self.options.collect_stats = true;
        let mut out = String::new();
        for block in doc.blocks() {
            self.render_node(&mut out, block);
        }
        self.stats.count_text(&doc.plain_text());
        RenderResult::new(out, self.stats)
    }

    fn render_node(&mut self, out: &mut String, node: &Node) {
        if node.node_type.is_block() {
            match self.visit(node) {
                VisitorAction::Continue => {}
                VisitorAction::Replace(html) => {
                    out.push_str(&html);
                    return;
                }
                VisitorAction::Skip => {
                    self.count(|s| s.skipped_count += 1);
                    return;
                }
            }
        }

        match &node.node_type {
            NodeType::Doc => self.render_children(out, node),
            NodeType::Paragraph => {
                self.count(|s| s.paragraph_count += 1);
                self.wrap(out, "p", node);
            }
            NodeType::Heading => {
                self.count(|s| s.heading_count += 1);
                let level = heading_level(node).min(self.options.max_heading_level);
                self.wrap(out, &format!("h{level}"), node);
            }
            NodeType::BulletList => self.wrap(out, "ul", node),
            NodeType::OrderedList => match node.attr_u64("start") {
                Some(start) if start != 1 => {
                    out.push_str(&format!("<ol start=\"{start}\">"));
                    self.render_children(out, node);
                    out.push_str("</ol>");
                }
                _ => self.wrap(out, "ol", node),
            },
            NodeType::ListItem => {
                self.count(|s| s.list_item_count += 1);
                self.wrap(out, "li", node);
            }
            NodeType::Blockquote => self.wrap(out, "blockquote", node),
            NodeType::CodeBlock => {
                match node.attr_str("language").filter(|l| !l.is_empty()) {
                    Some(language) => out.push_str(&format!(
                        "<pre><code class=\"language-{}\">",
                        escape_html(language)
                    )),
                    None => out.push_str("<pre><code>"),
                }
                out.push_str(&escape_html(&node.text_content()));
                out.push_str("</code></pre>");
            }
            NodeType::Image => {
                self.count(|s| s.image_count += 1);
                self.render_image(out, node);
            }
            NodeType::HorizontalRule => out.push_str("<hr>"),
            NodeType::HardBreak => out.push_str("<br>"),
            NodeType::Text => self.render_text(out, node),
            NodeType::Other(name) => {
                log::debug!("Skipping unknown node type '{}'", name);
                self.count(|s| s.skipped_count += 1);
            }
        }
    }

    fn visit(&mut self, node: &Node) -> VisitorAction {
        let Some(visitor) = self.visitor.as_mut() else {
            return VisitorAction::Continue;
        };
        match node.node_type {
            NodeType::Heading => visitor.visit_heading(node, heading_level(node)),
            NodeType::Image => {
                visitor.visit_image(node.attr_str("src").unwrap_or(""), node.attr_str("alt"))
            }
            NodeType::Other(_) => visitor.visit_unknown(node),
            _ => visitor.visit_block(node),
        }
    }

    fn wrap(&mut self, out: &mut String, tag: &str, node: &Node) {
        out.push('<');
        out.push_str(tag);
        out.push('>');
        self.render_children(out, node);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }

    fn render_children(&mut self, out: &mut String, node: &Node) {
        for child in &node.content {
            self.render_node(out, child);
        }
    }

    fn render_image(&self, out: &mut String, node: &Node) {
        let src = node.attr_str("src").unwrap_or("");
        out.push_str("<img src=\"");
        out.push_str(&escape_html(&self.image_src(src)));
        out.push('"');
        for name in ["alt", "title"] {
            if let Some(value) = node.attr_str(name) {
                out.push_str(&format!(" {name}=\"{}\"", escape_html(value)));
            }
        }
        if let Some(width) = node.attr_u64("width") {
            out.push_str(&format!(" width=\"{width}\""));
        }
        out.push('>');
    }

    fn image_src(&self, src: &str) -> String {
        let absolute = src.starts_with('/')
            || src.starts_with("data:")
            || src.contains("://");
        if absolute || self.options.image_path_prefix.is_empty() {
            src.to_string()
        } else {
            format!("{}{}", self.options.image_path_prefix, src)
        }
    }

    fn render_text(&self, out: &mut String, node: &Node) {
        let text = escape_html(node.text.as_deref().unwrap_or(""));
        if !self.options.include_marks || node.marks.is_empty() {
            out.push_str(&text);
            return;
        }

        for mark in &node.marks {
            match mark {
                Mark::Link { attrs } => {
                    out.push_str(&format!("<a href=\"{}\"", escape_html(&attrs.href)));
                    if let Some(title) = &attrs.title {
                        out.push_str(&format!(" title=\"{}\"", escape_html(title)));
                    }
                    out.push('>');
                }
                other => {
                    if let Some(tag) = mark_tag(other) {
                        out.push_str(&format!("<{tag}>"));
                    }
                }
            }
        }
        out.push_str(&text);
        for mark in node.marks.iter().rev() {
            match mark {
                Mark::Link { .. } => out.push_str("</a>"),
                other => {
                    if let Some(tag) = mark_tag(other) {
                        out.push_str(&format!("</{tag}>"));
                    }
                }
            }
        }
    }

    fn count(&mut self, f: impl FnOnce(&mut RenderStats)) {
        if self.options.collect_stats {
            f(&mut self.stats);
        }
    }
}

fn mark_tag(mark: &Mark) -> Option<&'static str> {
    match mark {
        Mark::Bold => Some("strong"),
        Mark::Italic => Some("em"),
        Mark::Code => Some("code"),
        Mark::Strike => Some("s"),
        Mark::Underline => Some("u"),
        Mark::Link { .. } | Mark::Unsupported => None,
    }
}

/// Escape text for use in HTML content and attribute values.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Level of a heading, falling back to 1 when the attribute is missing or
/// out of range. Only hand-built trees get here; `Document::from_json`
/// rejects such headings.
fn heading_level(node: &Node) -> u8 {
    node.heading_level().unwrap_or_else(|| {
        log::debug!("Heading without a valid level, rendering as h1");
        1
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::visitor::SkipImagesVisitor;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
    }

    #[test]
    fn test_marks_dropped_by_default() {
        let doc = Document::from_blocks(vec![Node::paragraph(vec![
            Node::text("a "),
            Node::marked_text("b", vec![Mark::Bold]),
        ])]);
        assert_eq!(render_document_to_markup(&doc), "<p>a b</p>");
    }

    #[test]
    fn test_marks_kept_when_requested() {
        let doc = Document::from_blocks(vec![Node::paragraph(vec![Node::marked_text(
            "docs",
            vec![Mark::Bold, Mark::link("https://x.test")],
        )])]);
        let html = to_html(&doc, &RenderOptions::new().with_marks(true));
        assert_eq!(
            html,
            "<p><strong><a href=\"https://x.test\">docs</a></strong></p>"
        );
    }

    #[test]
    fn test_ordered_list_start() {
        let doc = Document::from_blocks(vec![
            Node::ordered_list(1, vec![Node::list_item(vec![Node::paragraph_text("a")])]),
            Node::ordered_list(4, vec![Node::list_item(vec![Node::paragraph_text("b")])]),
        ]);
        assert_eq!(
            render_document_to_markup(&doc),
            "<ol><li><p>a</p></li></ol><ol start=\"4\"><li><p>b</p></li></ol>"
        );
    }

    #[test]
    fn test_heading_without_valid_level_renders_as_h1() {
        let doc = Document::from_blocks(vec![
            Node::with_content(NodeType::Heading, vec![Node::text("No level")]),
            Node::with_content(NodeType::Heading, vec![Node::text("Too deep")])
                .with_attr("level", 9),
        ]);
        assert_eq!(
            render_document_to_markup(&doc),
            "<h1>No level</h1><h1>Too deep</h1>"
        );
    }

    #[test]
    fn test_unknown_node_renders_empty() {
        let doc = Document::from_blocks(vec![
            Node::new(NodeType::Other("callout".into())),
            Node::paragraph_text("after"),
        ]);
        assert_eq!(render_document_to_markup(&doc), "<p>after</p>");
    }

    #[test]
    fn test_code_block_and_rule() {
        let doc = Document::from_blocks(vec![
            Node::code_block(Some("rust"), "a < b"),
            Node::horizontal_rule(),
        ]);
        assert_eq!(
            render_document_to_markup(&doc),
            "<pre><code class=\"language-rust\">a &lt; b</code></pre><hr>"
        );
    }

    #[test]
    fn test_image_prefix_and_width() {
        let mut image = Node::image("cat.png", Some("A cat"), None);
        image.set_attr("width", 320);
        let doc = Document::from_blocks(vec![image]);
        let options = RenderOptions::new().with_image_prefix("https://cdn.test/");
        assert_eq!(
            to_html(&doc, &options),
            "<img src=\"https://cdn.test/cat.png\" alt=\"A cat\" width=\"320\">"
        );
    }

    #[test]
    fn test_visitor_skip() {
        let doc = Document::from_blocks(vec![
            Node::image("https://x.test/a.png", None, None),
            Node::paragraph_text("text"),
        ]);
        let html = HtmlRenderer::new(RenderOptions::default())
            .with_visitor(SkipImagesVisitor)
            .render(&doc);
        assert_eq!(html, "<p>text</p>");
    }

    #[test]
    fn test_stats() {
        let doc = Document::from_blocks(vec![
            Node::heading_text(1, "Title"),
            Node::paragraph_text("one two three"),
            Node::bullet_list(vec![Node::list_item(vec![Node::paragraph_text("item")])]),
        ]);
        let result = to_html_with_stats(&doc, &RenderOptions::default());
        assert_eq!(result.stats.heading_count, 1);
        assert_eq!(result.stats.paragraph_count, 2);
        assert_eq!(result.stats.list_item_count, 1);
        assert_eq!(result.stats.word_count, 5);
    }
}
