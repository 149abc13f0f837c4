//! Visitor pattern for customizing HTML rendering.
//!
//! A visitor is consulted before each block node is rendered and may let the
//! renderer continue, replace the node's output, or skip it.
//!
//! # Example
//!
//! ```
//! use helpdoc::render::visitor::{NodeVisitor, VisitorAction};
//!
//! struct NoImages;
//!
//! impl NodeVisitor for NoImages {
//!     fn visit_image(&mut self, _src: &str, _alt: Option<&str>) -> VisitorAction {
//!         VisitorAction::Replace("<!-- image omitted -->".to_string())
//!     }
//! }
//! ```

use crate::model::Node;

/// What the HTML renderer should do with a visited node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VisitorAction {
    /// Render the node as usual.
    #[default]
    Continue,

    /// Emit this HTML in place of the node.
    Replace(String),

    /// Emit nothing for the node or its children.
    Skip,
}

/// Hook into HTML rendering of article blocks.
///
/// Every method defaults to [`VisitorAction::Continue`], so an implementor
/// only overrides the node kinds it cares about.
pub trait NodeVisitor: Send + Sync {
    /// A heading and its stored level.
    fn visit_heading(&mut self, node: &Node, level: u8) -> VisitorAction {
        let _ = (node, level);
        VisitorAction::Continue
    }

    /// An image node with its `src` and `alt` attributes.
    fn visit_image(&mut self, src: &str, alt: Option<&str>) -> VisitorAction {
        let _ = (src, alt);
        VisitorAction::Continue
    }

    /// A node type read from storage that has no HTML form here, such as a
    /// `callout` or `table` written by a newer editor. It renders as nothing
    /// unless replaced.
    fn visit_unknown(&mut self, node: &Node) -> VisitorAction {
        let _ = node;
        VisitorAction::Continue
    }

    /// Paragraphs, lists, quotes, code blocks and rules.
    fn visit_block(&mut self, node: &Node) -> VisitorAction {
        let _ = node;
        VisitorAction::Continue
    }
}

/// Renders every node unchanged.
#[derive(Debug, Clone, Default)]
pub struct DefaultVisitor;

impl NodeVisitor for DefaultVisitor {}

/// Drops images, e.g. for the text-only article digest.
#[derive(Debug, Clone, Default)]
pub struct SkipImagesVisitor;

impl NodeVisitor for SkipImagesVisitor {
    fn visit_image(&mut self, _src: &str, _alt: Option<&str>) -> VisitorAction {
        VisitorAction::Skip
    }
}

/// Visitor that demotes every heading by a fixed number of levels.
///
/// Useful when an article body is embedded under a page title.
#[derive(Debug, Clone)]
pub struct DemoteHeadingsVisitor {
    by: u8,
}

impl DemoteHeadingsVisitor {
    /// Create a visitor that demotes headings by `by` levels (max level 6).
    pub fn new(by: u8) -> Self {
        Self { by }
    }
}

impl NodeVisitor for DemoteHeadingsVisitor {
    fn visit_heading(&mut self, node: &Node, level: u8) -> VisitorAction {
        let level = level.saturating_add(self.by).min(6);
        let text = super::html::escape_html(&node.text_content());
        VisitorAction::Replace(format!("<h{level}>{text}</h{level}>"))
    }
}

/// Asks a list of visitors in order; the first answer other than
/// `Continue` wins.
#[derive(Default)]
pub struct CompositeVisitor {
    chain: Vec<Box<dyn NodeVisitor>>,
}

impl CompositeVisitor {
    /// An empty chain, which renders everything unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a visitor to the chain.
    pub fn with_visitor<V: NodeVisitor + 'static>(mut self, visitor: V) -> Self {
        self.chain.push(Box::new(visitor));
        self
    }

    fn first_action(
        &mut self,
        mut f: impl FnMut(&mut dyn NodeVisitor) -> VisitorAction,
    ) -> VisitorAction {
        self.chain
            .iter_mut()
            .map(|v| f(v.as_mut()))
            .find(|action| *action != VisitorAction::Continue)
            .unwrap_or_default()
    }
}

impl NodeVisitor for CompositeVisitor {
    fn visit_heading(&mut self, node: &Node, level: u8) -> VisitorAction {
        self.first_action(|v| v.visit_heading(node, level))
    }

    fn visit_image(&mut self, src: &str, alt: Option<&str>) -> VisitorAction {
        self.first_action(|v| v.visit_image(src, alt))
    }

    fn visit_unknown(&mut self, node: &Node) -> VisitorAction {
        self.first_action(|v| v.visit_unknown(node))
    }

    fn visit_block(&mut self, node: &Node) -> VisitorAction {
        self.first_action(|v| v.visit_block(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeType;

    #[test]
    fn test_default_action_renders_as_usual() {
        assert_eq!(VisitorAction::default(), VisitorAction::Continue);
        let mut visitor = DefaultVisitor;
        assert_eq!(
            visitor.visit_image("shot.png", Some("Settings page")),
            VisitorAction::Continue
        );
    }

    #[test]
    fn test_demote_headings() {
        let mut visitor = DemoteHeadingsVisitor::new(1);
        assert_eq!(
            visitor.visit_heading(&Node::heading_text(1, "Billing & plans"), 1),
            VisitorAction::Replace("<h2>Billing &amp; plans</h2>".into())
        );
        assert_eq!(
            visitor.visit_heading(&Node::heading_text(6, "Footnote"), 6),
            VisitorAction::Replace("<h6>Footnote</h6>".into())
        );
    }

    #[test]
    fn test_chain_stops_at_first_answer() {
        let mut chain = CompositeVisitor::new()
            .with_visitor(DefaultVisitor)
            .with_visitor(SkipImagesVisitor)
            .with_visitor(DemoteHeadingsVisitor::new(2));

        assert_eq!(chain.visit_image("shot.png", None), VisitorAction::Skip);
        assert_eq!(
            chain.visit_block(&Node::paragraph_text("Step one")),
            VisitorAction::Continue
        );
        assert!(matches!(
            chain.visit_heading(&Node::heading_text(2, "Setup"), 2),
            VisitorAction::Replace(html) if html == "<h4>Setup</h4>"
        ));
    }

    #[test]
    fn test_empty_chain_continues() {
        let mut chain = CompositeVisitor::default();
        let callout = Node::new(NodeType::Other("callout".into()));
        assert_eq!(chain.visit_unknown(&callout), VisitorAction::Continue);
    }
}
