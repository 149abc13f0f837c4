//! # helpdoc
//!
//! Rich-document core for help-center articles and change logs.
//!
//! Article bodies are trees of typed nodes. This crate parses a restricted
//! line-oriented markup into that tree, renders read-only projections of it,
//! and streams generated text into a live document while the user keeps
//! editing.
//!
//! ## Quick Start
//!
//! ```
//! use helpdoc::{parse_markup_to_document, render_document_to_markup};
//!
//! let doc = parse_markup_to_document("## Summary\n* point one\n* point two");
//! let html = render_document_to_markup(&doc);
//! assert_eq!(
//!     html,
//!     "<h2>Summary</h2><ul><li><p>point one</p></li><li><p>point two</p></li></ul>"
//! );
//! ```
//!
//! ## Streaming generation
//!
//! ```no_run
//! use std::sync::Arc;
//! use helpdoc::command::{
//!     ClientOptions, Command, CommandDispatcher, DomainContext, HttpGenerationService,
//!     LogNotifier,
//! };
//! use helpdoc::{parse_markup_to_document, EditorSession, Selection};
//!
//! # async fn run() -> helpdoc::Result<()> {
//! let options = ClientOptions::new("https://help.example.com/api/generate").with_token("…");
//! let service = Arc::new(HttpGenerationService::new(&options)?);
//! let dispatcher = CommandDispatcher::with_options(service, Arc::new(LogNotifier), &options);
//!
//! let mut editor = EditorSession::new(parse_markup_to_document("Long paragraph..."));
//! editor.set_selection(Selection::within(0, 0, 17));
//! let session = editor.into_shared();
//!
//! let outcome = dispatcher
//!     .invoke_on_selection(&session, Command::Summarize, None, DomainContext::Documentation)
//!     .await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Document model**: editor-compatible JSON node tree with validation
//! - **Plain-markup parser**: headings, lists, blockquotes, inline marks
//! - **Projections**: HTML with visitors, plain text, markup, JSON
//! - **Streaming insertion**: line-buffered splicing with cancellation
//! - **Command dispatch**: one request per invocation, timeouts, notifications
//! - **Theme utility**: readable text color for brand colors

pub mod command;
pub mod editor;
pub mod error;
pub mod media;
pub mod model;
pub mod parser;
pub mod render;
pub mod stream;
pub mod theme;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types
pub use command::{
    ClientOptions, Command, CommandDispatcher, DomainContext, GenerationRequest,
    GenerationService, HttpGenerationService, Invocation, LogNotifier, Notification, Notifier,
    Outcome,
};
pub use editor::{EditorSession, SharedSession};
pub use error::{Error, Result};
pub use model::{Document, Mark, Node, NodeType, Position, Selection};
pub use parser::{parse_markup_to_document, parse_markup_with_options, MarkupParser, ParseOptions};
pub use render::{render_document_to_markup, JsonFormat, RenderOptions};
pub use stream::{InsertionPipeline, PipelineState, StreamEnvelope};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse markup and render it straight to display HTML.
///
/// # Example
///
/// ```
/// assert_eq!(helpdoc::markup_to_html("> tip"), "<blockquote><p>tip</p></blockquote>");
/// ```
pub fn markup_to_html(markup: &str) -> String {
    render_document_to_markup(&parse_markup_to_document(markup))
}

/// Read document JSON and render it as plain text.
pub fn json_to_text(json: &str) -> Result<String> {
    let doc = Document::from_json(json)?;
    Ok(render::to_text(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_to_html() {
        assert_eq!(markup_to_html("# Hi"), "<h1>Hi</h1>");
        assert_eq!(markup_to_html(""), "");
    }

    #[test]
    fn test_json_to_text() {
        let json = r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"Hello"}]}]}"#;
        assert_eq!(json_to_text(json).unwrap(), "Hello");
    }

    #[test]
    fn test_json_to_text_rejects_bad_root() {
        let json = r#"{"type":"paragraph"}"#;
        assert!(json_to_text(json).is_err());
    }

    #[test]
    fn test_reexports() {
        let _ = ParseOptions::default();
        let _ = RenderOptions::default();
        let _ = JsonFormat::Compact;
        assert_eq!(PipelineState::default(), PipelineState::Idle);
    }
}
