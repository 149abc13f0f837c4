//! Rendering module for read-only projections of documents.
//!
//! None of these projections feed back into the editable document; the
//! HTML projection in particular drops inline marks unless asked to keep them.

mod html;
mod json;
mod markup;
mod options;
mod result;
mod text;
pub mod visitor;

pub use html::{render_document_to_markup, to_html, to_html_with_stats, HtmlRenderer};
pub use json::{from_json, to_json, JsonFormat};
pub use markup::{inline_to_markup, to_markup};
pub use options::RenderOptions;
pub use result::{RenderResult, RenderStats};
pub use text::to_text;
pub use visitor::{CompositeVisitor, DefaultVisitor, NodeVisitor, VisitorAction};
