//! Plain-markup parsing module.
//!
//! Converts the restricted, line-oriented markup produced by the generation
//! service (and typed by users) into document nodes.

mod inline;
mod markup;
mod options;

pub use inline::parse_inline;
pub use markup::{parse_markup_to_document, parse_markup_with_options, MarkupParser};
pub use options::ParseOptions;
