//! Plain text rendering for documents.

use crate::model::Document;

/// Convert a document to plain text.
///
/// Blocks are separated by blank lines; marks and attributes are dropped.
pub fn to_text(doc: &Document) -> String {
    doc.plain_text().trim().to_string()
}
