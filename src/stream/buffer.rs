//! Line buffer for streamed text.

use unicode_normalization::UnicodeNormalization;

/// Accumulates streamed text and hands out complete lines.
///
/// `pending` holds at most one partial line: everything up to the last
/// newline is returned by [`StreamBuffer::push`] as soon as it arrives.
#[derive(Debug, Clone, Default)]
pub struct StreamBuffer {
    pending: String,
}

impl StreamBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text and return every line it completed, cleaned.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.pending.push_str(text);
        let Some(end) = self.pending.rfind('\n') else {
            return Vec::new();
        };
        let complete: String = self.pending.drain(..=end).collect();
        complete[..end].split('\n').map(clean_line).collect()
    }

    /// Take the partial line, if any, leaving the buffer empty.
    pub fn take_rest(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        Some(clean_line(&std::mem::take(&mut self.pending)))
    }

    /// The text not yet resolved into a complete line.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Check if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Discard the buffered text.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// NFC-normalise a line and drop a trailing carriage return.
fn clean_line(line: &str) -> String {
    line.strip_suffix('\r').unwrap_or(line).nfc().collect()
}
