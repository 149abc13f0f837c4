//! Rendered output paired with article statistics.

use serde::{Deserialize, Serialize};

/// Words per minute assumed by [`RenderStats::reading_minutes`].
pub const READING_WPM: u32 = 200;

/// HTML produced by [`HtmlRenderer`](super::HtmlRenderer) and what went into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The HTML
    pub content: String,

    /// Counts gathered on the way; all zero unless stats were requested
    pub stats: RenderStats,
}

impl RenderResult {
    pub fn new(content: String, stats: RenderStats) -> Self {
        Self { content, stats }
    }

    /// Length of the HTML in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Block and word counts for an article, as shown in the editor footer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    pub paragraph_count: u32,
    pub heading_count: u32,
    pub list_item_count: u32,
    pub image_count: u32,

    /// Unknown nodes and nodes a visitor skipped
    pub skipped_count: u32,

    /// Whitespace-separated words
    pub word_count: u32,

    /// Non-whitespace characters
    pub char_count: u32,
}

impl RenderStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the words and characters of `text`.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Estimated reading time, rounded up; zero for an empty article.
    pub fn reading_minutes(&self) -> u32 {
        self.word_count.div_ceil(READING_WPM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_text() {
        let mut stats = RenderStats::new();
        stats.count_text("Open Settings, then  click \"Billing\".");

        assert_eq!(stats.word_count, 5);
        assert_eq!(stats.char_count, 32);
    }

    #[test]
    fn test_reading_minutes() {
        let mut stats = RenderStats::new();
        assert_eq!(stats.reading_minutes(), 0);

        stats.word_count = 1;
        assert_eq!(stats.reading_minutes(), 1);
        stats.word_count = 401;
        assert_eq!(stats.reading_minutes(), 3);
    }
}
