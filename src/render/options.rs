//! HTML rendering options.

/// How an article body is turned into display HTML.
///
/// The defaults match the public help-center page: marks dropped, every
/// heading level kept, image sources untouched.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Keep inline marks (bold, italic, code, strike, links) in HTML output
    pub include_marks: bool,

    /// Deepest heading tag emitted; deeper headings are clamped to it
    pub max_heading_level: u8,

    /// Prepended to relative image sources, e.g. a CDN base URL
    pub image_path_prefix: String,

    /// Fill in [`RenderStats`](super::RenderStats)
    pub collect_stats: bool,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marks(mut self, include: bool) -> Self {
        self.include_marks = include;
        self
    }

    /// Clamp heading tags to `level`, itself kept within 1-6.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_path_prefix = prefix.into();
        self
    }

    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_marks: false,
            max_heading_level: 6,
            image_path_prefix: String::new(),
            collect_stats: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_clamps_heading_level() {
        let options = RenderOptions::new()
            .with_marks(true)
            .with_max_heading(9)
            .with_image_prefix("https://cdn.example.com/");

        assert!(options.include_marks);
        assert_eq!(options.max_heading_level, 6);
        assert_eq!(RenderOptions::new().with_max_heading(0).max_heading_level, 1);
        assert_eq!(options.image_path_prefix, "https://cdn.example.com/");
    }

    #[test]
    fn test_defaults_match_public_page() {
        let options = RenderOptions::default();
        assert!(!options.include_marks);
        assert!(!options.collect_stats);
        assert_eq!(options.max_heading_level, 6);
    }
}
