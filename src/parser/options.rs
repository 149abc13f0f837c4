//! Parsing options and configuration.

/// Options for parsing plain markup into a document.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Recognise inline marks (`**bold**`, `*italic*`, `` `code` ``, links)
    pub inline_marks: bool,

    /// Recognise fenced code blocks
    pub code_fences: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable inline mark parsing.
    pub fn with_inline_marks(mut self, enabled: bool) -> Self {
        self.inline_marks = enabled;
        self
    }

    /// Enable or disable fenced code blocks.
    pub fn with_code_fences(mut self, enabled: bool) -> Self {
        self.code_fences = enabled;
        self
    }

    /// Treat every line as plain text: no inline marks, no fences.
    pub fn plain(mut self) -> Self {
        self.inline_marks = false;
        self.code_fences = false;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            inline_marks: true,
            code_fences: false,
        }
    }
}
