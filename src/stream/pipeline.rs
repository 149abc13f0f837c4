//! Insertion pipeline state machine.

use crate::error::{Error, Result};
use crate::model::{Document, Node, Selection};
use crate::parser::{MarkupParser, ParseOptions};

use super::{EnvelopeDecoder, StreamBuffer, StreamEnvelope};

/// State of an insertion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// No generation in progress
    #[default]
    Idle,
    /// Chunks are being received and spliced
    Streaming,
    /// The stream ended; the last partial line is being spliced
    Flushing,
    /// The stream was abandoned; nothing more will be spliced
    Cancelled,
}

/// Splices streamed markup into a document as complete lines arrive.
///
/// The pipeline does not own the document. Every call borrows it, so the
/// caller decides how the document is shared with direct user edits.
///
/// # Example
///
/// ```
/// use helpdoc::stream::InsertionPipeline;
/// use helpdoc::Document;
///
/// let mut doc = Document::new();
/// let mut pipeline = InsertionPipeline::default();
///
/// pipeline.start(&mut doc, None, false);
/// pipeline.push_chunk(&mut doc, "Hello\nWo").unwrap();
/// pipeline.push_chunk(&mut doc, "rld\n").unwrap();
/// pipeline.finish(&mut doc).unwrap();
///
/// assert_eq!(doc.plain_text(), "Hello\n\nWorld");
/// ```
pub struct InsertionPipeline {
    state: PipelineState,
    decoder: EnvelopeDecoder,
    buffer: StreamBuffer,
    parser: MarkupParser,
    cursor: usize,
    last_inserted: Option<usize>,
    inserted: usize,
}

impl InsertionPipeline {
    /// Create a pipeline for the given envelope and parse options.
    pub fn new(envelope: StreamEnvelope, options: ParseOptions) -> Self {
        Self {
            state: PipelineState::Idle,
            decoder: EnvelopeDecoder::new(envelope),
            buffer: StreamBuffer::new(),
            parser: MarkupParser::new(options),
            cursor: 0,
            last_inserted: None,
            inserted: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Block index where the next blocks will be spliced.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of parsed blocks applied since the last start.
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Text buffered but not yet spliced.
    pub fn pending(&self) -> &str {
        self.buffer.pending()
    }

    /// Begin a new generation run.
    ///
    /// With `replace` set and a non-empty selection, the selected content is
    /// deleted and the cursor placed where it was. Otherwise the cursor goes
    /// after the selection head block, or to the end of the document when
    /// there is no selection. A run still in progress is abandoned.
    pub fn start(&mut self, doc: &mut Document, selection: Option<&Selection>, replace: bool) {
        if self.state == PipelineState::Streaming {
            log::debug!("Starting a new run over an active one");
            self.cancel();
        }

        self.cursor = match selection {
            Some(selection) if replace && !selection.is_empty() => doc.delete_selection(selection),
            Some(selection) => (selection.head.block + 1).min(doc.block_count()),
            None => doc.block_count(),
        };
        self.buffer.clear();
        self.decoder.reset();
        self.last_inserted = None;
        self.inserted = 0;
        self.state = PipelineState::Streaming;
        log::debug!("Insertion pipeline streaming at block {}", self.cursor);
    }

    /// Feed one chunk; returns the number of parsed blocks spliced.
    ///
    /// Only lines completed by this chunk are parsed. Fails with
    /// [`Error::Cancelled`] when the pipeline is not streaming.
    pub fn push_chunk(&mut self, doc: &mut Document, chunk: &str) -> Result<usize> {
        if self.state != PipelineState::Streaming {
            return Err(Error::Cancelled);
        }

        let text = self.decoder.decode(chunk);
        let lines = self.buffer.push(&text);
        if lines.is_empty() {
            return Ok(0);
        }
        let blocks = self.parser.parse_lines(lines.iter().map(String::as_str));
        Ok(self.splice(doc, blocks))
    }

    /// End the run, splicing whatever is still buffered.
    pub fn finish(&mut self, doc: &mut Document) -> Result<usize> {
        if self.state != PipelineState::Streaming {
            return Err(Error::Cancelled);
        }
        self.state = PipelineState::Flushing;

        let text = self.decoder.finish();
        let mut lines = self.buffer.push(&text);
        lines.extend(self.buffer.take_rest());
        let blocks = self.parser.parse_lines(lines.iter().map(String::as_str));
        let count = self.splice(doc, blocks);

        log::debug!("Insertion pipeline finished, {} blocks", self.inserted);
        self.state = PipelineState::Idle;
        Ok(count)
    }

    /// Abandon the run. Content already spliced stays in the document.
    pub fn cancel(&mut self) {
        if self.state != PipelineState::Streaming {
            return;
        }
        self.state = PipelineState::Cancelled;
        if !self.buffer.is_empty() {
            log::debug!("Discarding {} buffered bytes", self.buffer.pending().len());
        }
        self.buffer.clear();
        self.decoder.reset();
        self.state = PipelineState::Idle;
    }

    fn splice(&mut self, doc: &mut Document, mut blocks: Vec<Node>) -> usize {
        let count = blocks.len();
        if count == 0 {
            return 0;
        }
        self.cursor = self.cursor.min(doc.block_count());

        // A list continuing the list this run just inserted joins it.
        if let Some(prev) = self.last_inserted.filter(|&i| i + 1 == self.cursor) {
            if let Some(target) = doc.block_mut(prev) {
                if target.node_type.is_list() && target.node_type == blocks[0].node_type {
                    let head = blocks.remove(0);
                    target.content.extend(head.content);
                }
            }
        }

        if !blocks.is_empty() {
            let range = doc.insert_blocks(self.cursor, blocks);
            self.cursor = range.end;
            self.last_inserted = Some(range.end - 1);
        }
        self.inserted += count;
        count
    }
}

impl Default for InsertionPipeline {
    fn default() -> Self {
        Self::new(StreamEnvelope::default(), ParseOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeType, Position};

    #[test]
    fn test_state_transitions() {
        let mut doc = Document::new();
        let mut pipeline = InsertionPipeline::default();
        assert_eq!(pipeline.state(), PipelineState::Idle);

        pipeline.start(&mut doc, None, false);
        assert_eq!(pipeline.state(), PipelineState::Streaming);

        pipeline.finish(&mut doc).unwrap();
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }

    #[test]
    fn test_push_before_start_is_rejected() {
        let mut doc = Document::new();
        let mut pipeline = InsertionPipeline::default();
        assert!(matches!(
            pipeline.push_chunk(&mut doc, "x\n"),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn test_list_streamed_item_by_item_stays_one_list() {
        let mut doc = Document::new();
        let mut pipeline = InsertionPipeline::default();
        pipeline.start(&mut doc, None, false);
        pipeline.push_chunk(&mut doc, "* one\n").unwrap();
        pipeline.push_chunk(&mut doc, "* two\n").unwrap();
        pipeline.finish(&mut doc).unwrap();

        assert_eq!(doc.block_count(), 1);
        assert_eq!(doc.block(0).unwrap().node_type, NodeType::BulletList);
        assert_eq!(doc.block(0).unwrap().content.len(), 2);
    }

    #[test]
    fn test_existing_list_is_not_joined() {
        let mut doc = Document::from_blocks(vec![Node::bullet_list(vec![Node::list_item(
            vec![Node::paragraph_text("mine")],
        )])]);
        let mut pipeline = InsertionPipeline::default();
        pipeline.start(&mut doc, None, false);
        pipeline.push_chunk(&mut doc, "* streamed\n").unwrap();

        assert_eq!(doc.block_count(), 2);
    }

    #[test]
    fn test_insert_after_selection_head() {
        let mut doc = Document::from_blocks(vec![
            Node::paragraph_text("first"),
            Node::paragraph_text("second"),
        ]);
        let selection = Selection::caret(Position::new(0, 2));
        let mut pipeline = InsertionPipeline::default();
        pipeline.start(&mut doc, Some(&selection), false);
        pipeline.push_chunk(&mut doc, "new\n").unwrap();

        assert_eq!(doc.plain_text(), "first\n\nnew\n\nsecond");
    }

    #[test]
    fn test_replace_selection() {
        let mut doc = Document::from_blocks(vec![
            Node::paragraph_text("keep"),
            Node::paragraph_text("replace me"),
        ]);
        let selection = Selection::within(1, 0, 10);
        let mut pipeline = InsertionPipeline::default();
        pipeline.start(&mut doc, Some(&selection), true);
        assert_eq!(doc.block_count(), 1);

        pipeline.push_chunk(&mut doc, "replaced\n").unwrap();
        assert_eq!(doc.plain_text(), "keep\n\nreplaced");
    }

    #[test]
    fn test_cursor_clamped_after_user_deletes() {
        let mut doc = Document::from_blocks(vec![Node::paragraph_text("a")]);
        let mut pipeline = InsertionPipeline::default();
        pipeline.start(&mut doc, None, false);
        pipeline.push_chunk(&mut doc, "b\n").unwrap();
        assert_eq!(pipeline.cursor(), 2);

        doc.remove_block(0);
        doc.remove_block(0);
        pipeline.push_chunk(&mut doc, "c\n").unwrap();
        assert_eq!(doc.plain_text(), "c");
    }

    #[test]
    fn test_data_stream_envelope() {
        let mut doc = Document::new();
        let mut pipeline = InsertionPipeline::new(StreamEnvelope::DataStream, ParseOptions::default());
        pipeline.start(&mut doc, None, false);
        pipeline.push_chunk(&mut doc, "0:\"# Ti").unwrap();
        pipeline.push_chunk(&mut doc, "tle\\n\"\n0:\"body\"\n").unwrap();
        pipeline.finish(&mut doc).unwrap();

        assert_eq!(doc.block(0).unwrap().heading_level(), Some(1));
        assert_eq!(doc.block(1).unwrap().text_content(), "body");
    }
}
