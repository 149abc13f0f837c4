//! Incremental insertion of streamed generation output.
//!
//! Chunks arrive from a generation service, are stripped of their transport
//! envelope, split into complete lines and parsed into blocks that are
//! spliced into a live document at a tracked cursor.

mod buffer;
mod envelope;
mod pipeline;

pub use buffer::StreamBuffer;
pub use envelope::{EnvelopeDecoder, StreamEnvelope};
pub use pipeline::{InsertionPipeline, PipelineState};
