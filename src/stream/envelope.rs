//! Stream envelope decoding.

use serde::{Deserialize, Serialize};

/// Framing used by the generation service for its response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StreamEnvelope {
    /// The body is the generated prose itself.
    #[default]
    Raw,
    /// The body is a sequence of lines like `0:"<json string>"`.
    ///
    /// Only `0:` lines carry text; other prefixes (metadata, finish
    /// reasons) are ignored.
    DataStream,
}

/// Strips the stream envelope from incoming chunks.
///
/// Envelope lines can be split across chunks, so a partial line is kept
/// until its terminating newline arrives.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeDecoder {
    envelope: StreamEnvelope,
    partial: String,
}

impl EnvelopeDecoder {
    /// Create a decoder for the given envelope.
    pub fn new(envelope: StreamEnvelope) -> Self {
        Self {
            envelope,
            partial: String::new(),
        }
    }

    /// The envelope this decoder strips.
    pub fn envelope(&self) -> StreamEnvelope {
        self.envelope
    }

    /// Decode one chunk, returning the prose it carries.
    pub fn decode(&mut self, chunk: &str) -> String {
        match self.envelope {
            StreamEnvelope::Raw => chunk.to_string(),
            StreamEnvelope::DataStream => {
                self.partial.push_str(chunk);
                let Some(end) = self.partial.rfind('\n') else {
                    return String::new();
                };
                let complete: String = self.partial.drain(..=end).collect();
                complete.split('\n').filter_map(decode_line).collect()
            }
        }
    }

    /// Decode whatever is left once the stream has ended.
    pub fn finish(&mut self) -> String {
        let rest = std::mem::take(&mut self.partial);
        decode_line(&rest).unwrap_or_default()
    }

    /// Drop any buffered partial line.
    pub fn reset(&mut self) {
        self.partial.clear();
    }
}

fn decode_line(line: &str) -> Option<String> {
    let line = line.trim_end_matches('\r');
    let payload = line.strip_prefix("0:")?;
    match serde_json::from_str::<String>(payload) {
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("Ignoring malformed stream line: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_passthrough() {
        let mut decoder = EnvelopeDecoder::new(StreamEnvelope::Raw);
        assert_eq!(decoder.decode("# Title\n"), "# Title\n");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn test_data_stream_unescapes() {
        let mut decoder = EnvelopeDecoder::new(StreamEnvelope::DataStream);
        let text = decoder.decode("0:\"## Summary\\n\"\n0:\"* \\\"quoted\\\"\"\n");
        assert_eq!(text, "## Summary\n* \"quoted\"");
    }

    #[test]
    fn test_data_stream_split_line() {
        let mut decoder = EnvelopeDecoder::new(StreamEnvelope::DataStream);
        assert_eq!(decoder.decode("0:\"Hel"), "");
        assert_eq!(decoder.decode("lo\"\n0:\"!"), "Hello");
        assert_eq!(decoder.decode("\""), "");
        assert_eq!(decoder.finish(), "!");
    }

    #[test]
    fn test_data_stream_ignores_other_prefixes() {
        let mut decoder = EnvelopeDecoder::new(StreamEnvelope::DataStream);
        let text = decoder.decode("f:{\"messageId\":\"x\"}\n0:\"ok\"\ne:{\"finishReason\":\"stop\"}\n");
        assert_eq!(text, "ok");
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let mut decoder = EnvelopeDecoder::new(StreamEnvelope::DataStream);
        assert_eq!(decoder.decode("0:not json\n0:\"fine\"\n"), "fine");
    }
}
