//! Generation client configuration.

use std::time::Duration;

use crate::parser::ParseOptions;
use crate::stream::StreamEnvelope;

/// Default generation endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/generate";

/// Default bound on one generation request, from send to last chunk.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Options for talking to the generation service.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// URL the request is POSTed to
    pub endpoint: String,

    /// Bearer token sent in the `Authorization` header
    pub token: Option<String>,

    /// Bound on the whole invocation
    pub timeout: Duration,

    /// Framing of the response body
    pub envelope: StreamEnvelope,

    /// Parser options for the streamed markup
    pub parse: ParseOptions,
}

impl ClientOptions {
    /// Create options for an endpoint with defaults for everything else.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the response envelope.
    pub fn with_envelope(mut self, envelope: StreamEnvelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Set the parser options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
            envelope: StreamEnvelope::Raw,
            parse: ParseOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(60));
        assert_eq!(options.envelope, StreamEnvelope::Raw);
        assert!(options.token.is_none());
    }

    #[test]
    fn test_builder() {
        let options = ClientOptions::new("https://api.test/generate")
            .with_token("secret")
            .with_timeout(Duration::from_secs(5))
            .with_envelope(StreamEnvelope::DataStream);

        assert_eq!(options.endpoint, "https://api.test/generate");
        assert_eq!(options.token.as_deref(), Some("secret"));
        assert_eq!(options.timeout, Duration::from_secs(5));
    }
}
