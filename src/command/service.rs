//! Generation service seam and its HTTP implementation.

use async_trait::async_trait;
use futures::stream::{BoxStream, Stream, StreamExt};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{ClientOptions, GenerationRequest};
use crate::error::{Error, Result};

/// Stream of text chunks produced by a generation service.
pub type ChunkStream = BoxStream<'static, Result<String>>;

/// An external service that turns a request into streamed text.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Send the request and return the response body as a chunk stream.
    ///
    /// Errors before the first chunk (authentication, non-success status,
    /// connection failure) are returned here; errors while reading the body
    /// arrive as items of the stream.
    async fn generate(&self, request: &GenerationRequest) -> Result<ChunkStream>;
}

/// Generation service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGenerationService {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpGenerationService {
    /// Build a service with its own HTTP client.
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("helpdoc/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, options))
    }

    /// Build a service around an existing client.
    pub fn with_client(client: Client, options: &ClientOptions) -> Self {
        Self {
            client,
            endpoint: options.endpoint.clone(),
            token: options.token.clone(),
        }
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn generate(&self, request: &GenerationRequest) -> Result<ChunkStream> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body));
        }

        log::debug!("Generation stream opened ({})", status);
        Ok(utf8_chunks(response.bytes_stream()).boxed())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

fn map_http_error(status: StatusCode, body: &str) -> Error {
    if status == StatusCode::UNAUTHORIZED {
        return Error::Auth;
    }
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|wrapper| wrapper.error)
        .unwrap_or_else(|_| {
            let body = body.trim();
            if body.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body.to_string()
            }
        });
    Error::Service {
        status: status.as_u16(),
        message,
    }
}

fn utf8_chunks<S, B>(bytes: S) -> impl Stream<Item = Result<String>>
where
    S: Stream<Item = reqwest::Result<B>>,
    B: AsRef<[u8]>,
{
    bytes.scan(Utf8Carry::default(), |carry, item| {
        let chunk = item.map(|b| carry.push(b.as_ref())).map_err(Error::from);
        futures::future::ready(Some(chunk))
    })
}

/// Decodes UTF-8 across chunk boundaries.
///
/// A multi-byte character split between two chunks is held back until the
/// rest of it arrives. Invalid sequences are replaced with U+FFFD.
#[derive(Debug, Default)]
struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let keep = match std::str::from_utf8(&self.pending) {
            Ok(_) => 0,
            // Incomplete sequence at the end: hold it back.
            Err(e) if e.error_len().is_none() => self.pending.len() - e.valid_up_to(),
            Err(_) => 0,
        };
        let split = self.pending.len() - keep;
        let text = String::from_utf8_lossy(&self.pending[..split]).into_owned();
        self.pending.drain(..split);
        text
    }
}
