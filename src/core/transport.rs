//! Request execution and response normalization
//!
//! # Architecture
//!
//! The [`Transport`] trait is the seam between request construction and the
//! network: the dispatcher drives a boxed transport object, so tests can
//! substitute a fake and assert that validation failures never reach the
//! wire. [`HttpTransport`] is the reqwest-backed implementation.
//!
//! Buffered tools await the whole body and decode it by content type.
//! Streaming tools get a [`ToolStream`]: a lazy, forward-only, single-pass
//! sequence of chunks backed by the live response body. Dropping the stream
//! drops the response, which aborts the connection rather than draining it.
//!
//! Upstream failures are normalized here into the [`ToolError`] taxonomy,
//! preserving the status code, a body snippet, and the Retry-After hint on
//! throttles.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use futures::stream::BoxStream;
use futures_util::StreamExt;
use http::header::{CONTENT_TYPE, RETRY_AFTER};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::core::error::{ToolError, ToolResult};
use crate::core::request::{RequestBody, TransportRequest};
use crate::core::schema::ResponseKind;

/// Longest upstream body slice preserved in normalized errors
const ERROR_SNIPPET_LIMIT: usize = 256;

// =============================================================================
// Result shapes
// =============================================================================

/// One item of a streaming tool's response
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// Raw audio bytes from a stream-binary tool
    Audio(Bytes),
    /// Decoded event object from a stream-json tool
    Event(Value),
}

/// Lazy, single-pass response stream
///
/// Forward-only by construction: consuming requires ownership or exclusive
/// access, and there is no way to rewind. Replaying a stream means invoking
/// the tool again. Dropping the value releases the underlying connection.
pub struct ToolStream {
    inner: BoxStream<'static, ToolResult<StreamChunk>>,
}

impl ToolStream {
    pub fn new(inner: BoxStream<'static, ToolResult<StreamChunk>>) -> Self {
        Self { inner }
    }

    /// Await the next chunk; `None` means the upstream closed the stream
    pub async fn next_chunk(&mut self) -> Option<ToolResult<StreamChunk>> {
        self.inner.next().await
    }

    /// Drain the stream to completion, failing on the first interrupted chunk
    pub async fn collect(mut self) -> ToolResult<Vec<StreamChunk>> {
        let mut chunks = Vec::new();
        while let Some(chunk) = self.inner.next().await {
            chunks.push(chunk?);
        }
        Ok(chunks)
    }
}

impl Stream for ToolStream {
    type Item = ToolResult<StreamChunk>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for ToolStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ToolStream(..)")
    }
}

/// Normalized result of one tool invocation
#[derive(Debug)]
pub enum ToolOutput {
    /// Decoded JSON value
    Json(Value),
    /// Raw byte payload with the upstream's content type
    Binary { content_type: String, bytes: Bytes },
    /// Live stream of chunks; see [`ToolStream`]
    Stream(ToolStream),
}

impl ToolOutput {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    pub fn into_stream(self) -> Option<ToolStream> {
        match self {
            Self::Stream(stream) => Some(stream),
            _ => None,
        }
    }
}

// =============================================================================
// Transport seam
// =============================================================================

/// Executes built requests and shapes responses
///
/// Object-safe so the dispatcher can hold `Box<dyn Transport>` and tests can
/// inject fakes that count calls or script chunk sequences.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        request: TransportRequest,
        response: ResponseKind,
    ) -> ToolResult<ToolOutput>;
}

/// reqwest-backed transport
///
/// Buffered requests carry the configured total deadline. Streaming requests
/// only carry the connect deadline: a long audio stream must not be killed
/// mid-transfer by a total timeout, and cancellation is always available by
/// dropping the stream.
pub struct HttpTransport {
    client: reqwest::Client,
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &GatewayConfig) -> ToolResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ToolError::internal(format!("failed to construct HTTP client: {e}")))?;
        Ok(Self {
            client,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: TransportRequest,
        response: ResponseKind,
    ) -> ToolResult<ToolOutput> {
        let TransportRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut req = self.client.request(method.clone(), url.clone());
        for (name, value) in &headers {
            req = req.header(name.as_str(), value.as_str());
        }
        req = match body {
            RequestBody::Empty => req,
            RequestBody::Json(ref value) => req.json(value),
            RequestBody::Multipart { fields, files } => {
                let mut form = reqwest::multipart::Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                for file in files {
                    let part =
                        reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
                    form = form.part(file.field, part);
                }
                req.multipart(form)
            }
        };
        if !response.is_streaming() {
            req = req.timeout(self.request_timeout);
        }

        debug!(method = %method, url = %url, kind = response.as_str(), "sending upstream request");
        let resp = req
            .send()
            .await
            .map_err(|e| self.request_error(&url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let err = normalize_failure(&url, resp).await;
            warn!(status = status.as_u16(), url = %url, "upstream request failed: {err}");
            return Err(err);
        }

        match response {
            ResponseKind::Json | ResponseKind::Binary => buffer_response(&url, resp).await,
            ResponseKind::StreamBinary => Ok(ToolOutput::Stream(binary_stream(url, resp))),
            ResponseKind::StreamJson => Ok(ToolOutput::Stream(json_stream(url, resp))),
        }
    }
}

impl HttpTransport {
    fn request_error(&self, url: &url::Url, error: reqwest::Error) -> ToolError {
        if error.is_timeout() {
            ToolError::Timeout {
                url: url.to_string(),
                seconds: self.request_timeout.as_secs(),
            }
        } else if error.is_connect() {
            ToolError::transport(url.as_str(), format!("connection failed: {error}"))
        } else {
            ToolError::transport(url.as_str(), error)
        }
    }
}

// =============================================================================
// Response shaping
// =============================================================================

/// Map a non-success response into the error taxonomy
///
/// Reads the body for the diagnostic snippet; the Retry-After header is
/// parsed when numeric and carried on rate-limit errors.
async fn normalize_failure(url: &url::Url, resp: reqwest::Response) -> ToolError {
    let status = resp.status().as_u16();
    let retry_after = resp
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok());
    let body = resp.text().await.unwrap_or_default();
    ToolError::from_status(status, url.path(), snippet(&body), retry_after)
}

/// Bound the upstream body to a short diagnostic slice
fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= ERROR_SNIPPET_LIMIT {
        return trimmed.to_string();
    }
    let mut cut = ERROR_SNIPPET_LIMIT;
    while !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &trimmed[..cut])
}

/// Await a buffered body and decode it by content type
async fn buffer_response(url: &url::Url, resp: reqwest::Response) -> ToolResult<ToolOutput> {
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| ToolError::transport(url.as_str(), e))?;

    if content_type.contains("json") {
        if bytes.is_empty() {
            // Some delete endpoints answer 200 with an empty JSON body
            return Ok(ToolOutput::Json(Value::Null));
        }
        let value: Value = serde_json::from_slice(&bytes).map_err(|e| ToolError::DecodeFailure {
            path: url.path().to_string(),
            reason: e.to_string(),
        })?;
        Ok(ToolOutput::Json(value))
    } else {
        Ok(ToolOutput::Binary {
            content_type,
            bytes,
        })
    }
}

/// Pass upstream byte chunks through as audio chunks
fn binary_stream(url: url::Url, resp: reqwest::Response) -> ToolStream {
    let stream = resp.bytes_stream().map(move |chunk| match chunk {
        Ok(bytes) => Ok(StreamChunk::Audio(bytes)),
        Err(e) => Err(ToolError::stream_interrupted(url.as_str(), e)),
    });
    ToolStream::new(stream.boxed())
}

/// Wrap a live response body as a newline-delimited JSON event stream
fn json_stream(url: url::Url, resp: reqwest::Response) -> ToolStream {
    let chunk_url = url.clone();
    let bytes = resp.bytes_stream().map(move |chunk| {
        chunk.map_err(|e| ToolError::stream_interrupted(chunk_url.as_str(), e))
    });
    event_stream(url, bytes)
}

/// Re-frame upstream bytes into newline-delimited JSON events
///
/// Lines may span chunk boundaries, so bytes are buffered and only the tail
/// after the last newline is carried into the next chunk. One complete line
/// becomes one event.
fn event_stream<S>(url: url::Url, upstream: S) -> ToolStream
where
    S: Stream<Item = ToolResult<Bytes>> + Send + 'static,
{
    let stream = async_stream::try_stream! {
        let mut upstream = Box::pin(upstream);
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = upstream.next().await {
            let bytes = chunk?;
            buf.extend_from_slice(&bytes);
            while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                if let Some(event) = parse_event_line(&url, &line)? {
                    yield StreamChunk::Event(event);
                }
            }
        }
        // Final line may arrive without a trailing newline
        if let Some(event) = parse_event_line(&url, &buf)? {
            yield StreamChunk::Event(event);
        }
    };
    ToolStream::new(Box::pin(stream))
}

fn parse_event_line(url: &url::Url, line: &[u8]) -> ToolResult<Option<Value>> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let event: Value = serde_json::from_str(text).map_err(|e| {
        ToolError::stream_interrupted(url.as_str(), format!("invalid JSON event: {e}"))
    })?;
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use futures::stream;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_stream_yields_chunks_in_order_then_ends() {
        let chunks = vec![
            Ok(StreamChunk::Audio(Bytes::from_static(b"one"))),
            Ok(StreamChunk::Audio(Bytes::from_static(b"two"))),
            Ok(StreamChunk::Audio(Bytes::from_static(b"three"))),
        ];
        let mut stream = ToolStream::new(stream::iter(chunks).boxed());

        let mut seen = Vec::new();
        while let Some(chunk) = stream.next_chunk().await {
            seen.push(chunk.unwrap());
        }
        assert_eq!(
            seen,
            vec![
                StreamChunk::Audio(Bytes::from_static(b"one")),
                StreamChunk::Audio(Bytes::from_static(b"two")),
                StreamChunk::Audio(Bytes::from_static(b"three")),
            ]
        );
        // Exhausted for good; a fresh invocation is the only way to replay
        assert!(stream.next_chunk().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_collect_stops_on_error() {
        let url = url::Url::parse("http://upstream/v1/x").unwrap();
        let chunks = vec![
            Ok(StreamChunk::Audio(Bytes::from_static(b"one"))),
            Err(ToolError::stream_interrupted(url.as_str(), "reset")),
        ];
        let stream = ToolStream::new(stream::iter(chunks).boxed());
        let err = stream.collect().await.unwrap_err();
        assert_eq!(err.kind(), crate::core::error::ErrorKind::Transport);
    }

    #[test]
    fn test_snippet_truncation() {
        let short = "short body";
        assert_eq!(snippet(short), "short body");

        let long = "x".repeat(1000);
        let cut = snippet(&long);
        assert!(cut.len() <= ERROR_SNIPPET_LIMIT + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_parse_event_line() {
        let url = url::Url::parse("http://upstream/v1/x").unwrap();
        let event = parse_event_line(&url, b"{\"alignment\": []}\n").unwrap();
        assert_eq!(event, Some(json!({"alignment": []})));

        assert_eq!(parse_event_line(&url, b"  \n").unwrap(), None);
        assert!(parse_event_line(&url, b"not json").is_err());
    }

    #[tokio::test]
    async fn test_event_stream_reframes_lines_split_across_chunks() {
        let url = url::Url::parse("http://upstream/v1/x").unwrap();
        // The first line spans three chunks and the last line never gets a
        // trailing newline
        let chunks: Vec<ToolResult<Bytes>> = vec![
            Ok(Bytes::from_static(b"{\"audio_base64\":")),
            Ok(Bytes::from_static(b"\"qq\",\"alig")),
            Ok(Bytes::from_static(b"nment\":{}}\n{\"audio_base64\":\"rr\"}\n")),
            Ok(Bytes::from_static(b"{\"is_final\":true}")),
        ];
        let events = event_stream(url, stream::iter(chunks)).collect().await.unwrap();
        assert_eq!(
            events,
            vec![
                StreamChunk::Event(json!({"audio_base64": "qq", "alignment": {}})),
                StreamChunk::Event(json!({"audio_base64": "rr"})),
                StreamChunk::Event(json!({"is_final": true})),
            ]
        );
    }

    #[tokio::test]
    async fn test_event_stream_surfaces_mid_body_failure() {
        let url = url::Url::parse("http://upstream/v1/x").unwrap();
        let chunks: Vec<ToolResult<Bytes>> = vec![
            Ok(Bytes::from_static(b"{\"audio_base64\":\"qq\"}\n{\"tr")),
            Err(ToolError::stream_interrupted(url.as_str(), "reset")),
        ];
        let mut stream = event_stream(url, stream::iter(chunks));

        let first = stream.next_chunk().await.unwrap().unwrap();
        assert_eq!(first, StreamChunk::Event(json!({"audio_base64": "qq"})));
        let err = stream.next_chunk().await.unwrap().unwrap_err();
        assert_eq!(err.kind(), crate::core::error::ErrorKind::Transport);
    }

    #[test]
    fn test_output_accessors() {
        let output = ToolOutput::Json(json!({"ok": true}));
        assert_eq!(output.as_json(), Some(&json!({"ok": true})));
        assert!(!output.is_stream());

        let output = ToolOutput::Stream(ToolStream::new(stream::empty().boxed()));
        assert!(output.is_stream());
        assert!(output.into_stream().is_some());
    }
}
