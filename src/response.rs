//! Response metadata, payload, and streaming types

use crate::Result;
use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Response metadata delivered with every successful completion.
#[derive(Debug)]
pub struct ResponseHead {
    /// HTTP status code
    pub status: StatusCode,
    /// Negotiated HTTP version
    pub version: Version,
    /// Response headers
    pub headers: HeaderMap,
}

impl ResponseHead {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Look up a header value as text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// Output decoding directive for the aggregated response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding {
    /// Lenient JSON parse, falling back to the text form on malformed input
    Json,
    /// Decode bytes to text by character-encoding label, e.g. `"utf-8"`
    Charset(String),
}

impl Encoding {
    /// Map a directive name: `"json"`, or any codec label understood by
    /// `encoding_rs`.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("json") {
            Encoding::Json
        } else {
            Encoding::Charset(label.to_string())
        }
    }
}

/// Aggregated or streamed response body.
#[derive(Debug)]
pub enum Payload {
    /// Raw aggregated bytes (no decoding directive)
    Bytes(Bytes),
    /// Text produced by a charset directive or a JSON fallback
    Text(String),
    /// Structured value produced by the `json` directive
    Json(serde_json::Value),
    /// Live body frames, delivered when response listening is suppressed
    Stream(ResponseStream),
}

impl Payload {
    /// Finalize an aggregated body under the given directive.
    ///
    /// A `json` directive that fails to parse falls back to the (lossy) text
    /// form; an unknown charset label decodes as UTF-8.
    pub(crate) fn decode(bytes: Bytes, encoding: Option<&Encoding>) -> Payload {
        match encoding {
            None => Payload::Bytes(bytes),
            Some(Encoding::Json) => match serde_json::from_slice(&bytes) {
                Ok(value) => Payload::Json(value),
                Err(_) => Payload::Text(String::from_utf8_lossy(&bytes).into_owned()),
            },
            Some(Encoding::Charset(label)) => {
                let codec = encoding_rs::Encoding::for_label(label.as_bytes())
                    .unwrap_or(encoding_rs::UTF_8);
                let (text, _, _) = codec.decode(&bytes);
                Payload::Text(text.into_owned())
            }
        }
    }

    /// View the aggregated payload as bytes
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Payload::Bytes(bytes) => Some(bytes),
            Payload::Text(text) => Some(text.as_bytes()),
            _ => None,
        }
    }

    /// View the payload as decoded text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// View the payload as a parsed JSON value
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Take the live stream when response listening was suppressed
    pub fn into_stream(self) -> Option<ResponseStream> {
        match self {
            Payload::Stream(stream) => Some(stream),
            _ => None,
        }
    }
}

/// Streamed response body frames.
///
/// Wraps the frame channel fed by the dispatch task; yielded through
/// [`Payload::Stream`] so the caller consumes the body itself.
#[derive(Debug)]
pub struct ResponseStream {
    receiver: mpsc::Receiver<Result<Bytes>>,
}

impl ResponseStream {
    pub(crate) fn new(receiver: mpsc::Receiver<Result<Bytes>>) -> Self {
        Self { receiver }
    }

    /// Next body chunk; `None` once the stream ends
    pub async fn chunk(&mut self) -> Option<Result<Bytes>> {
        self.receiver.recv().await
    }
}

impl futures_util::Stream for ResponseStream {
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

/// Successful completion: response metadata plus its body.
#[derive(Debug)]
pub struct Reply {
    /// Status, version, and headers
    pub head: ResponseHead,
    /// Aggregated, decoded, or streamed body
    pub payload: Payload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_directive_yields_raw_bytes() {
        let payload = Payload::decode(Bytes::from_static(b"\x00\xff"), None);
        assert_eq!(payload.as_bytes(), Some(&b"\x00\xff"[..]));
    }

    #[test]
    fn json_directive_parses_valid_payloads() {
        let payload = Payload::decode(Bytes::from_static(br#"{"a":1}"#), Some(&Encoding::Json));
        assert_eq!(payload.as_json(), Some(&json!({ "a": 1 })));
    }

    #[test]
    fn malformed_json_falls_back_to_text() {
        let payload = Payload::decode(Bytes::from_static(b"not-json"), Some(&Encoding::Json));
        assert_eq!(payload.as_text(), Some("not-json"));
    }

    #[test]
    fn charset_directive_decodes_bytes() {
        let latin1 = Bytes::from_static(&[b'c', b'a', b'f', 0xe9]);
        let payload = Payload::decode(latin1, Some(&Encoding::Charset("latin1".to_string())));
        assert_eq!(payload.as_text(), Some("café"));
    }

    #[test]
    fn directive_labels_map_to_encodings() {
        assert_eq!(Encoding::from_label("json"), Encoding::Json);
        assert_eq!(
            Encoding::from_label("utf-8"),
            Encoding::Charset("utf-8".to_string())
        );
    }
}
