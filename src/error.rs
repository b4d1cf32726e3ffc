//! Error types

use thiserror::Error;

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by a dispatch call.
///
/// [`EmptyTarget`](Error::EmptyTarget) and [`InvalidUrl`](Error::InvalidUrl)
/// are usage errors, returned synchronously before any I/O. Every other
/// variant is delivered through the completion callback, at most once per
/// call.
#[derive(Debug, Error)]
pub enum Error {
    /// Target location missing or empty
    #[error("target location required")]
    EmptyTarget,

    /// Target URL could not be parsed
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TCP connect to the resolved authority failed
    #[error("connect to {authority} failed: {source}")]
    Connect {
        /// The `host:port` that refused the connection
        authority: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// TLS session could not be established
    #[error("tls error: {0}")]
    Tls(String),

    /// HTTP/1 handshake failed
    #[error("handshake error: {0}")]
    Handshake(#[source] hyper::Error),

    /// Sending the request failed
    #[error("request error: {0}")]
    Request(#[source] hyper::Error),

    /// The response body stream failed mid-flight
    #[error("response body error: {0}")]
    ResponseBody(#[source] hyper::Error),

    /// The request was aborted through its handle
    #[error("request aborted")]
    Aborted,

    /// Write on a request whose body channel is already closed
    #[error("request body channel closed")]
    ChannelClosed,

    /// Request body JSON serialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request construction error
    #[error("invalid request: {0}")]
    Http(#[from] http::Error),
}
