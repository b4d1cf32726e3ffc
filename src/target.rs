//! Caller-supplied request targets

use crate::response::Encoding;
use crate::spec::Scheme;
use crate::Body;
use http::{HeaderMap, Method};

/// Target of a dispatch call: a bare URL string or an options bag.
#[derive(Debug, Clone)]
pub enum Target {
    /// URL string, parsed during normalization
    Url(String),
    /// Structured options
    Options(Options),
}

impl From<&str> for Target {
    fn from(url: &str) -> Self {
        Self::Url(url.to_string())
    }
}

impl From<String> for Target {
    fn from(url: String) -> Self {
        Self::Url(url)
    }
}

impl From<Options> for Target {
    fn from(options: Options) -> Self {
        Self::Options(options)
    }
}

/// Structured request options.
///
/// Transport-level fields pass into the request spec untouched; fields parsed
/// out of [`url`](Options::url) overwrite only the scheme, host, port, and
/// path. The remaining fields steer the wrapper itself and never reach the
/// transport.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// URL parsed into scheme, host, port, and path-with-query
    pub url: Option<String>,
    /// Request method, GET when unset
    pub method: Option<Method>,
    /// Transport scheme, overridden when `url` parses
    pub scheme: Option<Scheme>,
    /// Host name, `localhost` when nothing supplies one
    pub host: Option<String>,
    /// TCP port, scheme default when nothing supplies one
    pub port: Option<u16>,
    /// Request path with query, `/` when nothing supplies one
    pub path: Option<String>,
    /// Headers merged into the request; last insert per key wins
    pub headers: HeaderMap,
    /// Request body, used when the dispatch call passes none
    pub body: Option<Body>,
    /// Keep the request open for further writes through the handle
    pub no_req_end: bool,
    /// Deliver the raw response stream instead of aggregating the body
    pub no_res_listen: bool,
    /// Output decoding applied to the aggregated body
    pub encoding: Option<Encoding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_become_url_targets() {
        assert!(matches!(Target::from("http://h"), Target::Url(url) if url == "http://h"));
    }

    #[test]
    fn options_pass_through() {
        let target = Target::from(Options {
            host: Some("h".into()),
            ..Options::default()
        });
        assert!(matches!(target, Target::Options(options) if options.host.as_deref() == Some("h")));
    }
}
