//! Minimal convenience layer over hyper's raw HTTP/1 client
//!
//! One call issues one outbound request, buffers the response, and delivers
//! exactly one completion — the boilerplate every direct
//! `hyper::client::conn` caller otherwise repeats: URL parsing, plain-vs-TLS
//! connection setup, Host and content-length bookkeeping, body coercion, and
//! chunk aggregation.
//!
//! ```no_run
//! # async fn demo() -> tinyreq::Result<()> {
//! let reply = tinyreq::fetch("http://example.com/status?verbose=1", None).await?;
//! println!("{} {:?}", reply.head.status, reply.payload.as_bytes());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub use body::Body;
pub use dispatch::{dispatch, fetch};
pub use error::{Error, Result};
pub use handle::RequestHandle;
pub use response::{Encoding, Payload, Reply, ResponseHead, ResponseStream};
pub use spec::{RequestSpec, Scheme};
pub use target::{Options, Target};

mod accumulate;
mod body;
mod dispatch;
mod error;
mod gate;
mod handle;
mod response;
mod spec;
mod target;
mod transport;
