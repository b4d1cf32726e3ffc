//! The request dispatcher

use crate::accumulate::ChunkBuffer;
use crate::gate::DeliveryGate;
use crate::handle::{OutboundBody, RequestHandle};
use crate::response::{Payload, Reply, ResponseHead, ResponseStream};
use crate::spec::{self, Controls, RequestSpec};
use crate::target::Target;
use crate::{Body, Error, Result, transport};
use bytes::Bytes;
use http::header::{self, HeaderValue};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use tokio::sync::{mpsc, oneshot};

const CHANNEL_CAPACITY: usize = 16;

/// Issue one HTTP request and deliver exactly one completion.
///
/// `target` is a URL string or an [`Options`](crate::Options) bag; an
/// explicit `body` wins over one carried in the options. The callback
/// receives either the error or the response metadata plus its body — never
/// both, never twice — regardless of how many transport signals fire.
/// Returns the live [`RequestHandle`] for chunked-mode writes and abort.
///
/// Usage errors (empty or unparseable target) fail synchronously, before any
/// I/O. Must be called from within a tokio runtime; the transport work runs
/// on a spawned task and `dispatch` returns immediately.
pub fn dispatch<T, C>(target: T, body: Option<Body>, callback: C) -> Result<RequestHandle>
where
    T: Into<Target>,
    C: FnOnce(Result<Reply>) + Send + 'static,
{
    let (mut spec, controls) = spec::normalize(target.into(), body)?;

    // serialize the body and fix the framing header before any I/O
    let payload = spec.body.take().map(Body::into_bytes).transpose()?;
    if controls.no_req_end {
        spec.headers.insert(
            header::TRANSFER_ENCODING,
            HeaderValue::from_static("chunked"),
        );
    } else {
        let length = payload.as_ref().map_or(0, Bytes::len);
        spec.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }

    tracing::debug!(
        method = %spec.method,
        host = %spec.host,
        port = spec.port,
        path = %spec.path,
        "dispatching request"
    );

    let (outbound, body_tx) = if controls.no_req_end {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        if let Some(first) = payload {
            // fresh channel, capacity is available
            let _ = tx.try_send(first);
        }
        (OutboundBody::Channel(rx), Some(tx))
    } else {
        (OutboundBody::Fixed(payload), None)
    };

    let (abort_tx, mut abort_rx) = mpsc::channel::<()>(1);
    let mut gate = DeliveryGate::new(Box::new(callback));

    tokio::spawn(async move {
        let outcome = tokio::select! {
            Some(()) = abort_rx.recv() => {
                gate.fire(Err(Error::Aborted));
                return;
            }
            outcome = run(spec, controls, outbound) => outcome,
        };
        match outcome {
            RunOutcome::Done(result) => {
                gate.fire(result);
            }
            RunOutcome::Streaming {
                reply,
                incoming,
                frames,
            } => {
                if !gate.fire(Ok(reply)) {
                    return;
                }
                tokio::select! {
                    Some(()) = abort_rx.recv() => {
                        let _ = frames.try_send(Err(Error::Aborted));
                    }
                    _ = forward(incoming, &frames) => {}
                }
            }
        }
    });

    Ok(RequestHandle {
        body_tx,
        abort_tx: Some(abort_tx),
    })
}

/// Await-style wrapper over [`dispatch`].
///
/// Bridges the completion callback through a oneshot channel. The request
/// handle is managed internally, so chunked-mode targets should use
/// [`dispatch`] directly.
pub async fn fetch(target: impl Into<Target>, body: Option<Body>) -> Result<Reply> {
    let (tx, rx) = oneshot::channel();
    let _handle = dispatch(target, body, move |outcome| {
        let _ = tx.send(outcome);
    })?;
    rx.await.map_err(|_| Error::ChannelClosed)?
}

enum RunOutcome {
    /// Terminal result, ready for the gate
    Done(Result<Reply>),
    /// Response listening suppressed: the head is delivered immediately and
    /// the body keeps flowing into the caller's stream
    Streaming {
        reply: Reply,
        incoming: Incoming,
        frames: mpsc::Sender<Result<Bytes>>,
    },
}

async fn run(spec: RequestSpec, controls: Controls, outbound: OutboundBody) -> RunOutcome {
    let response = match send(spec, outbound).await {
        Ok(response) => response,
        Err(err) => return RunOutcome::Done(Err(err)),
    };

    let (parts, mut incoming) = response.into_parts();
    let head = ResponseHead {
        status: parts.status,
        version: parts.version,
        headers: parts.headers,
    };

    if controls.no_res_listen {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let reply = Reply {
            head,
            payload: Payload::Stream(ResponseStream::new(rx)),
        };
        return RunOutcome::Streaming {
            reply,
            incoming,
            frames: tx,
        };
    }

    let mut chunks = ChunkBuffer::default();
    loop {
        match incoming.frame().await {
            Some(Ok(frame)) => {
                if let Ok(data) = frame.into_data() {
                    chunks.push(data);
                }
            }
            Some(Err(err)) => return RunOutcome::Done(Err(Error::ResponseBody(err))),
            None => break,
        }
    }

    let payload = Payload::decode(chunks.finalize(), controls.encoding.as_ref());
    RunOutcome::Done(Ok(Reply { head, payload }))
}

async fn send(spec: RequestSpec, outbound: OutboundBody) -> Result<hyper::Response<Incoming>> {
    let mut sender = transport::connect(&spec).await?;
    let request = build_request(spec, outbound)?;
    sender.send_request(request).await.map_err(Error::Request)
}

fn build_request(spec: RequestSpec, outbound: OutboundBody) -> Result<http::Request<OutboundBody>> {
    // raw hyper connections do not fill in Host
    let host = spec.host_header();
    let mut request = http::Request::builder()
        .method(spec.method)
        .uri(spec.path)
        .body(outbound)?;

    let mut headers = spec.headers;
    if !headers.contains_key(header::HOST) {
        headers.insert(
            header::HOST,
            HeaderValue::from_str(&host).map_err(http::Error::from)?,
        );
    }
    *request.headers_mut() = headers;
    Ok(request)
}

async fn forward(mut incoming: Incoming, frames: &mpsc::Sender<Result<Bytes>>) {
    loop {
        match incoming.frame().await {
            Some(Ok(frame)) => {
                if let Ok(data) = frame.into_data() {
                    if frames.send(Ok(data)).await.is_err() {
                        // caller dropped the stream
                        break;
                    }
                }
            }
            Some(Err(err)) => {
                let _ = frames.send(Err(Error::ResponseBody(err))).await;
                break;
            }
            None => break,
        }
    }
}
