//! Live request handle and outbound body plumbing

use bytes::Bytes;
use hyper::body::{Body as HttpBody, Frame, SizeHint};
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Handle onto the in-flight request.
///
/// Returned by [`dispatch`](crate::dispatch). Under `no_req_end` the caller
/// streams further body data with [`write`](Self::write) and closes the
/// request with [`end`](Self::end); [`abort`](Self::abort) races an abort
/// against completion at any time. Dropping the handle does neither.
#[derive(Debug)]
pub struct RequestHandle {
    pub(crate) body_tx: Option<mpsc::Sender<Bytes>>,
    pub(crate) abort_tx: Option<mpsc::Sender<()>>,
}

impl RequestHandle {
    /// Write another body chunk on a request held open by `no_req_end`.
    ///
    /// Fails with [`Error::ChannelClosed`](crate::Error::ChannelClosed) when
    /// the request was auto-terminated or already ended.
    pub async fn write(&self, chunk: impl Into<Bytes>) -> crate::Result<()> {
        match &self.body_tx {
            Some(tx) => tx
                .send(chunk.into())
                .await
                .map_err(|_| crate::Error::ChannelClosed),
            None => Err(crate::Error::ChannelClosed),
        }
    }

    /// Terminate a request held open by `no_req_end`.
    pub fn end(&mut self) {
        self.body_tx = None;
    }

    /// Abort the request. Delivers [`Error::Aborted`](crate::Error::Aborted)
    /// through the completion callback unless a terminal outcome already won.
    pub fn abort(&mut self) {
        self.body_tx = None;
        if let Some(tx) = self.abort_tx.take() {
            let _ = tx.try_send(());
        }
    }
}

/// Request body handed to the transport: a fixed buffer written and ended in
/// one step, or an open channel in chunked mode.
pub(crate) enum OutboundBody {
    Fixed(Option<Bytes>),
    Channel(mpsc::Receiver<Bytes>),
}

impl HttpBody for OutboundBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, Infallible>>> {
        match self.get_mut() {
            OutboundBody::Fixed(slot) => Poll::Ready(slot.take().map(|bytes| Ok(Frame::data(bytes)))),
            OutboundBody::Channel(receiver) => match receiver.poll_recv(cx) {
                Poll::Ready(Some(chunk)) => Poll::Ready(Some(Ok(Frame::data(chunk)))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            },
        }
    }

    fn is_end_stream(&self) -> bool {
        matches!(self, OutboundBody::Fixed(None))
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            OutboundBody::Fixed(Some(bytes)) => SizeHint::with_exact(bytes.len() as u64),
            OutboundBody::Fixed(None) => SizeHint::with_exact(0),
            OutboundBody::Channel(_) => SizeHint::default(),
        }
    }
}
