//! Transport selection and connection setup

use crate::handle::OutboundBody;
use crate::spec::{RequestSpec, Scheme};
use crate::{Error, Result};
use hyper::client::conn::http1::{self, SendRequest};
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};

/// Connect to the spec's authority, wrapping the stream in TLS when the
/// scheme asks for it, and complete the HTTP/1 handshake.
///
/// The connection driver is spawned onto its own task; request and response
/// failures surface through the returned sender and its body stream.
pub(crate) async fn connect(spec: &RequestSpec) -> Result<SendRequest<OutboundBody>> {
    let authority = spec.authority();
    tracing::debug!(%authority, scheme = ?spec.scheme, "connecting");

    let tcp = TcpStream::connect(&authority)
        .await
        .map_err(|source| Error::Connect { authority, source })?;

    match spec.scheme {
        Scheme::Http => handshake(TokioIo::new(tcp)).await,
        Scheme::Https => {
            let server_name = ServerName::try_from(spec.host.clone())
                .map_err(|err| Error::Tls(err.to_string()))?;
            let tls = tls_connector()
                .connect(server_name, tcp)
                .await
                .map_err(|err| Error::Tls(err.to_string()))?;
            handshake(TokioIo::new(tls)).await
        }
    }
}

async fn handshake<I>(io: I) -> Result<SendRequest<OutboundBody>>
where
    I: hyper::rt::Read + hyper::rt::Write + Unpin + Send + 'static,
{
    let (sender, connection) = http1::handshake(io).await.map_err(Error::Handshake)?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            tracing::debug!(%err, "connection task ended with error");
        }
    });
    Ok(sender)
}

fn tls_connector() -> TlsConnector {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}
