//! Plain TCP or rustls connections for the pooled hyper client
//!
//! `http` targets get the raw TCP stream from [`HttpConnector`]. `https`
//! targets get the same stream wrapped in a TLS session verified against the
//! webpki root store. Only HTTP/1.1 is offered over ALPN.

use std::fmt;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use http::Uri;
use http::uri::Scheme;
use hyper_util::client::legacy::connect::{Connected, Connection, HttpConnector};
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig as TlsConfig, RootCertStore};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tower::Service;

use crate::error::{self, Result};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Connector handing out plain or TLS streams depending on the URI scheme
#[derive(Clone)]
pub struct HttpsConnector {
    http: HttpConnector,
    tls: TlsConnector,
}

impl HttpsConnector {
    /// Build a connector trusting the bundled webpki roots
    ///
    /// # Errors
    ///
    /// Returns a builder error if the TLS configuration cannot be created.
    pub fn new(mut http: HttpConnector) -> Result<Self> {
        http.enforce_http(false);

        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let mut config = TlsConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()
            .map_err(error::builder)?
            .with_root_certificates(roots)
            .with_no_client_auth();
        config.alpn_protocols = vec![b"http/1.1".to_vec()];

        tracing::debug!(target: "restful::executor", roots = webpki_roots::TLS_SERVER_ROOTS.len(), "TLS connector ready");

        Ok(Self {
            http,
            tls: TlsConnector::from(Arc::new(config)),
        })
    }
}

impl Service<Uri> for HttpsConnector {
    type Response = MaybeHttpsStream;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = std::result::Result<MaybeHttpsStream, BoxError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), BoxError>> {
        self.http.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, uri: Uri) -> Self::Future {
        let secure = uri.scheme() == Some(&Scheme::HTTPS);
        let host = uri
            .host()
            .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string());
        let connecting = self.http.call(uri);
        let tls = self.tls.clone();

        Box::pin(establish(connecting, host, secure, tls))
    }
}

async fn establish<F, E>(
    connecting: F,
    host: Option<String>,
    secure: bool,
    tls: TlsConnector,
) -> std::result::Result<MaybeHttpsStream, BoxError>
where
    F: Future<Output = std::result::Result<TokioIo<TcpStream>, E>>,
    E: Into<BoxError>,
{
    let tcp = connecting.await.map_err(Into::into)?;
    if !secure {
        return Ok(MaybeHttpsStream::Http(tcp));
    }

    let host = host.ok_or("https target without a host")?;
    let server_name = ServerName::try_from(host)?;
    let stream = tls.connect(server_name, tcp.into_inner()).await?;
    Ok(MaybeHttpsStream::Https(TokioIo::new(stream)))
}

impl fmt::Debug for HttpsConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpsConnector").finish_non_exhaustive()
    }
}

/// Stream returned by [`HttpsConnector`]
pub enum MaybeHttpsStream {
    Http(TokioIo<TcpStream>),
    Https(TokioIo<TlsStream<TcpStream>>),
}

impl Connection for MaybeHttpsStream {
    fn connected(&self) -> Connected {
        match self {
            Self::Http(stream) => stream.inner().connected(),
            Self::Https(stream) => stream.inner().get_ref().0.connected(),
        }
    }
}

impl hyper::rt::Read for MaybeHttpsStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: hyper::rt::ReadBufCursor<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Http(stream) => Pin::new(stream).poll_read(cx, buf),
            Self::Https(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl hyper::rt::Write for MaybeHttpsStream {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Http(stream) => Pin::new(stream).poll_write(cx, buf),
            Self::Https(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Http(stream) => Pin::new(stream).poll_flush(cx),
            Self::Https(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Http(stream) => Pin::new(stream).poll_shutdown(cx),
            Self::Https(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}
