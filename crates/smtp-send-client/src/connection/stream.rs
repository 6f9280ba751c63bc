//! Low-level SMTP stream handling.

use super::tls::create_tls_connector;
use crate::error::{Error, Result};
use rustls::pki_types::ServerName;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

/// SMTP stream (TCP or TLS).
#[derive(Debug)]
pub enum SmtpStream {
    /// Plain TCP connection.
    Tcp(BufReader<TcpStream>),
    /// TLS-encrypted connection.
    Tls(Box<BufReader<tokio_rustls::client::TlsStream<TcpStream>>>),
}

impl SmtpStream {
    /// Returns true if the stream is TLS-encrypted.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }

    /// Reads a line from the stream, without its line terminator.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the server closed the connection.
    pub async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = match self {
            Self::Tcp(reader) => reader.read_line(&mut line).await?,
            Self::Tls(reader) => reader.read_line(&mut line).await?,
        };
        if read == 0 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed by server",
            )));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Writes data to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        match self {
            Self::Tcp(reader) => {
                reader.get_mut().write_all(data).await?;
                reader.get_mut().flush().await?;
            }
            Self::Tls(reader) => {
                reader.get_mut().write_all(data).await?;
                reader.get_mut().flush().await?;
            }
        }
        Ok(())
    }
}

/// Connects to an SMTP server over plain TCP.
///
/// `addr` is a `host:port` string and is resolved as given.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub async fn connect(addr: &str) -> Result<SmtpStream> {
    let stream = TcpStream::connect(addr).await?;
    Ok(SmtpStream::Tcp(BufReader::new(stream)))
}

/// Connects to an SMTP server over TLS (implicit TLS, e.g. port 465).
///
/// `server_name` is the name presented via SNI and checked against the
/// certificate. With `verify` set to false the certificate is not checked
/// at all.
///
/// # Errors
///
/// Returns an error if the connection or TLS handshake fails.
pub async fn connect_tls(addr: &str, server_name: &str, verify: bool) -> Result<SmtpStream> {
    connect_tls_with(addr, server_name, create_tls_connector(verify)).await
}

pub(crate) async fn connect_tls_with(
    addr: &str,
    server_name: &str,
    connector: TlsConnector,
) -> Result<SmtpStream> {
    let server_name = ServerName::try_from(server_name.to_string())
        .map_err(|_| Error::InvalidHostname(server_name.to_string()))?;

    let tcp_stream = TcpStream::connect(addr).await?;
    let tls_stream = connector.connect(server_name, tcp_stream).await?;
    Ok(SmtpStream::Tls(Box::new(BufReader::new(tls_stream))))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::super::tls::verifying_connector;
    use super::*;
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;
    use tokio_rustls::TlsAcceptor;
    use tokio_rustls::rustls::{RootCertStore, ServerConfig};

    const CA_PEM: &[u8] = include_bytes!("../../tests/fixtures/ca.pem");
    const CERT_PEM: &[u8] = include_bytes!("../../tests/fixtures/cert.pem");
    const KEY_PEM: &[u8] = include_bytes!("../../tests/fixtures/key.pem");

    /// Connector trusting only the test CA that issued `mail.example.org`.
    fn test_ca_connector() -> TlsConnector {
        let mut roots = RootCertStore::empty();
        for cert in rustls_pemfile::certs(&mut &CA_PEM[..]) {
            roots.add(cert.unwrap()).unwrap();
        }
        verifying_connector(roots)
    }

    /// Accepts one TLS connection on `127.0.0.1` and sends a greeting.
    async fn tls_server() -> (String, JoinHandle<()>) {
        let certs = rustls_pemfile::certs(&mut &CERT_PEM[..])
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        let key = rustls_pemfile::private_key(&mut &KEY_PEM[..])
            .unwrap()
            .expect("fixture key");
        let config = ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .unwrap();
        let acceptor = TlsAcceptor::from(Arc::new(config));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let handle = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            if let Ok(mut stream) = acceptor.accept(socket).await {
                let _ = stream.write_all(b"220 mail.example.org ESMTP\r\n").await;
                let _ = stream.flush().await;
            }
        });
        (addr, handle)
    }

    #[tokio::test]
    async fn trusted_certificate_for_matching_name() {
        let (addr, server) = tls_server().await;

        let mut stream = connect_tls_with(&addr, "mail.example.org", test_ca_connector())
            .await
            .unwrap();
        assert!(stream.is_tls());
        assert_eq!(stream.read_line().await.unwrap(), "220 mail.example.org ESMTP");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn trusted_certificate_for_other_name_is_rejected() {
        let (addr, server) = tls_server().await;

        // Chain is trusted, but the certificate is not valid for 127.0.0.1
        let err = connect_tls_with(&addr, "127.0.0.1", test_ca_connector())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unverified_connection_ignores_name() {
        let (addr, server) = tls_server().await;

        let mut stream = connect_tls(&addr, "127.0.0.1", false).await.unwrap();
        assert_eq!(stream.read_line().await.unwrap(), "220 mail.example.org ESMTP");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unusable_server_name() {
        let err = connect_tls("127.0.0.1:1", "not a host name", true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHostname(_)));
    }
}
