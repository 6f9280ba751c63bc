//! Transport connector: opens the session the transmitter sends over.

mod address;

pub use address::{HostParseError, HostParseErrorKind, split_host_port};

use crate::config::Configuration;
use smtp_send_client::connection::{connect as connect_tcp, connect_tls};
use smtp_send_client::{Client, Connected};
use tracing::{debug, info};

/// Name the client introduces itself with in EHLO/HELO.
pub const LOCAL_NAME: &str = "localhost";

/// Errors that can occur while opening a session.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// `server.host` is not `host:port`.
    #[error("could not read host: {0}")]
    HostParse(#[from] HostParseError),

    /// TCP connection or TLS handshake failed.
    #[error("{0}")]
    Connection(#[source] smtp_send_client::Error),

    /// Greeting or EHLO/HELO failed.
    #[error("{0}")]
    ClientInit(#[source] smtp_send_client::Error),

    /// PLAIN authentication failed or was refused.
    #[error("{0}")]
    Auth(#[source] smtp_send_client::Error),
}

/// Opens an SMTP session as described by a validated configuration.
///
/// The TCP connection goes to `server.host` as written. With `server.tls`
/// the host part is also the TLS server name. When a username is configured
/// the session is authenticated with PLAIN before it is returned.
///
/// # Errors
///
/// Returns an error if the address cannot be split, the connection or
/// handshake fails, or authentication fails.
pub async fn connect(config: &Configuration) -> Result<Client<Connected>, ConnectError> {
    let addr = config.server.host.as_str();
    let (host, _port) = split_host_port(addr)?;

    debug!(%addr, tls = config.server.tls, verify_tls = config.server.verify_tls, "connecting");
    let stream = if config.server.tls {
        connect_tls(addr, host, config.server.verify_tls).await
    } else {
        connect_tcp(addr).await
    }
    .map_err(ConnectError::Connection)?;

    let client = Client::from_stream(stream, host)
        .await
        .map_err(ConnectError::ClientInit)?
        .hello(LOCAL_NAME)
        .await
        .map_err(ConnectError::ClientInit)?;

    let client = match config.auth.username() {
        Some(username) => client
            .auth_plain(username, &config.auth.password, host)
            .await
            .map_err(ConnectError::Auth)?,
        None => client,
    };

    info!(%addr, "connected");
    Ok(client)
}
