//! Error types for the relay pipeline.

use crate::config::ConfigError;
use crate::connect::ConnectError;

/// Result type alias for the relay pipeline.
pub type Result<T> = std::result::Result<T, SendError>;

/// A failed relay, tagged with the stage that failed.
///
/// The display form is the one-line diagnostic printed before exiting.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// Configuration could not be read, parsed, or validated.
    #[error("could not read config: {0}")]
    Config(#[from] ConfigError),

    /// Session could not be opened or authenticated.
    #[error("could not connect: {0}")]
    Connect(#[from] ConnectError),

    /// MAIL FROM was rejected.
    #[error("could not MAIL: {0}")]
    Mail(#[source] smtp_send_client::Error),

    /// RCPT TO was rejected.
    #[error("could not RCPT: {0}")]
    Rcpt(#[source] smtp_send_client::Error),

    /// DATA was rejected.
    #[error("could not DATA: {0}")]
    Data(#[source] smtp_send_client::Error),

    /// Writing headers or body, or closing the data section, failed.
    #[error("could not send body: {0}")]
    Body(#[source] smtp_send_client::Error),
}
