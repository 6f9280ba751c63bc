//! # smtp-send
//!
//! Relays a message read from standard input to a single recipient through
//! a configured SMTP server.
//!
//! One invocation is one linear pipeline:
//!
//! ```text
//! Args ─→ Configuration::load ─→ validate ─→ connect ─→ transmit
//! ```
//!
//! Every stage returns its error to [`run`]; only the binary decides how to
//! report it and which exit status to use.
//!
//! ## Modules
//!
//! - [`args`]: command-line surface
//! - [`config`]: configuration model, YAML loading, validation
//! - [`connect`]: TCP/TLS connection, greeting, PLAIN authentication
//! - [`transmit`]: MAIL/RCPT/DATA/QUIT with the header block and body

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod args;
pub mod config;
pub mod connect;
mod error;
pub mod transmit;

pub use args::Args;
pub use config::{ConfigError, Configuration, ValidationError};
pub use connect::{ConnectError, HostParseError, connect};
pub use error::{Result, SendError};
pub use transmit::{Headers, transmit};

use tokio::io::AsyncRead;

/// Runs the whole relay: load and validate the configuration named by
/// `args`, open the session, and send `body` to `args.to`.
///
/// Nothing touches the network until the configuration has been validated.
///
/// # Errors
///
/// Returns the first failing stage as a [`SendError`].
pub async fn run<R>(args: &Args, body: &mut R) -> Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let config = Configuration::load(&args.config).await?;
    config.validate()?;

    let client = connect(&config).await?;

    let headers = Headers {
        from: &config.from,
        to: &args.to,
        subject: &args.subject,
    };
    transmit(client, &headers, body).await?;

    Ok(())
}
