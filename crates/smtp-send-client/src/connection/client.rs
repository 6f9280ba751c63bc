//! Type-state SMTP client.

use super::data::DotEncoder;
use super::{ServerInfo, SmtpStream};
use crate::command::Command;
use crate::error::{Error, Result};
use crate::parser::{is_last_reply_line, parse_reply};
use crate::types::{Address, AuthMechanism, Extension, Reply, ReplyCode};
use base64::Engine;
use std::collections::HashSet;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

/// Chunk size used when streaming message bodies.
const COPY_BUFFER_SIZE: usize = 8 * 1024;

/// Type-state marker for connected state (greeted, no transaction open).
#[derive(Debug)]
pub struct Connected;

/// Type-state marker for mail transaction started.
#[derive(Debug)]
pub struct MailTransaction;

/// Type-state marker for recipient added.
#[derive(Debug)]
pub struct RecipientAdded;

/// Type-state for data mode.
#[derive(Debug)]
pub struct Data {
    encoder: DotEncoder,
    written: u64,
}

/// SMTP client with type-state pattern.
#[derive(Debug)]
pub struct Client<State> {
    stream: SmtpStream,
    server_info: ServerInfo,
    state: State,
}

impl Client<Connected> {
    /// Creates a client from a stream and reads the `220` server greeting.
    ///
    /// `server_name` is the host the stream was opened to. It is what
    /// authentication is bound to.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the greeting fails or if the server does
    /// not greet with `220`.
    pub async fn from_stream(mut stream: SmtpStream, server_name: &str) -> Result<Self> {
        let greeting = read_reply(&mut stream)
            .await?
            .require(ReplyCode::SERVICE_READY)?;

        // Extract hostname from greeting (first word after code)
        let hostname = greeting
            .message
            .first()
            .and_then(|msg| msg.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string();
        debug!(%hostname, "received SMTP greeting");

        Ok(Self {
            server_info: ServerInfo {
                hostname,
                server_name: server_name.to_string(),
                tls: stream.is_tls(),
                extensions: HashSet::new(),
            },
            stream,
            state: Connected,
        })
    }

    /// Sends EHLO and discovers server capabilities, falling back to HELO
    /// when the server rejects EHLO.
    ///
    /// # Errors
    ///
    /// Returns an error if both greetings fail.
    pub async fn hello(mut self, local_name: &str) -> Result<Self> {
        if local_name.contains(['\r', '\n']) {
            return Err(Error::Protocol(
                "a line must not contain CR or LF".into(),
            ));
        }

        let reply = self
            .send_command(Command::Ehlo {
                hostname: local_name.to_string(),
            })
            .await?;

        if reply.is_success() {
            // Skip the first line, which is the server greeting
            self.server_info.extensions = reply
                .message
                .iter()
                .skip(1)
                .map(String::as_str)
                .map(Extension::parse)
                .collect();
            return Ok(self);
        }

        debug!(code = %reply.code, "EHLO rejected, falling back to HELO");
        let reply = self
            .send_command(Command::Helo {
                hostname: local_name.to_string(),
            })
            .await?;

        if !reply.is_success() {
            return Err(Error::smtp_error(reply.code.as_u16(), reply.message_text()));
        }

        self.server_info.extensions.clear();
        Ok(self)
    }

    /// Authenticates using the PLAIN mechanism.
    ///
    /// `AUTH PLAIN` is sent whether or not EHLO advertised AUTH. `host` must
    /// be the host the client was opened to. Credentials are only sent over
    /// TLS or to the local machine.
    ///
    /// # Errors
    ///
    /// Returns an error if sending credentials would be unsafe or if the
    /// server rejects them.
    pub async fn auth_plain(mut self, username: &str, password: &str, host: &str) -> Result<Self> {
        if !self.server_info.tls && !is_localhost(&self.server_info.server_name) {
            return Err(Error::AuthRefused("unencrypted connection".into()));
        }
        if self.server_info.server_name != host {
            return Err(Error::AuthRefused("wrong host name".into()));
        }

        // Build PLAIN response: \0username\0password
        let credentials = format!("\0{username}\0{password}");
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());

        let cmd = Command::Auth {
            mechanism: AuthMechanism::Plain,
            initial_response: Some(encoded),
        };

        self.send_command(cmd)
            .await?
            .require(ReplyCode::AUTH_SUCCESS)?;
        debug!(%username, "authenticated");

        Ok(self)
    }

    /// Starts a mail transaction.
    ///
    /// `BODY=8BITMIME` and `SMTPUTF8` are requested when the server
    /// advertised them.
    ///
    /// # Errors
    ///
    /// Returns an error if the MAIL FROM command fails.
    pub async fn mail_from(mut self, from: Address) -> Result<Client<MailTransaction>> {
        let cmd = Command::MailFrom {
            from,
            body: self
                .server_info
                .supports(&Extension::EightBitMime)
                .then(|| "8BITMIME".to_string()),
            smtputf8: self.server_info.supports(&Extension::SmtpUtf8),
        };
        let reply = self.send_command(cmd).await?;

        if !reply.is_success() {
            return Err(Error::smtp_error(reply.code.as_u16(), reply.message_text()));
        }

        Ok(self.into_state(MailTransaction))
    }
}

impl Client<MailTransaction> {
    /// Adds the recipient to the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the RCPT TO command fails.
    pub async fn rcpt_to(mut self, to: Address) -> Result<Client<RecipientAdded>> {
        let reply = self.send_command(Command::RcptTo { to }).await?;

        if !reply.is_success() {
            return Err(Error::smtp_error(reply.code.as_u16(), reply.message_text()));
        }

        Ok(self.into_state(RecipientAdded))
    }
}

impl Client<RecipientAdded> {
    /// Begins sending message data.
    ///
    /// # Errors
    ///
    /// Returns an error if the DATA command is not answered with `354`.
    pub async fn data(mut self) -> Result<Client<Data>> {
        self.send_command(Command::Data)
            .await?
            .require(ReplyCode::START_DATA)?;

        Ok(self.into_state(Data {
            encoder: DotEncoder::new(),
            written: 0,
        }))
    }
}

impl Client<Data> {
    /// Writes message bytes.
    ///
    /// Leading dots are doubled and bare LF is sent as CRLF; nothing else
    /// about the bytes is changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write(&mut self, buf: &[u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let mut wire = Vec::with_capacity(buf.len() + 16);
        self.state.encoder.encode(buf, &mut wire);
        self.stream.write_all(&wire).await?;
        self.state.written += buf.len() as u64;
        Ok(())
    }

    /// Copies everything from `reader` into the message, returning the
    /// number of bytes read.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub async fn copy_from<R>(&mut self, reader: &mut R) -> Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        let mut total = 0u64;
        loop {
            let read = reader.read(&mut buf).await?;
            if read == 0 {
                break;
            }
            self.write(&buf[..read]).await?;
            total += read as u64;
        }
        Ok(total)
    }

    /// Ends the message and waits for the server to accept it with `250`.
    ///
    /// # Errors
    ///
    /// Returns an error if sending the end marker fails or the server answers
    /// with anything but `250`.
    pub async fn finish(mut self) -> Result<Client<Connected>> {
        let mut wire = Vec::with_capacity(5);
        self.state.encoder.finish(&mut wire);
        self.stream.write_all(&wire).await?;

        let reply = read_reply(&mut self.stream)
            .await?
            .require(ReplyCode::OK)?;
        debug!(bytes = self.state.written, reply = %reply.message_text(), "message accepted");

        Ok(self.into_state(Connected))
    }
}

// Common implementation for all states
impl<S> Client<S> {
    fn into_state<T>(self, state: T) -> Client<T> {
        Client {
            stream: self.stream,
            server_info: self.server_info,
            state,
        }
    }

    async fn send_command(&mut self, cmd: Command) -> Result<Reply> {
        debug!(command = cmd.verb(), "sending SMTP command");
        let data = cmd.serialize();
        self.stream.write_all(&data).await?;
        let reply = read_reply(&mut self.stream).await?;
        debug!(code = %reply.code, "received SMTP reply");
        Ok(reply)
    }

    /// Sends QUIT and closes the connection (available in any state).
    ///
    /// # Errors
    ///
    /// Returns an error if the QUIT command fails.
    pub async fn quit(mut self) -> Result<()> {
        let reply = self.send_command(Command::Quit).await?;

        if !reply.is_success() && reply.code != ReplyCode::CLOSING {
            return Err(Error::smtp_error(reply.code.as_u16(), reply.message_text()));
        }

        Ok(())
    }
}

async fn read_reply(stream: &mut SmtpStream) -> Result<Reply> {
    let mut lines = Vec::new();
    loop {
        let line = stream.read_line().await?;
        if line.is_empty() {
            continue;
        }

        let is_last = is_last_reply_line(&line);
        lines.push(line);

        if is_last {
            break;
        }
    }

    parse_reply(&lines)
}

fn is_localhost(name: &str) -> bool {
    matches!(name, "localhost" | "127.0.0.1" | "::1")
}
