//! In-process SMTP server for integration tests.
//!
//! Accepts a single connection, answers with canned replies, and records
//! what the client sent.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;
use tokio_rustls::rustls::ServerConfig;

const CERT_PEM: &[u8] = include_bytes!("../fixtures/cert.pem");
const KEY_PEM: &[u8] = include_bytes!("../fixtures/key.pem");

/// Everything the client sent during one session.
#[derive(Debug, Default)]
pub struct Transcript {
    /// Command lines, without CRLF.
    pub commands: Vec<String>,
    /// DATA payload with dot-stuffing undone, without the end marker.
    pub data: Vec<u8>,
}

impl Transcript {
    /// Returns the command verbs in order.
    pub fn verbs(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|c| c.split([' ', ':']).next().unwrap_or_default().to_uppercase())
            .collect()
    }
}

/// Canned replies.
#[derive(Debug, Clone)]
pub struct Behaviour {
    /// Extension lines advertised after EHLO.
    pub extensions: Vec<&'static str>,
    /// Reply to AUTH.
    pub auth_reply: &'static str,
    /// Reply to MAIL FROM.
    pub mail_reply: &'static str,
    /// Reply to RCPT TO.
    pub rcpt_reply: &'static str,
    /// Reply after the end-of-data marker.
    pub data_end_reply: &'static str,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
            auth_reply: "235 2.7.0 Authentication successful\r\n",
            mail_reply: "250 2.1.0 Ok\r\n",
            rcpt_reply: "250 2.1.5 Ok\r\n",
            data_end_reply: "250 2.0.0 Ok: queued\r\n",
        }
    }
}

/// Starts a plain-text server on `127.0.0.1`.
pub async fn spawn(behaviour: Behaviour) -> (SocketAddr, JoinHandle<Transcript>) {
    spawn_inner(behaviour, None).await
}

/// Starts an implicit-TLS server on `127.0.0.1` presenting the
/// `mail.example.org` fixture certificate, issued by a test CA nobody trusts.
pub async fn spawn_tls(behaviour: Behaviour) -> (SocketAddr, JoinHandle<Transcript>) {
    spawn_inner(behaviour, Some(tls_acceptor())).await
}

/// Writes `yaml` to a temporary config file.
pub fn config_file(yaml: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smtp-send.yaml");
    std::fs::write(&path, yaml).unwrap();
    (dir, path)
}

async fn spawn_inner(
    behaviour: Behaviour,
    tls: Option<TlsAcceptor>,
) -> (SocketAddr, JoinHandle<Transcript>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        match tls {
            Some(acceptor) => match acceptor.accept(socket).await {
                Ok(stream) => serve(stream, &behaviour).await,
                // Client refused our certificate
                Err(_) => Transcript::default(),
            },
            None => serve(socket, &behaviour).await,
        }
    });

    (addr, handle)
}

fn tls_acceptor() -> TlsAcceptor {
    let certs = rustls_pemfile::certs(&mut &CERT_PEM[..])
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let key = rustls_pemfile::private_key(&mut &KEY_PEM[..])
        .unwrap()
        .expect("fixture key");

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .unwrap();
    TlsAcceptor::from(Arc::new(config))
}

async fn serve<S>(stream: S, behaviour: &Behaviour) -> Transcript
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut transcript = Transcript::default();
    let mut stream = BufReader::new(stream);

    if reply(&mut stream, "220 fake.test ESMTP ready\r\n").await.is_err() {
        return transcript;
    }

    let mut line = Vec::new();
    loop {
        line.clear();
        match stream.read_until(b'\n', &mut line).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let command = String::from_utf8_lossy(&line).trim_end().to_string();
        let verb = command
            .split([' ', ':'])
            .next()
            .unwrap_or_default()
            .to_uppercase();
        transcript.commands.push(command);

        let answer = match verb.as_str() {
            "EHLO" => ehlo_reply(&behaviour.extensions),
            "HELO" => "250 fake.test\r\n".to_string(),
            "AUTH" => behaviour.auth_reply.to_string(),
            "MAIL" => behaviour.mail_reply.to_string(),
            "RCPT" => behaviour.rcpt_reply.to_string(),
            "DATA" => {
                if reply(&mut stream, "354 End data with <CR><LF>.<CR><LF>\r\n")
                    .await
                    .is_err()
                {
                    break;
                }
                read_data(&mut stream, &mut transcript.data).await;
                behaviour.data_end_reply.to_string()
            }
            "QUIT" => {
                let _ = reply(&mut stream, "221 2.0.0 Bye\r\n").await;
                break;
            }
            _ => "502 5.5.2 Command not recognized\r\n".to_string(),
        };

        if reply(&mut stream, &answer).await.is_err() {
            break;
        }
    }

    transcript
}

fn ehlo_reply(extensions: &[&str]) -> String {
    let mut lines = vec!["fake.test"];
    lines.extend_from_slice(extensions);

    let last = lines.len() - 1;
    lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let sep = if i == last { ' ' } else { '-' };
            format!("250{sep}{text}\r\n")
        })
        .collect()
}

async fn read_data<S>(stream: &mut BufReader<S>, data: &mut Vec<u8>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut line = Vec::new();
    loop {
        line.clear();
        match stream.read_until(b'\n', &mut line).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        if line == b".\r\n" {
            return;
        }
        data.extend_from_slice(line.strip_prefix(b".").unwrap_or(&line));
    }
}

async fn reply<S>(stream: &mut BufReader<S>, text: &str) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.get_mut().write_all(text.as_bytes()).await?;
    stream.get_mut().flush().await
}
