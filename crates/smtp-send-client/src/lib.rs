//! # smtp-send-client
//!
//! A small SMTP client for delivering one message per connection.
//!
//! ## Features
//!
//! - **Type-state connection management**: Compile-time enforcement of the
//!   MAIL → RCPT → DATA order
//! - **Transports**: plain TCP and implicit TLS, with optional certificate
//!   verification
//! - **Authentication**: PLAIN, only over TLS or to the local machine
//! - **Streaming DATA**: bodies are dot-stuffed on the fly, so any
//!   [`AsyncRead`](tokio::io::AsyncRead) can be copied into a message
//!
//! ## Quick Start
//!
//! ```ignore
//! use smtp_send_client::{Address, Client};
//! use smtp_send_client::connection::connect_tls;
//!
//! #[tokio::main]
//! async fn main() -> smtp_send_client::Result<()> {
//!     let stream = connect_tls("smtp.example.com:465", "smtp.example.com", true).await?;
//!     let client = Client::from_stream(stream, "smtp.example.com").await?;
//!     let client = client.hello("localhost").await?;
//!     let client = client
//!         .auth_plain("user@example.com", "password", "smtp.example.com")
//!         .await?;
//!
//!     let client = client.mail_from(Address::new("sender@example.com")?).await?;
//!     let client = client.rcpt_to(Address::new("recipient@example.com")?).await?;
//!     let mut client = client.data().await?;
//!
//!     client.write(b"Subject: Test\r\n\r\n").await?;
//!     client.copy_from(&mut tokio::io::stdin()).await?;
//!
//!     client.finish().await?.quit().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Connection States
//!
//! ```text
//! ┌──────────────┐
//! │  Connected   │ ─── hello() / auth_plain() ───→ Connected
//! └──────────────┘
//!        │
//!        └─── mail_from() ───→ MailTransaction ───→ RecipientAdded ───→ Data
//!                                                                        │
//!                                        Connected ←─── finish() ────────┘
//! ```
//!
//! ## Modules
//!
//! - [`command`]: SMTP command builders
//! - [`connection`]: Connection management and type-state client
//! - [`parser`]: Reply parser
//! - [`types`]: Core SMTP types (addresses, extensions, replies)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use connection::{Client, Connected, Data, MailTransaction, RecipientAdded, SmtpStream};
pub use error::{Error, Result};
pub use types::{Address, AuthMechanism, Extension, Reply, ReplyCode};
