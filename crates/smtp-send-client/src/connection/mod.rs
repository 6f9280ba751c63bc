//! SMTP connection management with type-state pattern.

mod client;
mod data;
mod stream;
mod tls;

pub use client::{Client, Connected, Data, MailTransaction, RecipientAdded};
pub use data::DotEncoder;
pub use stream::{SmtpStream, connect, connect_tls};

use crate::types::Extension;
use std::collections::HashSet;

/// What the client knows about the server it is talking to.
#[derive(Debug, Clone, Default)]
pub(crate) struct ServerInfo {
    /// Server hostname from greeting.
    pub hostname: String,
    /// Host the connection was opened to.
    pub server_name: String,
    /// Whether the connection is TLS-encrypted.
    pub tls: bool,
    /// Supported extensions.
    pub extensions: HashSet<Extension>,
}

impl ServerInfo {
    /// Checks if the server supports an extension.
    #[must_use]
    pub(crate) fn supports(&self, ext: &Extension) -> bool {
        self.extensions.contains(ext)
    }
}
