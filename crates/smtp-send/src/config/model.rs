//! Configuration data model.

use serde::Deserialize;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/go-smtp-send.yaml";

/// Relay configuration.
///
/// Every key is optional in the file; missing keys take their zero value
/// and [`Configuration::validate`](super::Configuration::validate) decides
/// what is actually required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// SMTP server settings.
    pub server: Server,
    /// Envelope sender and `From:` header value.
    pub from: String,
    /// Credentials for PLAIN authentication.
    pub auth: PlainAuth,
}

/// SMTP server settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Server {
    /// Server address as `host:port`.
    pub host: String,
    /// Wrap the connection in TLS from the start.
    pub tls: bool,
    /// Verify the server certificate when `tls` is set.
    #[serde(rename = "verify-tls")]
    pub verify_tls: bool,
}

/// Username and password for PLAIN authentication.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlainAuth {
    /// Username; empty disables authentication.
    #[serde(alias = "Username")]
    pub username: String,
    /// Password.
    #[serde(alias = "Password")]
    pub password: String,
}

impl PlainAuth {
    /// Returns the username if authentication is configured.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        (!self.username.is_empty()).then_some(self.username.as_str())
    }
}

impl std::fmt::Debug for PlainAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlainAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
