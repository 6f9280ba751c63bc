//! SMTP reply types.

/// SMTP reply from server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply code (e.g., 250).
    pub code: ReplyCode,
    /// Reply message lines.
    pub message: Vec<String>,
}

impl Reply {
    /// Creates a new reply.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec is not const-compatible
    pub fn new(code: ReplyCode, message: Vec<String>) -> Self {
        Self { code, message }
    }

    /// Returns true if this is a success reply (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Returns the full message on one line, joining continuation lines
    /// with a space.
    #[must_use]
    pub fn message_text(&self) -> String {
        self.message.join(" ")
    }

    /// Fails with [`Error::SmtpError`](crate::Error::SmtpError) unless the
    /// reply carries the expected code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code differs from `expected`.
    pub fn require(self, expected: ReplyCode) -> crate::Result<Self> {
        if self.code == expected {
            Ok(self)
        } else {
            Err(crate::Error::smtp_error(
                self.code.as_u16(),
                self.message_text(),
            ))
        }
    }
}

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// Creates a new reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true if this is a success code (2xx).
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }
}

impl std::fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Reply codes the client checks for
impl ReplyCode {
    /// 220 Service ready
    pub const SERVICE_READY: Self = Self(220);
    /// 221 Service closing transmission channel
    pub const CLOSING: Self = Self(221);
    /// 235 Authentication succeeded
    pub const AUTH_SUCCESS: Self = Self(235);
    /// 250 Requested mail action okay, completed
    pub const OK: Self = Self(250);
    /// 354 Start mail input
    pub const START_DATA: Self = Self(354);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ReplyCode::OK.is_success());
        assert!(ReplyCode::CLOSING.is_success());
        assert!(!ReplyCode::START_DATA.is_success());
        assert!(!ReplyCode::new(535).is_success());
    }

    #[test]
    fn display() {
        assert_eq!(ReplyCode::OK.to_string(), "250");
        assert_eq!(ReplyCode::new(554).to_string(), "554");
    }

    #[test]
    fn message_text_is_one_line() {
        let reply = Reply::new(
            ReplyCode::SERVICE_READY,
            vec!["mail.example.org ESMTP".to_string(), "Ready".to_string()],
        );
        assert_eq!(reply.message_text(), "mail.example.org ESMTP Ready");
        assert_eq!(Reply::new(ReplyCode::OK, vec![]).message_text(), "");
    }

    #[test]
    fn require_matching_code() {
        let reply = Reply::new(ReplyCode::START_DATA, vec!["go ahead".to_string()]);
        assert!(reply.require(ReplyCode::START_DATA).is_ok());
    }

    #[test]
    fn require_other_code_is_smtp_error() {
        let reply = Reply::new(ReplyCode::new(554), vec!["no thanks".to_string()]);
        let err = reply.require(ReplyCode::START_DATA).unwrap_err();
        assert_eq!(err.reply_code(), Some(554));
        assert_eq!(err.to_string(), "SMTP error 554: no thanks");
    }
}
