//! `host:port` splitting.

/// Why a server address could not be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HostParseErrorKind {
    /// No port after the host.
    #[error("missing port in address")]
    MissingPort,
    /// Unbracketed host contains a colon.
    #[error("too many colons in address")]
    TooManyColons,
    /// `[` without a matching `]`.
    #[error("missing ']' in address")]
    MissingBracket,
    /// Stray `[`.
    #[error("unexpected '[' in address")]
    UnexpectedOpenBracket,
    /// Stray `]`.
    #[error("unexpected ']' in address")]
    UnexpectedCloseBracket,
}

/// Server address that is not of the form `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("address {addr}: {kind}")]
pub struct HostParseError {
    /// Address as configured.
    pub addr: String,
    /// What is wrong with it.
    pub kind: HostParseErrorKind,
}

/// Splits `host:port`, `[v6-host]:port`, or `[host%zone]:port` into host and
/// port. Neither part is otherwise checked; the host may be empty.
///
/// # Errors
///
/// Returns an error if the address is not of one of those forms.
pub fn split_host_port(hostport: &str) -> Result<(&str, &str), HostParseError> {
    let fail = |kind| HostParseError {
        addr: hostport.to_string(),
        kind,
    };

    let Some(colon) = hostport.rfind(':') else {
        return Err(fail(HostParseErrorKind::MissingPort));
    };

    // Brackets are only allowed around the host: none may appear after the
    // opening one, and no ']' after the closing one.
    let (host, open_from, close_from) = if hostport.starts_with('[') {
        let Some(close) = hostport.find(']') else {
            return Err(fail(HostParseErrorKind::MissingBracket));
        };
        if close + 1 == hostport.len() {
            return Err(fail(HostParseErrorKind::MissingPort));
        }
        if close + 1 != colon {
            // Either ']' is followed by a colon that is not the last one, or
            // by something other than a colon
            return Err(fail(if hostport.as_bytes()[close + 1] == b':' {
                HostParseErrorKind::TooManyColons
            } else {
                HostParseErrorKind::MissingPort
            }));
        }
        (&hostport[1..close], 1, close + 1)
    } else {
        let host = &hostport[..colon];
        if host.contains(':') {
            return Err(fail(HostParseErrorKind::TooManyColons));
        }
        (host, 0, 0)
    };

    if hostport[open_from..].contains('[') {
        return Err(fail(HostParseErrorKind::UnexpectedOpenBracket));
    }
    if hostport[close_from..].contains(']') {
        return Err(fail(HostParseErrorKind::UnexpectedCloseBracket));
    }

    Ok((host, &hostport[colon + 1..]))
}
