//! Configuration validation.

use super::model::Configuration;

/// Validation error for the relay configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Sender address is empty.
    EmptyFrom,
    /// Server host is empty.
    EmptyHost,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyFrom => "from field empty",
            Self::EmptyHost => "no host specified",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration.
///
/// Only the fields needed to start a transaction are checked; the host is
/// not parsed and addresses are not inspected.
///
/// # Errors
///
/// Returns the first missing field, `from` before `server.host`.
pub fn validate_config(config: &Configuration) -> Result<(), ValidationError> {
    if config.from.is_empty() {
        return Err(ValidationError::EmptyFrom);
    }
    if config.server.host.is_empty() {
        return Err(ValidationError::EmptyHost);
    }
    Ok(())
}
