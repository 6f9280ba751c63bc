//! Relay configuration: model, loading, and validation.

mod model;
mod validation;

pub use model::{Configuration, DEFAULT_CONFIG_PATH, PlainAuth, Server};
pub use validation::{ValidationError, validate_config};

use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while reading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("open {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// File is not valid YAML for the model.
    #[error("{0}")]
    Parse(#[from] serde_yaml::Error),

    /// A required field is missing.
    #[error("{0}")]
    Invalid(#[from] ValidationError),
}

impl Configuration {
    /// Reads and parses the configuration file at `path`.
    ///
    /// The result is not validated; call [`Configuration::validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_yaml(&contents)?;
        tracing::debug!(path = %path.display(), host = %config.server.host, "configuration loaded");
        Ok(config)
    }

    /// Parses a configuration document. An empty document yields the
    /// default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Checks that the fields required to send are present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first missing field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self).map_err(ConfigError::from)
    }
}
