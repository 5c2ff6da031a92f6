//! Errors raised while reading a sweep configuration.

use std::io;
use std::path::PathBuf;

/// Why a `prewarm.toml` could not be turned into a usable sweep.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The content is not TOML of the expected shape.
    #[error("{origin}: {message}")]
    Parse {
        /// File path, or `<inline>` for configurations parsed from a string.
        origin: String,
        /// Parser message, including the offending line.
        message: String,
    },

    /// A required key is absent.
    #[error("missing required field `{0}`")]
    MissingField(String),

    /// A key is present but its value cannot be used.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Dotted key path, e.g. `sweep.targets[2]`.
        field: String,
        /// What is wrong with the value.
        reason: String,
    },

    /// Relative paths could not be anchored.
    #[error("cannot determine the current directory: {0}")]
    WorkingDir(#[source] io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
