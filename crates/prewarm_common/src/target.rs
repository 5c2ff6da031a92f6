//! Validated precompile targets.
//!
//! A [`Target`] is a POSIX-style path relative to the sweep's base directory.
//! Lists are often written with a leading slash (`/wp-load.php`) because the
//! host concatenates them onto the base path; leading slashes are stripped so
//! that `/wp-load.php` and `wp-load.php` name the same target.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Reasons a string cannot be used as a [`Target`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    /// The path is empty (or consists only of slashes and `.` segments).
    #[error("empty target path")]
    Empty,

    /// The path contains a NUL byte.
    #[error("target path '{0}' contains a NUL byte")]
    NulByte(String),

    /// The path contains a `..` segment and could escape the base directory.
    #[error("target path '{0}' escapes the base directory")]
    EscapesBase(String),
}

/// A file scheduled for precompilation, relative to the base directory.
///
/// Stored in normalized form: no leading slash, no empty or `.` segments.
/// Immutable once constructed.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target(String);

impl Target {
    /// Validates and normalizes a target path.
    pub fn new(raw: &str) -> Result<Self, TargetError> {
        if raw.contains('\0') {
            return Err(TargetError::NulByte(raw.replace('\0', "\\0")));
        }

        let mut segments = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(TargetError::EscapesBase(raw.to_string())),
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Err(TargetError::Empty);
        }
        Ok(Self(segments.join("/")))
    }

    /// Builds a target from a path already known to be below `base`.
    ///
    /// Returns `None` if `path` is not inside `base` or is not valid UTF-8.
    pub fn from_path_under(base: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(base).ok()?;
        let parts: Option<Vec<&str>> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect();
        Self::new(&parts?.join("/")).ok()
    }

    /// Returns the normalized relative path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves this target against a base directory.
    pub fn resolve(&self, base: &Path) -> PathBuf {
        let mut full = base.to_path_buf();
        for segment in self.0.split('/') {
            full.push(segment);
        }
        full
    }
}

impl TryFrom<String> for Target {
    type Error = TargetError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(&raw)
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target({:?})", self.0)
    }
}
