//! Host-side collaborators invoked by a sweep.
//!
//! The sweep never compiles anything itself. It asks a [`FileProbe`] whether a
//! target exists and hands existing files to a [`CompilePrimitive`].

use std::fmt;
use std::fs::File;
use std::path::Path;

/// A compile primitive's rejection of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileFailure {
    /// The primitive's own description of the failure.
    pub message: String,
}

impl CompileFailure {
    /// Creates a failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CompileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CompileFailure {}

/// Compiles one file into a process-wide shared cache.
///
/// Implementations own their synchronization: in parallel sweeps `compile`
/// is called from several threads at once.
pub trait CompilePrimitive: Sync {
    /// Compiles the file at `path`, an absolute path known to exist.
    fn compile(&self, path: &Path) -> Result<(), CompileFailure>;
}

impl<F> CompilePrimitive for F
where
    F: Fn(&Path) -> Result<(), CompileFailure> + Sync,
{
    fn compile(&self, path: &Path) -> Result<(), CompileFailure> {
        self(path)
    }
}

/// Answers whether a path is an existing, readable file.
pub trait FileProbe: Sync {
    /// Returns `true` if `path` can be opened for reading and is a regular file.
    fn is_readable_file(&self, path: &Path) -> bool;
}

/// [`FileProbe`] backed by the filesystem.
///
/// Symlinks are followed. Anything that cannot be opened (missing, permission
/// denied, dangling link) counts as not found, as do directories and special
/// files. The file type is checked before opening, since opening a FIFO blocks
/// until a writer appears.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn is_readable_file(&self, path: &Path) -> bool {
        let is_file = std::fs::metadata(path).is_ok_and(|m| m.is_file());
        is_file && File::open(path).is_ok()
    }
}
