//! The built-in compile primitive: compile into the on-disk shared cache.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use prewarm_common::ContentHash;
use prewarm_sweep::{CompileFailure, CompilePrimitive};

use crate::artifact::ArtifactStore;
use crate::error::CacheError;
use crate::manifest::{CacheManifest, CachedFile};

/// Compiles sources into a shared, content-addressed artifact cache.
///
/// Safe to call from parallel sweeps: the artifact store writes atomically
/// and the manifest is guarded by a mutex. The manifest is only written to
/// disk by [`save`](Self::save), which the host calls once after the sweep.
pub struct StoreCompiler {
    cache_dir: PathBuf,
    store: ArtifactStore,
    manifest: Mutex<CacheManifest>,
    tool_version: String,
    require_utf8: bool,
}

impl StoreCompiler {
    /// Opens the cache at `cache_dir`, or starts a fresh one.
    ///
    /// An existing manifest is reused only if it was written by the same
    /// tool version; anything else starts an empty manifest.
    pub fn open(cache_dir: &Path, tool_version: &str, require_utf8: bool) -> Self {
        let manifest = CacheManifest::load(cache_dir)
            .filter(|m| m.is_compatible(tool_version))
            .unwrap_or_else(|| CacheManifest::new(tool_version));

        Self {
            cache_dir: cache_dir.to_path_buf(),
            store: ArtifactStore::new(cache_dir),
            manifest: Mutex::new(manifest),
            tool_version: tool_version.to_string(),
            require_utf8,
        }
    }

    /// Persists the manifest.
    pub fn save(&self) -> Result<(), CacheError> {
        self.lock_manifest().save(&self.cache_dir)
    }

    /// Returns a snapshot of the manifest.
    pub fn manifest(&self) -> CacheManifest {
        self.lock_manifest().clone()
    }

    /// Loads the compiled form of `source` from the cache.
    ///
    /// Returns `None` if the source was never compiled or its artifact fails
    /// validation.
    pub fn load(&self, source: &Path) -> Option<Vec<u8>> {
        let key = self.lock_manifest().files.get(source)?.content_hash;
        self.store.read(&key)
    }

    fn lock_manifest(&self) -> MutexGuard<'_, CacheManifest> {
        self.manifest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CompilePrimitive for StoreCompiler {
    fn compile(&self, path: &Path) -> Result<(), CompileFailure> {
        let source = std::fs::read(path)
            .map_err(|e| CompileFailure::new(format!("cannot read source: {e}")))?;

        if self.require_utf8 {
            if let Err(e) = std::str::from_utf8(&source) {
                return Err(CompileFailure::new(format!(
                    "invalid UTF-8 after byte {}",
                    e.valid_up_to()
                )));
            }
        }

        let content_hash = ContentHash::from_bytes(&source);
        let artifact = self
            .store
            .write(&content_hash, &source, &self.tool_version)
            .map_err(|e| CompileFailure::new(e.to_string()))?;

        log::trace!("cached {} as {}", path.display(), artifact.display());
        self.lock_manifest().files.insert(
            path.to_path_buf(),
            CachedFile {
                content_hash,
                size: source.len() as u64,
            },
        );
        Ok(())
    }
}
