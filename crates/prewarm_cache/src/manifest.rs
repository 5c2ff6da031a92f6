//! Cache manifest mapping source files to their compiled artifacts.
//!
//! Stored as `manifest.json` in the cache directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use prewarm_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Name of the manifest file within the cache directory.
const MANIFEST_FILE: &str = "manifest.json";

/// Index of every source compiled into the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheManifest {
    /// Tool version that produced this cache. A different version starts fresh.
    pub tool_version: String,

    /// Per-source entries keyed by absolute source path.
    pub files: BTreeMap<PathBuf, CachedFile>,
}

/// The cached state of one compiled source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedFile {
    /// Content hash of the source when it was compiled; also the artifact key.
    pub content_hash: ContentHash,

    /// Source size in bytes.
    pub size: u64,
}

impl CacheManifest {
    /// Creates an empty manifest for the given tool version.
    pub fn new(tool_version: &str) -> Self {
        Self {
            tool_version: tool_version.to_string(),
            files: BTreeMap::new(),
        }
    }

    /// Reads `manifest.json` from the cache directory.
    ///
    /// A missing or unparsable manifest reads as `None`; the caller starts a
    /// fresh one and the old artifacts are simply rewritten.
    pub fn load(cache_dir: &Path) -> Option<Self> {
        let bytes = std::fs::read(cache_dir.join(MANIFEST_FILE)).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Writes `manifest.json`, creating the cache directory if needed.
    ///
    /// The file is replaced by rename, so a process that starts while another
    /// is saving sees either the old manifest or the new one.
    pub fn save(&self, cache_dir: &Path) -> Result<(), CacheError> {
        std::fs::create_dir_all(cache_dir).map_err(|source| CacheError::Io {
            path: cache_dir.to_path_buf(),
            source,
        })?;
        let json = serde_json::to_vec_pretty(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;

        let target = cache_dir.join(MANIFEST_FILE);
        let staging = cache_dir.join(format!("{MANIFEST_FILE}.{}.tmp", std::process::id()));
        std::fs::write(&staging, json).map_err(|source| CacheError::Io {
            path: staging.clone(),
            source,
        })?;
        std::fs::rename(&staging, &target).map_err(|source| {
            let _ = std::fs::remove_file(&staging);
            CacheError::Io {
                path: target.clone(),
                source,
            }
        })
    }

    /// Returns `true` if this manifest was written by `tool_version`.
    pub fn is_compatible(&self, tool_version: &str) -> bool {
        self.tool_version == tool_version
    }
}
