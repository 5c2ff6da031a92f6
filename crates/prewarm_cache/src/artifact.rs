//! Content-addressed storage for compiled sources.
//!
//! A compiled source lives at `<cache_dir>/compiled/<hash>.bin`, where the
//! hash is the XXH3-128 of the source bytes. On disk an artifact is a 4-byte
//! little-endian header length, a bincode-encoded [`ArtifactHeader`], and the
//! payload.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use prewarm_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Magic bytes identifying a prewarm cache artifact.
const MAGIC: [u8; 4] = *b"PWRM";

/// Bumped whenever the header or payload layout changes.
const FORMAT_VERSION: u32 = 1;

const SUBDIR: &str = "compiled";
const EXT: &str = "bin";

/// Header prepended to every artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    /// Must equal `b"PWRM"`.
    pub magic: [u8; 4],
    /// Layout version of this artifact.
    pub format_version: u32,
    /// Version of the tool that compiled the payload.
    pub tool_version: String,
    /// Length of the payload in bytes.
    pub payload_len: u64,
    /// Hash of the payload, checked on every read.
    pub checksum: ContentHash,
}

/// Serializes a payload with its header into the on-disk layout.
pub fn encode_artifact(payload: &[u8], tool_version: &str) -> Result<Vec<u8>, CacheError> {
    let header = ArtifactHeader {
        magic: MAGIC,
        format_version: FORMAT_VERSION,
        tool_version: tool_version.to_string(),
        payload_len: payload.len() as u64,
        checksum: ContentHash::from_bytes(payload),
    };
    let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
        .map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
    let header_len = u32::try_from(header_bytes.len()).map_err(|_| CacheError::Serialization {
        reason: "artifact header too large".to_string(),
    })?;

    let mut out = Vec::with_capacity(4 + header_bytes.len() + payload.len());
    out.extend_from_slice(&header_len.to_le_bytes());
    out.extend_from_slice(&header_bytes);
    out.extend_from_slice(payload);
    Ok(out)
}

/// Splits raw artifact bytes into a header and a verified payload.
///
/// Returns `None` for anything truncated, foreign, from another format
/// version, or failing its checksum.
pub fn decode_artifact(raw: &[u8]) -> Option<(ArtifactHeader, &[u8])> {
    let (len_bytes, rest) = raw.split_first_chunk::<4>()?;
    let header_len = u32::from_le_bytes(*len_bytes) as usize;
    if rest.len() < header_len {
        return None;
    }
    let (header_bytes, payload) = rest.split_at(header_len);
    let (header, _): (ArtifactHeader, usize) =
        bincode::serde::decode_from_slice(header_bytes, bincode::config::standard()).ok()?;

    let valid = header.magic == MAGIC
        && header.format_version == FORMAT_VERSION
        && header.payload_len == payload.len() as u64
        && ContentHash::from_bytes(payload) == header.checksum;
    valid.then_some((header, payload))
}

/// The directory of compiled artifacts inside a cache.
///
/// Each write lands in a uniquely named temporary file and is renamed into
/// place, so concurrent writers of one key never expose a torn artifact.
pub struct ArtifactStore {
    dir: PathBuf,
    tmp_counter: AtomicU64,
}

impl ArtifactStore {
    /// Creates a store under `cache_dir`. Nothing is created on disk until the first write.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            dir: cache_dir.join(SUBDIR),
            tmp_counter: AtomicU64::new(0),
        }
    }

    /// Path of the artifact for `key`.
    pub fn path_for(&self, key: &ContentHash) -> PathBuf {
        self.dir.join(format!("{}.{EXT}", key.to_hex()))
    }

    /// Stores `payload` under `key`, replacing any previous artifact.
    pub fn write(
        &self,
        key: &ContentHash,
        payload: &[u8],
        tool_version: &str,
    ) -> Result<PathBuf, CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let bytes = encode_artifact(payload, tool_version)?;

        let path = self.path_for(key);
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .dir
            .join(format!("{}.{}-{n}.tmp", key.to_hex(), std::process::id()));
        std::fs::write(&tmp, &bytes).map_err(|source| CacheError::Io {
            path: tmp.clone(),
            source,
        })?;
        if let Err(source) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(CacheError::Io { path, source });
        }
        Ok(path)
    }

    /// Reads and verifies the artifact for `key`. Any defect reads as a miss.
    pub fn read(&self, key: &ContentHash) -> Option<Vec<u8>> {
        let raw = std::fs::read(self.path_for(key)).ok()?;
        decode_artifact(&raw).map(|(_, payload)| payload.to_vec())
    }
}
