//! On-disk shared cache of compiled sources.
//!
//! [`StoreCompiler`] is a ready-made compile primitive for sweeps: it reads
//! each target, checks it, and writes it as a checksummed, content-addressed
//! artifact that any process sharing the cache directory can load without
//! touching the original file. A JSON manifest maps source paths to artifact
//! keys.

#![warn(missing_docs)]

pub mod artifact;
pub mod error;
pub mod manifest;
pub mod store;

pub use artifact::{decode_artifact, encode_artifact, ArtifactHeader, ArtifactStore};
pub use error::CacheError;
pub use manifest::{CacheManifest, CachedFile};
pub use store::StoreCompiler;
