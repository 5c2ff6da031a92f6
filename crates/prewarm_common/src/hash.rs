//! Content hashing for compiled artifact keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 digest of a file's bytes.
///
/// Used as the content-addressed key of a compiled artifact: two sources with
/// the same `ContentHash` share one artifact in the shared cache. Serializes
/// as its 32-character hex form so the JSON manifest stays readable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ContentHash(u128);

/// A string that is not a 32-digit hex content hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a 32-digit hex content hash")]
pub struct InvalidHash(String);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(data))
    }

    /// Returns the hash as a lowercase hex string, suitable as a file stem.
    pub fn to_hex(&self) -> String {
        format!("{:032x}", self.0)
    }

    /// Parses the form produced by [`to_hex`](Self::to_hex).
    pub fn from_hex(hex: &str) -> Result<Self, InvalidHash> {
        if hex.len() != 32 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidHash(hex.to_string()));
        }
        u128::from_str_radix(hex, 16)
            .map(Self)
            .map_err(|_| InvalidHash(hex.to_string()))
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.to_hex()
    }
}

impl TryFrom<String> for ContentHash {
    type Error = InvalidHash;

    fn try_from(hex: String) -> Result<Self, Self::Error> {
        Self::from_hex(&hex)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:08x}..)", self.0 >> 96)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_source_same_key() {
        let a = ContentHash::from_bytes(b"<?php echo 1;");
        let b = ContentHash::from_bytes(b"<?php echo 1;");
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), b.to_hex());
    }

    #[test]
    fn edited_source_changes_key() {
        let a = ContentHash::from_bytes(b"<?php echo 1;");
        let b = ContentHash::from_bytes(b"<?php echo 2;");
        assert_ne!(a, b);
    }

    #[test]
    fn hex_is_32_chars_and_parses_back() {
        let h = ContentHash::from_bytes(b"wp-load.php");
        let s = h.to_hex();
        assert_eq!(s.len(), 32);
        assert_eq!(ContentHash::from_hex(&s).unwrap(), h);
        assert_eq!(h.to_string(), s);
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(ContentHash::from_hex("abc").is_err());
        assert!(ContentHash::from_hex(&"g".repeat(32)).is_err());
        assert!(ContentHash::from_hex(&format!("+{}", "0".repeat(31))).is_err());
    }

    #[test]
    fn debug_is_abbreviated() {
        let s = format!("{:?}", ContentHash::from_bytes(b"test"));
        assert!(s.starts_with("ContentHash("));
        assert!(s.ends_with("..)"));
    }

    #[test]
    fn json_is_the_hex_string() {
        let h = ContentHash::from_bytes(b"manifest entry");
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", h.to_hex()));
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
