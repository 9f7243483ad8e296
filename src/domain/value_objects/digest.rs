//! Content Digest Value Object
//!
//! A validated, immutable SHA-256 digest of a file's byte content.
//! Used by the manifest so that every listed file can be independently verified.

use std::fmt;
use std::io::{self, Read};

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Read buffer size for streaming digests.
const CHUNK_SIZE: usize = 64 * 1024;

/// Content digest value object
///
/// Wraps a lower-case hex SHA-256 string (64 characters, no prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Algorithm name as written into the manifest.
    pub const ALGORITHM: &'static str = "SHA-256";

    /// Hex length of a SHA-256 digest.
    pub const HEX_LEN: usize = 64;

    /// Compute the digest of an in-memory byte slice
    pub fn from_bytes(content: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(content)))
    }

    /// Compute the digest of a reader in fixed-size chunks
    ///
    /// Memory use is bounded by `CHUNK_SIZE` regardless of the stream length.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buf[..n]);
        }
        Ok(Self(format!("{:x}", hasher.finalize())))
    }

    /// Accept an existing hex digest (e.g. from a stored manifest)
    pub fn parse(hex: &str) -> Option<Self> {
        let hex = hex.trim().to_ascii_lowercase();
        if hex.len() == Self::HEX_LEN && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(hex))
        } else {
            None
        }
    }

    /// Get the hex string
    pub fn hex(&self) -> &str {
        &self.0
    }

    /// First `len` hex digits, used for short identifiers
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContentDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
