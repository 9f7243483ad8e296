//! File record entity
//!
//! One record per regular file under the package root, created during a walk.
//! Identity is the relative path.

use serde::Serialize;

use crate::domain::value_objects::ContentDigest;

/// A digested file inside the package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Path relative to the package root, `/`-separated
    pub path: String,
    /// Final path component
    pub basename: String,
    /// Size in bytes
    pub size: u64,
    /// Media type guessed from the extension, `application/octet-stream` when unknown
    pub mimetype: String,
    /// SHA-256 of the content
    pub digest: ContentDigest,
    /// Last modification time, UTC ISO-8601
    pub modified: String,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, size: u64, digest: ContentDigest, modified: String) -> Self {
        let path = path.into();
        let basename = path.rsplit('/').next().unwrap_or(path.as_str()).to_string();
        let mimetype = mime_guess::from_path(&basename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            path,
            basename,
            size,
            mimetype,
            digest,
            modified,
        }
    }

    /// Relative directory containing this file (`""` for the root)
    pub fn parent(&self) -> &str {
        self.path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }
}
