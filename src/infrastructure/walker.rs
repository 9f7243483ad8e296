//! Digest walker
//!
//! Walks a package root and yields one `FileRecord` per regular file, in
//! deterministic depth-first order with siblings sorted by name (so `a/1.txt`
//! comes before `a.txt` and `b.txt`). Nothing is filtered: hidden files and
//! ignore files are part of the package like anything else.
//!
//! Symbolic links are never followed out of the root. A link to a regular file
//! inside the root is recorded under the link's own path; a link to a directory
//! is not descended.

use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use ignore::WalkBuilder;
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::domain::entities::FileRecord;
use crate::domain::value_objects::ContentDigest;

/// Errors raised while walking or digesting
#[derive(Error, Debug)]
pub enum WalkError {
    /// Package root does not exist or is not a directory
    #[error("package root not found: {path}")]
    RootNotFound { path: PathBuf },

    /// A symbolic link resolves outside the package root
    #[error("path '{path}' escapes package root '{root}' (links to '{target}')")]
    PathEscape {
        path: PathBuf,
        target: PathBuf,
        root: PathBuf,
    },

    /// A file could not be read or stat'ed
    #[error("unreadable file {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The same relative path was produced twice
    #[error("file '{path}' listed more than once")]
    DuplicateRecord { path: String },

    /// Directory traversal failed
    #[error("walk failed: {0}")]
    Walk(#[from] ignore::Error),
}

/// A regular file found by the walk, not yet digested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Where the content is read from (the link target for symlinks)
    pub content_path: PathBuf,
    /// Path relative to the root, `/`-separated
    pub relative: String,
}

/// Walks one package root
#[derive(Debug, Clone)]
pub struct DigestWalker {
    root: PathBuf,
    exclude: BTreeSet<String>,
}

impl DigestWalker {
    /// Create a walker for `root`
    ///
    /// The root is canonicalized so that link targets can be checked against it.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, WalkError> {
        let root = root.as_ref();
        let canonical = root
            .canonicalize()
            .map_err(|_| WalkError::RootNotFound {
                path: root.to_path_buf(),
            })?;
        if !canonical.is_dir() {
            return Err(WalkError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        Ok(Self {
            root: canonical,
            exclude: BTreeSet::new(),
        })
    }

    /// Skip a relative path (used for the walker's own output documents)
    pub fn exclude(mut self, relative: impl Into<String>) -> Self {
        self.exclude.insert(relative.into());
        self
    }

    /// Canonical root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily enumerate regular files in walk order, without reading them
    pub fn files(&self) -> impl Iterator<Item = Result<WalkedFile, WalkError>> + '_ {
        WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
            .filter_map(move |entry| self.classify(entry).transpose())
    }

    /// Lazily digest files one at a time in walk order
    pub fn records(&self) -> impl Iterator<Item = Result<FileRecord, WalkError>> + '_ {
        self.files().map(|file| file.and_then(|f| digest_file(&f)))
    }

    /// Digest every file, in parallel, returning records in walk order
    ///
    /// Fails on the first walk or read error; a partial listing is never returned.
    pub fn collect_records(&self) -> Result<Vec<FileRecord>, WalkError> {
        let files: Vec<WalkedFile> = self.files().collect::<Result<_, _>>()?;
        debug!("Digesting {} files under {}", files.len(), self.root.display());

        let records: Vec<FileRecord> = files
            .par_iter()
            .map(digest_file)
            .collect::<Result<_, _>>()?;

        ensure_unique(&records)?;
        Ok(records)
    }

    fn classify(
        &self,
        entry: Result<ignore::DirEntry, ignore::Error>,
    ) -> Result<Option<WalkedFile>, WalkError> {
        let entry = entry?;
        if entry.depth() == 0 {
            return Ok(None);
        }

        let path = entry.path();
        let relative = relative_path(&self.root, path);
        if self.exclude.contains(&relative) {
            debug!("Excluded from walk: {}", relative);
            return Ok(None);
        }

        let Some(file_type) = entry.file_type() else {
            return Ok(None);
        };

        if file_type.is_symlink() {
            let target = path
                .canonicalize()
                .map_err(|source| WalkError::UnreadableFile {
                    path: path.to_path_buf(),
                    source,
                })?;
            if !target.starts_with(&self.root) {
                return Err(WalkError::PathEscape {
                    path: path.to_path_buf(),
                    target,
                    root: self.root.clone(),
                });
            }
            if !target.is_file() {
                debug!("Not descending into linked directory: {}", relative);
                return Ok(None);
            }
            return Ok(Some(WalkedFile {
                content_path: target,
                relative,
            }));
        }

        if file_type.is_file() {
            return Ok(Some(WalkedFile {
                content_path: path.to_path_buf(),
                relative,
            }));
        }

        Ok(None)
    }
}

/// Stat and digest one walked file
pub fn digest_file(file: &WalkedFile) -> Result<FileRecord, WalkError> {
    let unreadable = |source| WalkError::UnreadableFile {
        path: file.content_path.clone(),
        source,
    };

    let metadata = std::fs::metadata(&file.content_path).map_err(unreadable)?;
    let modified = metadata.modified().map_err(unreadable)?;
    let handle = File::open(&file.content_path).map_err(unreadable)?;
    let digest = ContentDigest::from_reader(handle).map_err(unreadable)?;

    debug!("Digested {} ({} bytes)", file.relative, metadata.len());

    Ok(FileRecord::new(
        file.relative.clone(),
        metadata.len(),
        digest,
        DateTime::<Utc>::from(modified).to_rfc3339_opts(SecondsFormat::Secs, true),
    ))
}

fn ensure_unique(records: &[FileRecord]) -> Result<(), WalkError> {
    let mut seen = BTreeSet::new();
    for record in records {
        if !seen.insert(record.path.as_str()) {
            return Err(WalkError::DuplicateRecord {
                path: record.path.clone(),
            });
        }
    }
    Ok(())
}

/// `/`-joined path of `path` below `root`
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
