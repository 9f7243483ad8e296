//! AIP structure maker
//!
//! Builds `<destination>/<account_id>/` from a source folder laid out as
//!
//! ```text
//! source/
//!   pst/<account_id>.pst
//!   mime/<account_id>/...
//!   eaxs/<account_id>/...
//!   metadata/<account_id>/...
//!   <account_id>.<ext>          (stray metadata files)
//! ```
//!
//! Every transfer is recorded as attempted and then passed or failed; a failed
//! transfer is logged and does not abort the remaining ones.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::value_objects::TransferMode;
use crate::error::{PackagerError, PackagerResult};

/// Sub-folders of an AIP
pub const PST_DIR: &str = "pst";
pub const MIME_DIR: &str = "mime";
pub const EAXS_DIR: &str = "eaxs";
pub const METADATA_DIR: &str = "metadata";

/// Which source entries a group transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Select {
    /// Files directly in the folder whose stem is the account id
    AccountFiles,
    /// Everything in the folder
    Contents,
}

/// Log of attempted transfers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferLog {
    pub attempted: Vec<PathBuf>,
    pub passed: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl TransferLog {
    pub fn stats(&self) -> TransferStats {
        TransferStats {
            attempted: self.attempted.len(),
            passed: self.passed.len(),
            failed: self.failed.len(),
        }
    }
}

/// Transfer counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransferStats {
    pub attempted: usize,
    pub passed: usize,
    pub failed: usize,
}

impl std::fmt::Display for TransferStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "attempted: {}, passed: {}, failed: {}",
            self.attempted, self.passed, self.failed
        )
    }
}

/// Creates the folder structure of one account's AIP
#[derive(Debug, Clone)]
pub struct AipMaker {
    account_id: String,
    source: PathBuf,
    destination: PathBuf,
    root: PathBuf,
    mode: TransferMode,
    transfers: TransferLog,
}

impl AipMaker {
    /// Both `source` and `destination` must be existing directories
    pub fn new(
        account_id: impl Into<String>,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        mode: TransferMode,
    ) -> PackagerResult<Self> {
        let account_id = account_id.into();
        let source = source.into();
        let destination = destination.into();

        for dir in [&source, &destination] {
            if !dir.is_dir() {
                return Err(PackagerError::DirectoryNotFound { path: dir.clone() });
            }
        }

        let root = destination.join(&account_id);
        Ok(Self {
            account_id,
            source,
            destination,
            root,
            mode,
            transfers: TransferLog::default(),
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// `<destination>/<account_id>`
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn transfers(&self) -> &TransferLog {
        &self.transfers
    }

    pub fn stats(&self) -> TransferStats {
        self.transfers.stats()
    }

    /// Whether source and destination are the same folder
    pub fn is_in_place(&self) -> bool {
        match (self.source.canonicalize(), self.destination.canonicalize()) {
            (Ok(source), Ok(destination)) => source == destination,
            _ => self.source == self.destination,
        }
    }

    /// Create the AIP folder and transfer the account's data into it
    ///
    /// A no-op when source and destination are the same folder.
    pub fn make(&mut self) -> PackagerResult<()> {
        if self.is_in_place() {
            info!("Source and destination are the same; no data will be transferred");
            return Ok(());
        }

        if self.root.exists() {
            return Err(PackagerError::AipExists {
                path: self.root.clone(),
            });
        }

        info!("Creating AIP structure at {}", self.root.display());
        fs::create_dir(&self.root)?;

        let groups = [
            (self.source.join(PST_DIR), PST_DIR, Select::AccountFiles),
            (self.source.join(MIME_DIR).join(&self.account_id), MIME_DIR, Select::Contents),
            (self.source.join(EAXS_DIR).join(&self.account_id), EAXS_DIR, Select::Contents),
            (
                self.source.join(METADATA_DIR).join(&self.account_id),
                METADATA_DIR,
                Select::Contents,
            ),
            (self.source.clone(), METADATA_DIR, Select::AccountFiles),
        ];

        for (source, folder, select) in groups {
            let destination = self.root.join(folder);
            self.transfer_group(&source, &destination, select)?;
        }

        info!("Transfer stats: {}", self.stats());
        Ok(())
    }

    /// Whether the AIP looks complete: every transfer passed and `mime/` and
    /// `eaxs/` exist and are non-empty
    pub fn validate(&self) -> bool {
        if !self.root.is_dir() {
            warn!("AIP root {} does not exist", self.root.display());
            return false;
        }

        let mut valid = true;

        if !self.transfers.failed.is_empty() || self.transfers.attempted != self.transfers.passed {
            warn!("Failed transfers: {:?}", self.transfers.failed);
            valid = false;
        }

        for folder in [MIME_DIR, EAXS_DIR] {
            let path = self.root.join(folder);
            if !path.is_dir() {
                warn!("Missing required folder: {}", path.display());
                valid = false;
            } else if is_empty_dir(&path) {
                warn!("No data in required folder: {}", path.display());
                valid = false;
            } else {
                debug!("Found data in required folder: {}", path.display());
            }
        }

        if valid {
            info!("AIP structure appears to be valid");
        } else {
            warn!("AIP structure appears to be invalid");
        }
        valid
    }

    fn transfer_group(
        &mut self,
        source: &Path,
        destination: &Path,
        select: Select,
    ) -> PackagerResult<()> {
        if !source.is_dir() {
            debug!("No source folder {}; skipping", source.display());
            return Ok(());
        }

        let items = self.candidates(source, select)?;
        if items.is_empty() {
            debug!("No candidate data in {}", source.display());
            return Ok(());
        }

        if !destination.is_dir() {
            fs::create_dir(destination)?;
        }

        for item in items {
            self.transfers.attempted.push(item.clone());
            let Some(name) = item.file_name() else {
                continue;
            };
            let target = destination.join(name);
            info!("{} {} -> {}", self.mode, item.display(), target.display());
            match transfer(&item, &target, self.mode) {
                Ok(()) => self.transfers.passed.push(item),
                Err(e) => {
                    warn!("Cannot {} {}: {}", self.mode, item.display(), e);
                    self.transfers.failed.push(item);
                }
            }
        }

        if select == Select::Contents && self.mode == TransferMode::Move {
            remove_if_empty(source);
        }
        Ok(())
    }

    fn candidates(&self, source: &Path, select: Select) -> io::Result<Vec<PathBuf>> {
        let mut items = Vec::new();
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            let path = entry.path();
            let keep = match select {
                Select::Contents => true,
                Select::AccountFiles => {
                    entry.file_type()?.is_file()
                        && path.extension().is_some()
                        && path.file_stem().is_some_and(|stem| stem == self.account_id.as_str())
                }
            };
            if keep {
                items.push(path);
            }
        }
        items.sort();
        Ok(items)
    }
}

/// Copy or move one file or folder
fn transfer(source: &Path, target: &Path, mode: TransferMode) -> io::Result<()> {
    match mode {
        TransferMode::Copy => copy_recursive(source, target),
        TransferMode::Move => match fs::rename(source, target) {
            Ok(()) => Ok(()),
            Err(e) => {
                // Cross-device rename; fall back to copy then delete.
                debug!("rename failed ({}); copying instead", e);
                copy_recursive(source, target)?;
                if source.is_dir() {
                    fs::remove_dir_all(source)
                } else {
                    fs::remove_file(source)
                }
            }
        },
    }
}

fn copy_recursive(source: &Path, target: &Path) -> io::Result<()> {
    if source.is_dir() {
        fs::create_dir_all(target)?;
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &target.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(source, target).map(|_| ())
    }
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}

fn remove_if_empty(folder: &Path) {
    if !is_empty_dir(folder) {
        warn!("Not removing non-empty folder {}", folder.display());
        return;
    }
    if let Err(e) = fs::remove_dir(folder) {
        warn!("Cannot remove folder {}: {}", folder.display(), e);
    }
}
