//! Error types for the packager
//!
//! Each subsystem owns its error enum; `PackagerError` wraps them for the
//! orchestration layer and the binary.

use std::path::PathBuf;
use thiserror::Error;

use crate::infrastructure::WalkError;
use crate::parser::{DescriptiveError, ProvenanceError};
use crate::template::{PreprocessError, RenderError};

/// Result type alias for packager operations
pub type PackagerResult<T> = Result<T, PackagerError>;

/// Main error type for packager operations
#[derive(Error, Debug)]
pub enum PackagerError {
    /// Walking or digesting the package tree failed
    #[error(transparent)]
    Walk(#[from] WalkError),

    /// Provenance log is invalid
    #[error(transparent)]
    Provenance(#[from] ProvenanceError),

    /// Descriptive workbook is invalid
    #[error(transparent)]
    Descriptive(#[from] DescriptiveError),

    /// Template markers or build comments are invalid
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    /// Template evaluation or output check failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing an output document failed
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is invalid
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// The AIP folder for this account already exists
    #[error("AIP already exists: {path}")]
    AipExists { path: PathBuf },

    /// Template file not found
    #[error("template not found: {path}")]
    TemplateNotFound { path: PathBuf },
}
