//! aip-packager - archival information packages for email accounts
//!
//! Moves an account's PST, MIME, EAXS and metadata files into a standard AIP
//! folder and writes two XML documents next to them: a METS file carrying
//! descriptive (Dublin Core) and provenance (PREMIS) metadata, and a manifest
//! listing every file with its SHA-256 digest.
//!
//! Templates use `%%` for block markers and `<!--# ... #-->` for comments that
//! never reach the output.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod parser;
pub mod template;

// Re-exports for convenience
pub use application::{DocumentOutcome, ManifestEmitter, PackageOptions, PackageReport, Packager};
pub use config::Config;
pub use domain::entities::{DescriptiveRecord, FileRecord, PackageContext, ProvenanceEntry, ProvenanceLog};
pub use error::{PackagerError, PackagerResult};
pub use infrastructure::DigestWalker;
pub use template::{preprocess, Renderer, Template};
