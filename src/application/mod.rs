//! Application Layer
//!
//! Use cases that orchestrate the packaging flow. Parsing, walking and
//! rendering live in `parser`, `infrastructure` and `template`; this layer
//! sequences them and decides what a failure means for each output.
//!
//! ## Use Cases
//!
//! - `Packager` - full run: inputs, AIP structure, METS, manifest
//! - `ManifestEmitter` - manifest for an existing package tree
//! - `AipMaker` - folder structure and data transfer

pub mod aip;
pub mod manifest;
pub mod package;

pub use aip::{AipMaker, TransferLog, TransferStats};
pub use manifest::{ManifestContext, ManifestEmitter};
pub use package::{load_template, DocumentOutcome, PackageOptions, PackageReport, Packager};
