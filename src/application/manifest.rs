//! Manifest Emitter
//!
//! Walks the finished package tree and renders the manifest document listing
//! every file once with its path, size and digest.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::entities::{FileRecord, PackageIdentity, Software};
use crate::domain::ports::{Clock, SystemClock};
use crate::domain::value_objects::{ContentDigest, TemplateRole};
use crate::error::{PackagerError, PackagerResult};
use crate::infrastructure::{write_atomic, DigestWalker};
use crate::template::{PreparedTemplate, Renderer};

/// Context the manifest template renders against
#[derive(Debug, Clone, Serialize)]
pub struct ManifestContext<'a> {
    pub account_id: &'a str,
    pub created: String,
    pub software: &'a Software,
    pub checksum_algorithm: &'static str,
    pub files: &'a [FileRecord],
}

impl<'a> ManifestContext<'a> {
    pub fn new(identity: &'a PackageIdentity, files: &'a [FileRecord]) -> Self {
        Self {
            account_id: &identity.account_id,
            created: identity.created_iso(),
            software: &identity.software,
            checksum_algorithm: ContentDigest::ALGORITHM,
            files,
        }
    }
}

/// Emits `<account_id>.manifest.xml` at the package root
#[derive(Debug, Clone)]
pub struct ManifestEmitter {
    template: PreparedTemplate,
    clock: Arc<dyn Clock>,
}

impl ManifestEmitter {
    pub fn new(template: PreparedTemplate) -> Self {
        Self {
            template,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Output path of the manifest for `identity` under `root`
    pub fn output_path(root: &Path, identity: &PackageIdentity) -> PathBuf {
        root.join(TemplateRole::Manifest.output_file_name(&identity.account_id))
    }

    /// Render the manifest text for the tree under `root`
    ///
    /// The manifest's own file is excluded from the listing so that re-running
    /// over an unchanged tree lists the same files.
    pub fn render(&self, root: &Path, identity: &PackageIdentity) -> PackagerResult<String> {
        let file_name = TemplateRole::Manifest.output_file_name(&identity.account_id);
        let walker = DigestWalker::new(root)?.exclude(file_name);
        let files = walker.collect_records()?;

        let context = ManifestContext::new(identity, &files);
        let renderer = Renderer::new(Arc::clone(&self.clock));
        Ok(renderer.render(&self.template, &context)?)
    }

    /// Render and atomically write the manifest; returns the written path
    pub fn emit(&self, root: &Path, identity: &PackageIdentity) -> PackagerResult<PathBuf> {
        let text = self.render(root, identity)?;
        let path = Self::output_path(root, identity);
        write_atomic(&path, &text).map_err(|source| PackagerError::Write {
            path: path.clone(),
            source,
        })?;
        info!("Wrote manifest {}", path.display());
        Ok(path)
    }
}
