//! Package use case
//!
//! Orchestrates one full run:
//!
//! 1. parse the provenance log and the descriptive workbook
//! 2. make the AIP structure (optional)
//! 3. walk the package tree and assemble the `PackageContext`
//! 4. render and write `<account_id>.mets.xml`
//! 5. walk again and write `<account_id>.manifest.xml`
//!
//! Input errors in step 1 abort the run before anything is written. After
//! that, each document succeeds or fails on its own and the report says which.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::domain::entities::{
    DescriptiveRecord, PackageContext, PackageIdentity, ProvenanceLog, Software,
};
use crate::domain::ports::{Clock, SystemClock};
use crate::domain::value_objects::{TemplateRole, TransferMode};
use crate::error::{PackagerError, PackagerResult};
use crate::infrastructure::{write_atomic, DigestWalker};
use crate::parser::{parse_log_file, parse_workbook};
use crate::template::{PreparedTemplate, Renderer, Template};

use super::aip::{AipMaker, TransferStats};
use super::manifest::ManifestEmitter;

/// Options for one packaging run
#[derive(Debug, Clone)]
pub struct PackageOptions {
    pub account_id: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Provenance log
    pub events: Option<PathBuf>,
    /// Descriptive workbook
    pub rdf: Option<PathBuf>,
    pub mets_template: Option<PathBuf>,
    pub manifest_template: Option<PathBuf>,
    pub mode: TransferMode,
    pub emit_mets: bool,
    pub emit_manifest: bool,
    pub make_structure: bool,
    pub software: Software,
}

impl PackageOptions {
    pub fn new(
        account_id: impl Into<String>,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            source: source.into(),
            destination: destination.into(),
            events: None,
            rdf: None,
            mets_template: None,
            manifest_template: None,
            mode: TransferMode::default(),
            emit_mets: true,
            emit_manifest: true,
            make_structure: true,
            software: Software::default(),
        }
    }

    /// Options seeded from configuration
    pub fn from_config(
        account_id: impl Into<String>,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        config: &Config,
    ) -> Self {
        let mut options = Self::new(account_id, source, destination);
        options.mets_template = config.template_path(TemplateRole::Mets).map(Path::to_path_buf);
        options.manifest_template = config
            .template_path(TemplateRole::Manifest)
            .map(Path::to_path_buf);
        options.mode = config.transfer.mode;
        options.emit_mets = config.emits(TemplateRole::Mets);
        options.emit_manifest = config.emits(TemplateRole::Manifest);
        options.software = config.software();
        options
    }

    pub fn with_events(mut self, events: Option<PathBuf>) -> Self {
        self.events = events;
        self
    }

    pub fn with_rdf(mut self, rdf: Option<PathBuf>) -> Self {
        self.rdf = rdf;
        self
    }

    pub fn with_mode(mut self, mode: TransferMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_structure(mut self, make_structure: bool) -> Self {
        self.make_structure = make_structure;
        self
    }

    /// Template path for a role, `None` for the built-in one
    pub fn template_path(&self, role: TemplateRole) -> Option<&Path> {
        match role {
            TemplateRole::Mets => self.mets_template.as_deref(),
            TemplateRole::Manifest => self.manifest_template.as_deref(),
        }
    }

    pub fn emits(&self, role: TemplateRole) -> bool {
        match role {
            TemplateRole::Mets => self.emit_mets,
            TemplateRole::Manifest => self.emit_manifest,
        }
    }
}

/// What happened to one output document
#[derive(Debug)]
pub enum DocumentOutcome {
    Written(PathBuf),
    Skipped,
    Failed(PackagerError),
}

impl DocumentOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, DocumentOutcome::Failed(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            DocumentOutcome::Written(path) => Some(path),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PackagerError> {
        match self {
            DocumentOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    fn from_result(role: TemplateRole, result: PackagerResult<PathBuf>) -> Self {
        match result {
            Ok(path) => {
                info!("Wrote {} document {}", role, path.display());
                DocumentOutcome::Written(path)
            }
            Err(error) => {
                warn!("Cannot produce {} document: {}", role, error);
                DocumentOutcome::Failed(error)
            }
        }
    }
}

/// Result of a packaging run
#[derive(Debug)]
pub struct PackageReport {
    /// Package root, `<destination>/<account_id>`
    pub root: PathBuf,
    /// Transfer counts when the structure was made
    pub transfers: Option<TransferStats>,
    /// Structure validity when the structure was made
    pub structure_valid: Option<bool>,
    pub mets: DocumentOutcome,
    pub manifest: DocumentOutcome,
}

impl PackageReport {
    /// No requested document failed
    pub fn is_success(&self) -> bool {
        !self.mets.is_failed() && !self.manifest.is_failed()
    }

    pub fn outcome(&self, role: TemplateRole) -> &DocumentOutcome {
        match role {
            TemplateRole::Mets => &self.mets,
            TemplateRole::Manifest => &self.manifest,
        }
    }
}

/// Parsed provenance and descriptive inputs
#[derive(Debug, Clone, Default)]
struct Inputs {
    provenance: ProvenanceLog,
    descriptive: Vec<DescriptiveRecord>,
}

/// Runs a full packaging pass
#[derive(Debug, Clone)]
pub struct Packager {
    options: PackageOptions,
    clock: Arc<dyn Clock>,
}

impl Packager {
    pub fn new(options: PackageOptions) -> Self {
        Self {
            options,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> &PackageOptions {
        &self.options
    }

    /// Run all steps; `Err` only for failures before any document is attempted
    pub fn run(&self) -> PackagerResult<PackageReport> {
        let options = &self.options;
        let inputs = self.read_inputs()?;

        let mut transfers = None;
        let mut structure_valid = None;
        let root = if options.make_structure {
            let mut maker = AipMaker::new(
                &options.account_id,
                &options.source,
                &options.destination,
                options.mode,
            )?;
            maker.make()?;
            let valid = maker.validate();
            if !valid {
                warn!("Invalid AIP structure; continuing");
            }
            transfers = Some(maker.stats());
            structure_valid = Some(valid);
            maker.root().to_path_buf()
        } else {
            options.destination.join(&options.account_id)
        };

        if !root.is_dir() {
            return Err(PackagerError::DirectoryNotFound { path: root });
        }

        let identity =
            PackageIdentity::created_now(&options.account_id, options.software.clone(), self.clock.as_ref());

        let mets = if options.emit_mets {
            DocumentOutcome::from_result(TemplateRole::Mets, self.write_mets(&root, identity.clone(), inputs))
        } else {
            DocumentOutcome::Skipped
        };

        let manifest = if options.emit_manifest {
            DocumentOutcome::from_result(TemplateRole::Manifest, self.write_manifest(&root, &identity))
        } else {
            DocumentOutcome::Skipped
        };

        Ok(PackageReport {
            root,
            transfers,
            structure_valid,
            mets,
            manifest,
        })
    }

    fn read_inputs(&self) -> PackagerResult<Inputs> {
        let mut inputs = Inputs::default();
        if let Some(path) = &self.options.events {
            inputs.provenance = parse_log_file(path)?;
            info!("Read {} provenance entries from {}", inputs.provenance.len(), path.display());
        }
        if let Some(path) = &self.options.rdf {
            inputs.descriptive = parse_workbook(path)?;
            info!("Read {} descriptive records from {}", inputs.descriptive.len(), path.display());
        }
        Ok(inputs)
    }

    fn write_mets(
        &self,
        root: &Path,
        identity: PackageIdentity,
        inputs: Inputs,
    ) -> PackagerResult<PathBuf> {
        let template = load_template(self.options.template_path(TemplateRole::Mets), TemplateRole::Mets)?;

        let mets_name = TemplateRole::Mets.output_file_name(&identity.account_id);
        let manifest_name = TemplateRole::Manifest.output_file_name(&identity.account_id);
        let files = DigestWalker::new(root)?
            .exclude(mets_name.clone())
            .exclude(manifest_name)
            .collect_records()?;

        let context = PackageContext::assemble(identity, files, inputs.provenance, inputs.descriptive)
            .with_clock(Arc::clone(&self.clock));
        let text = Renderer::for_context(&context).render(&template, &context)?;

        let path = root.join(mets_name);
        write_atomic(&path, &text).map_err(|source| PackagerError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    fn write_manifest(&self, root: &Path, identity: &PackageIdentity) -> PackagerResult<PathBuf> {
        let template = load_template(
            self.options.template_path(TemplateRole::Manifest),
            TemplateRole::Manifest,
        )?;
        ManifestEmitter::new(template)
            .with_clock(Arc::clone(&self.clock))
            .emit(root, identity)
    }
}

/// Load and preprocess the template at `path`, or the built-in one for `role`
pub fn load_template(path: Option<&Path>, role: TemplateRole) -> PackagerResult<PreparedTemplate> {
    let template = match path {
        Some(path) => Template::load(path, role).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PackagerError::TemplateNotFound {
                path: path.to_path_buf(),
            },
            _ => PackagerError::Io(e),
        })?,
        None => Template::builtin(role),
    };
    Ok(template.prepare()?)
}
