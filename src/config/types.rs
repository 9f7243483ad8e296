//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::Software;
use crate::domain::value_objects::{TemplateRole, TransferMode};
use crate::error::PackagerResult;

use super::loader::{self, ConfigWarning};

/// Producing-software identity written into the documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

/// Template overrides; built-in templates are used when unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default)]
    pub mets: Option<PathBuf>,

    #[serde(default)]
    pub manifest: Option<PathBuf>,
}

/// How source files reach the AIP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferConfig {
    #[serde(default)]
    pub mode: TransferMode,
}

/// Which documents to emit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub mets: bool,

    #[serde(default = "default_true")]
    pub manifest: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mets: true,
            manifest: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub software: SoftwareConfig,

    #[serde(default)]
    pub templates: TemplatesConfig,

    #[serde(default)]
    pub transfer: TransferConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> PackagerResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> PackagerResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load `explicit` if given, else `packager.toml` in the working directory
    /// if present, else defaults; environment overrides applied last.
    pub fn load_or_default(explicit: Option<&Path>) -> PackagerResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(explicit)
    }

    /// Apply environment variable overrides (AIP_PACKAGER_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Software identity with crate defaults filled in
    pub fn software(&self) -> Software {
        let defaults = Software::default();
        Software {
            name: self.software.name.clone().unwrap_or(defaults.name),
            version: self.software.version.clone().unwrap_or(defaults.version),
        }
    }

    /// Configured template path for a role, if any
    pub fn template_path(&self, role: TemplateRole) -> Option<&Path> {
        match role {
            TemplateRole::Mets => self.templates.mets.as_deref(),
            TemplateRole::Manifest => self.templates.manifest.as_deref(),
        }
    }

    /// Whether a document is enabled
    pub fn emits(&self, role: TemplateRole) -> bool {
        match role {
            TemplateRole::Mets => self.output.mets,
            TemplateRole::Manifest => self.output.manifest,
        }
    }
}
