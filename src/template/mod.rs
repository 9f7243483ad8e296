//! Templates: loading, preprocessing and rendering
//!
//! Templates are written with `%%` block markers and `<!--# ... #-->` build
//! comments. `Template::prepare` runs the preprocessor and yields a
//! `PreparedTemplate` in engine syntax, which a `Renderer` evaluates.

pub mod escaping;
pub mod lexer;
pub mod preprocess;
pub mod render;
pub mod wellformed;

use std::path::Path;

use crate::domain::value_objects::TemplateRole;

pub use preprocess::{preprocess, PreprocessError};
pub use render::{RenderError, Renderer};

const BUILTIN_METS: &str = include_str!("../../templates/mets.xml");
const BUILTIN_MANIFEST: &str = include_str!("../../templates/manifest.xml");

/// Raw template text tagged with its logical role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    role: TemplateRole,
    source: String,
}

impl Template {
    pub fn new(name: impl Into<String>, role: TemplateRole, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role,
            source: source.into(),
        }
    }

    /// Built-in template for a role
    pub fn builtin(role: TemplateRole) -> Self {
        let source = match role {
            TemplateRole::Mets => BUILTIN_METS,
            TemplateRole::Manifest => BUILTIN_MANIFEST,
        };
        Self::new(format!("builtin:{}", role), role, source)
    }

    /// Read a template file; the file name becomes the template name
    pub fn load(path: &Path, role: TemplateRole) -> std::io::Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, role, source))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> TemplateRole {
        self.role
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Preprocess into engine syntax
    pub fn prepare(&self) -> Result<PreparedTemplate, PreprocessError> {
        let source = preprocess(&self.name, &self.source)?;
        Ok(PreparedTemplate::new(self.name.clone(), self.role, source))
    }
}

/// Template text already rewritten into engine syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTemplate {
    name: String,
    role: TemplateRole,
    source: String,
}

impl PreparedTemplate {
    pub fn new(name: impl Into<String>, role: TemplateRole, source: String) -> Self {
        Self {
            name: name.into(),
            role,
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> TemplateRole {
        self.role
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builtin_templates_preprocess() {
        for role in [TemplateRole::Mets, TemplateRole::Manifest] {
            let prepared = Template::builtin(role).prepare().unwrap();
            assert!(!prepared.source().contains("%%"));
            assert!(!prepared.source().contains("<!--#"));
            assert_eq!(prepared.role(), role);
        }
    }

    #[test]
    fn load_uses_file_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom_mets.xml");
        std::fs::write(&path, "<mets/>").unwrap();

        let template = Template::load(&path, TemplateRole::Mets).unwrap();
        assert_eq!(template.name(), "custom_mets.xml");
        assert_eq!(template.source(), "<mets/>");
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let err = Template::load(&dir.path().join("nope.xml"), TemplateRole::Manifest).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
