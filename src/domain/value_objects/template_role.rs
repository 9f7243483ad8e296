//! Template role - the logical purpose of a template

use serde::{Deserialize, Serialize};

/// Which document a template produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateRole {
    /// Descriptive / provenance METS document
    Mets,
    /// File manifest with checksums
    Manifest,
}

impl TemplateRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateRole::Mets => "mets",
            TemplateRole::Manifest => "manifest",
        }
    }

    /// Output file name for an account, e.g. `acct001.mets.xml`
    ///
    /// The two roles use distinct suffixes so their outputs never collide.
    pub fn output_file_name(&self, account_id: &str) -> String {
        format!("{}.{}.xml", account_id, self.as_str())
    }
}

impl std::fmt::Display for TemplateRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
