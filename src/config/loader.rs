//! Configuration loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::value_objects::TransferMode;
use crate::error::{PackagerError, PackagerResult};

use super::types::Config;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "packager.toml";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "AIP_PACKAGER_";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Keys accepted in each table; `""` is the top level
const KNOWN_KEYS: &[(&str, &[&str])] = &[
    ("", &["software", "templates", "transfer", "output"]),
    ("software", &["name", "version"]),
    ("templates", &["mets", "manifest"]),
    ("transfer", &["mode"]),
    ("output", &["mets", "manifest"]),
];

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> PackagerResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut ignored: Vec<String> = Vec::new();
    let config: Config =
        serde_ignored::deserialize(toml::de::Deserializer::new(&content), |p| {
            ignored.push(p.to_string());
        })
        .map_err(|e| PackagerError::Config {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let warnings = ignored
        .iter()
        .map(|dotted| {
            let (table, key) = dotted.rsplit_once('.').unwrap_or(("", dotted.as_str()));
            ConfigWarning {
                key: key.to_string(),
                file: path.to_path_buf(),
                line: key_line(&content, table, key),
                suggestion: suggest_key(table, key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load the explicit file, the default file, or defaults; then apply env
pub fn load_or_default(explicit: Option<&Path>) -> PackagerResult<(Config, Vec<ConfigWarning>)> {
    let (config, warnings) = match explicit {
        Some(path) => load_with_warnings(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                load_with_warnings(default_path)?
            } else {
                debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                (Config::default(), Vec::new())
            }
        }
    };
    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides (AIP_PACKAGER_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_overrides_from(config, |name| std::env::var(format!("{}{}", ENV_PREFIX, name)).ok())
}

/// Apply overrides from `lookup`, which maps an unprefixed variable name
/// (`TRANSFER_MODE`) to its value
pub fn with_overrides_from(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    // AIP_PACKAGER_TRANSFER_MODE
    if let Some(mode) = lookup("TRANSFER_MODE") {
        match TransferMode::parse(&mode) {
            Some(mode) => config.transfer.mode = mode,
            None => warn!("Ignoring {}TRANSFER_MODE='{}' (expected copy or move)", ENV_PREFIX, mode),
        }
    }

    // AIP_PACKAGER_METS_TEMPLATE
    if let Some(path) = lookup("METS_TEMPLATE") {
        config.templates.mets = Some(PathBuf::from(path));
    }

    // AIP_PACKAGER_MANIFEST_TEMPLATE
    if let Some(path) = lookup("MANIFEST_TEMPLATE") {
        config.templates.manifest = Some(PathBuf::from(path));
    }

    // AIP_PACKAGER_SOFTWARE_NAME
    if let Some(name) = lookup("SOFTWARE_NAME") {
        config.software.name = Some(name);
    }

    config
}

/// Line of `key` inside `[table]` (or of the `[key]` header at top level)
fn key_line(content: &str, table: &str, key: &str) -> Option<usize> {
    let mut current = "";
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let header = header.trim();
            if table.is_empty() && header == key {
                return Some(i + 1);
            }
            current = header;
            continue;
        }
        let assigned = line.split('=').next().map(str::trim);
        if current == table && assigned == Some(key) {
            return Some(i + 1);
        }
    }
    None
}

/// Closest key valid in `table`, if it is within two edits
fn suggest_key(table: &str, unknown: &str) -> Option<String> {
    let (_, candidates) = KNOWN_KEYS.iter().find(|(t, _)| *t == table)?;
    candidates
        .iter()
        .map(|candidate| (edit_distance(unknown, candidate), *candidate))
        .filter(|(distance, _)| *distance <= 2)
        .min()
        .map(|(_, candidate)| candidate.to_string())
}

/// Levenshtein distance over chars, one row at a time
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = (above + 1)
                .min(row[j] + 1)
                .min(diagonal + usize::from(ca != *cb));
            diagonal = above;
        }
    }

    row[b.len()]
}
