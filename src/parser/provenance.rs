//! Provenance log parser
//!
//! One record per line, `<ISO-8601 timestamp>: <mapping>`:
//!
//! ```text
//! 2020-01-01T00:00:00Z: {name: pst_to_mime, entity: event, agent: tomes_converter, object: acct001}
//! ```
//!
//! The mapping must carry `name` and `entity` (`agent`, `event` or `object`);
//! everything else is passed through untouched. Blank lines and lines starting
//! with `#` are skipped.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_yaml_ng::{Mapping, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::entities::{ProvenanceEntry, ProvenanceLog, TIMESTAMP_ATTRIBUTE};
use crate::domain::value_objects::EntityKind;

/// Provenance log failures; every variant names the file and 1-based line
#[derive(Error, Debug)]
pub enum ProvenanceError {
    /// Line is not `<timestamp>: <mapping>` structured text
    #[error("malformed log line in {file}:{line}: {message}")]
    MalformedLogLine {
        file: PathBuf,
        line: usize,
        message: String,
    },

    /// Required key absent (or null)
    #[error("missing required field '{field}' in {file}:{line}")]
    MissingField {
        field: String,
        file: PathBuf,
        line: usize,
    },

    /// Required field present but unusable (empty or not text)
    #[error("invalid field '{field}' in {file}:{line}: {reason}")]
    InvalidField {
        field: String,
        reason: String,
        file: PathBuf,
        line: usize,
    },

    /// `entity` is not one of the permitted kinds
    #[error("invalid entity '{entity}' in {file}:{line} (expected agent, event or object)")]
    InvalidEntity {
        entity: String,
        file: PathBuf,
        line: usize,
    },

    /// Key is not an ISO-8601 date or date-time
    #[error("invalid timestamp '{timestamp}' in {file}:{line}")]
    InvalidTimestamp {
        timestamp: String,
        file: PathBuf,
        line: usize,
    },

    /// Timestamp already used by an earlier line
    #[error("duplicate timestamp '{timestamp}' in {file}:{line} (first used at line {first_line})")]
    DuplicateKey {
        timestamp: String,
        file: PathBuf,
        line: usize,
        first_line: usize,
    },

    /// Log file could not be read
    #[error("cannot read provenance log {file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read and parse a provenance log file
pub fn parse_log_file(path: &Path) -> Result<ProvenanceLog, ProvenanceError> {
    let content = fs::read_to_string(path).map_err(|source| ProvenanceError::Io {
        file: path.to_path_buf(),
        source,
    })?;
    parse_log(&content, path)
}

/// Parse provenance log text; `file` is used in error messages only
pub fn parse_log(content: &str, file: &Path) -> Result<ProvenanceLog, ProvenanceError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut log = ProvenanceLog::new();
    let mut seen_keys: HashMap<String, usize> = HashMap::new();
    let mut seen_names: HashSet<(EntityKind, String)> = HashSet::new();

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let entry = parse_line(trimmed, file, line)?;

        if let Some(first_line) = seen_keys.get(entry.timestamp()) {
            return Err(ProvenanceError::DuplicateKey {
                timestamp: entry.timestamp().to_string(),
                file: file.to_path_buf(),
                line,
                first_line: *first_line,
            });
        }
        seen_keys.insert(entry.timestamp().to_string(), line);

        if !seen_names.insert((entry.kind(), entry.name().to_string())) {
            warn!(
                "{} '{}' appears more than once (line {}); lookups use the latest",
                entry.kind(),
                entry.name(),
                line
            );
        }

        debug!(
            "Stored {} '{}' at {}",
            entry.kind(),
            entry.name(),
            entry.timestamp()
        );
        log.push(entry);
    }

    Ok(log)
}

/// Parse one non-blank line into an entry
fn parse_line(text: &str, file: &Path, line: usize) -> Result<ProvenanceEntry, ProvenanceError> {
    let malformed = |message: String| ProvenanceError::MalformedLogLine {
        file: file.to_path_buf(),
        line,
        message,
    };

    let value: Value = serde_yaml_ng::from_str(text).map_err(|e| malformed(e.to_string()))?;
    let Value::Mapping(record) = value else {
        return Err(malformed(
            "expected '<timestamp>: <mapping>'".to_string(),
        ));
    };
    if record.len() != 1 {
        return Err(malformed(format!(
            "expected exactly one timestamp key, found {}",
            record.len()
        )));
    }
    let Some((key, body)) = record.into_iter().next() else {
        return Err(malformed("empty record".to_string()));
    };

    let timestamp =
        scalar_text(&key).ok_or_else(|| malformed("timestamp key must be a scalar".to_string()))?;
    if !is_iso8601(&timestamp) {
        return Err(ProvenanceError::InvalidTimestamp {
            timestamp,
            file: file.to_path_buf(),
            line,
        });
    }

    let body = match body {
        Value::Mapping(map) => map,
        Value::Null => Mapping::new(),
        _ => return Err(malformed("record value must be a mapping".to_string())),
    };

    let mut attributes = BTreeMap::new();
    for (k, v) in body {
        let k = scalar_text(&k)
            .ok_or_else(|| malformed("attribute names must be scalars".to_string()))?;
        attributes.insert(k, v);
    }

    let missing = |field: &str| ProvenanceError::MissingField {
        field: field.to_string(),
        file: file.to_path_buf(),
        line,
    };

    let invalid = |field: &str, reason: &str| ProvenanceError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
        file: file.to_path_buf(),
        line,
    };

    let name = match attributes.get("name") {
        None | Some(Value::Null) => return Err(missing("name")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(invalid("name", "must not be empty"))
        }
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(invalid("name", "must be text")),
    };

    let kind = match attributes.get("entity") {
        None | Some(Value::Null) => return Err(missing("entity")),
        Some(Value::String(token)) => {
            EntityKind::parse(token).ok_or_else(|| ProvenanceError::InvalidEntity {
                entity: token.clone(),
                file: file.to_path_buf(),
                line,
            })?
        }
        Some(_) => return Err(invalid("entity", "must be text")),
    };

    if attributes.contains_key(TIMESTAMP_ATTRIBUTE) {
        warn!(
            "{}:{}: '{}' attribute replaced by the record key",
            file.display(),
            line,
            TIMESTAMP_ATTRIBUTE
        );
    }

    Ok(ProvenanceEntry::new(timestamp, kind, name, attributes))
}

/// Text of a scalar YAML value; numbers and booleans are rendered as written
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whether `text` is an ISO-8601 date or date-time
fn is_iso8601(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || (text.len() == 8 && NaiveDate::parse_from_str(text, "%Y%m%d").is_ok())
}
