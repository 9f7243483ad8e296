//! Package context
//!
//! The read-only view every template renders against. It is assembled once per
//! run from the package identity, the walked file records, the provenance log
//! and the descriptive records, and is never mutated afterwards.
//!
//! Optional collections are always present (possibly empty), so templates test
//! `{% if events %}` instead of probing for attributes.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::domain::entities::{DescriptiveRecord, FileRecord, ProvenanceLog};
use crate::domain::ports::{Clock, SystemClock};
use crate::domain::value_objects::{ContentDigest, EntityKind};

/// Producing software identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Software {
    pub name: String,
    pub version: String,
}

impl Default for Software {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Static identity of one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIdentity {
    pub account_id: String,
    pub created: DateTime<Utc>,
    pub software: Software,
}

impl PackageIdentity {
    pub fn new(account_id: impl Into<String>, created: DateTime<Utc>, software: Software) -> Self {
        Self {
            account_id: account_id.into(),
            created,
            software,
        }
    }

    /// Identity created at the clock's current second
    pub fn created_now(account_id: impl Into<String>, software: Software, clock: &dyn Clock) -> Self {
        let now = clock.now();
        let created = now.with_nanosecond(0).unwrap_or(now);
        Self::new(account_id, created, software)
    }

    /// Creation time as UTC ISO-8601 with second precision
    pub fn created_iso(&self) -> String {
        self.created.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Aggregate, immutable rendering context
#[derive(Debug, Clone)]
pub struct PackageContext {
    identity: PackageIdentity,
    files: Vec<FileRecord>,
    folders: Vec<String>,
    provenance: ProvenanceLog,
    descriptive: Vec<DescriptiveRecord>,
    clock: Arc<dyn Clock>,
}

impl PackageContext {
    /// Assemble the context. Pure aggregation: no I/O, no new failure modes.
    pub fn assemble(
        identity: PackageIdentity,
        files: Vec<FileRecord>,
        provenance: ProvenanceLog,
        descriptive: Vec<DescriptiveRecord>,
    ) -> Self {
        let folders = collect_folders(&files);
        Self {
            identity,
            files,
            folders,
            provenance,
            descriptive,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used by the `timestamp()` and `hash_id()` helpers
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn identity(&self) -> &PackageIdentity {
        &self.identity
    }

    pub fn account_id(&self) -> &str {
        &self.identity.account_id
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    pub fn provenance(&self) -> &ProvenanceLog {
        &self.provenance
    }

    pub fn descriptive(&self) -> &[DescriptiveRecord] {
        &self.descriptive
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }
}

/// Every ancestor directory of every file, sorted, root excluded
fn collect_folders(files: &[FileRecord]) -> Vec<String> {
    let mut folders = BTreeSet::new();
    for file in files {
        let mut parent = file.parent();
        while !parent.is_empty() {
            if !folders.insert(parent.to_string()) {
                break;
            }
            parent = parent.rsplit_once('/').map(|(p, _)| p).unwrap_or("");
        }
    }
    folders.into_iter().collect()
}

/// Name lookups for all three kinds
struct Lookup<'a>(&'a ProvenanceLog);

impl Serialize for Lookup<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: BTreeMap<&str, BTreeMap<&str, _>> = EntityKind::ALL
            .iter()
            .map(|kind| (kind.as_str(), self.0.index(*kind)))
            .collect();
        map.serialize(serializer)
    }
}

impl Serialize for PackageContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PackageContext", 11)?;
        s.serialize_field("account_id", &self.identity.account_id)?;
        s.serialize_field("created", &self.identity.created_iso())?;
        s.serialize_field("software", &self.identity.software)?;
        s.serialize_field("checksum_algorithm", ContentDigest::ALGORITHM)?;
        s.serialize_field("files", &self.files)?;
        s.serialize_field("folders", &self.folders)?;
        s.serialize_field("agents", self.provenance.agents())?;
        s.serialize_field("events", self.provenance.events())?;
        s.serialize_field("objects", self.provenance.objects())?;
        s.serialize_field("lookup", &Lookup(&self.provenance))?;
        s.serialize_field("descriptive", &self.descriptive)?;
        s.end()
    }
}
