//! Provenance entities
//!
//! A `ProvenanceEntry` is one normalized agent, event or object from the
//! provenance log. A `ProvenanceLog` keeps the entries grouped by kind in file
//! order and answers lookups by kind and name.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_yaml_ng::Value;

use crate::domain::value_objects::EntityKind;

/// Attribute name the parser injects with the entry's key
pub const TIMESTAMP_ATTRIBUTE: &str = "timestamp";

/// One normalized provenance record
///
/// `attributes` holds every key from the log line, including `name` and
/// `entity`, plus the injected `timestamp`. It serializes as that flat map so
/// templates see `event.name`, `event.agent`, `event.timestamp` and so on.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvenanceEntry {
    timestamp: String,
    kind: EntityKind,
    name: String,
    attributes: BTreeMap<String, Value>,
}

impl ProvenanceEntry {
    /// Build an entry; `timestamp` always overwrites an attribute of the same name.
    pub fn new(
        timestamp: impl Into<String>,
        kind: EntityKind,
        name: impl Into<String>,
        mut attributes: BTreeMap<String, Value>,
    ) -> Self {
        let timestamp = timestamp.into();
        let name = name.into();
        attributes.insert("name".to_string(), Value::String(name.clone()));
        attributes.insert("entity".to_string(), Value::String(kind.as_str().to_string()));
        attributes.insert(
            TIMESTAMP_ATTRIBUTE.to_string(),
            Value::String(timestamp.clone()),
        );
        Self {
            timestamp,
            kind,
            name,
            attributes,
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Attribute as text when it is a plain string
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}

impl Serialize for ProvenanceEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}

/// Provenance entries grouped by entity kind, file order preserved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvenanceLog {
    agents: Vec<ProvenanceEntry>,
    events: Vec<ProvenanceEntry>,
    objects: Vec<ProvenanceEntry>,
}

impl ProvenanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ProvenanceEntry) {
        self.bucket_mut(entry.kind).push(entry);
    }

    pub fn entries(&self, kind: EntityKind) -> &[ProvenanceEntry] {
        match kind {
            EntityKind::Agent => &self.agents,
            EntityKind::Event => &self.events,
            EntityKind::Object => &self.objects,
        }
    }

    pub fn agents(&self) -> &[ProvenanceEntry] {
        &self.agents
    }

    pub fn events(&self) -> &[ProvenanceEntry] {
        &self.events
    }

    pub fn objects(&self) -> &[ProvenanceEntry] {
        &self.objects
    }

    /// Look up an entry by kind and name; the latest entry with that name wins
    pub fn find(&self, kind: EntityKind, name: &str) -> Option<&ProvenanceEntry> {
        self.entries(kind).iter().rev().find(|e| e.name == name)
    }

    /// Name index for one kind, as exposed to templates
    pub fn index(&self, kind: EntityKind) -> BTreeMap<&str, &ProvenanceEntry> {
        // later entries overwrite earlier ones, matching `find`
        self.entries(kind)
            .iter()
            .map(|e| (e.name.as_str(), e))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len() + self.events.len() + self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bucket_mut(&mut self, kind: EntityKind) -> &mut Vec<ProvenanceEntry> {
        match kind {
            EntityKind::Agent => &mut self.agents,
            EntityKind::Event => &mut self.events,
            EntityKind::Object => &mut self.objects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: &str, kind: EntityKind, name: &str) -> ProvenanceEntry {
        ProvenanceEntry::new(ts, kind, name, BTreeMap::new())
    }

    #[test]
    fn new_injects_timestamp_over_existing_value() {
        let mut attrs = BTreeMap::new();
        attrs.insert(
            "timestamp".to_string(),
            Value::String("yesterday".to_string()),
        );
        let e = ProvenanceEntry::new("2020-01-01T00:00:00Z", EntityKind::Event, "x", attrs);
        assert_eq!(e.attribute_str("timestamp"), Some("2020-01-01T00:00:00Z"));
        assert_eq!(e.attribute_str("entity"), Some("event"));
        assert_eq!(e.attribute_str("name"), Some("x"));
    }

    #[test]
    fn push_groups_by_kind_in_order() {
        let mut log = ProvenanceLog::new();
        log.push(entry("2020-01-01", EntityKind::Event, "first"));
        log.push(entry("2020-01-02", EntityKind::Agent, "tool"));
        log.push(entry("2020-01-03", EntityKind::Event, "second"));

        let names: Vec<_> = log.events().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(log.agents().len(), 1);
        assert!(log.objects().is_empty());
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn find_returns_latest_with_name() {
        let mut log = ProvenanceLog::new();
        log.push(entry("2020-01-01", EntityKind::Agent, "tool"));
        log.push(entry("2020-01-02", EntityKind::Agent, "tool"));

        let found = log.find(EntityKind::Agent, "tool").unwrap();
        assert_eq!(found.timestamp(), "2020-01-02");
        assert!(log.find(EntityKind::Event, "tool").is_none());
        assert_eq!(log.index(EntityKind::Agent)["tool"].timestamp(), "2020-01-02");
    }

    #[test]
    fn serializes_as_flat_attribute_map() {
        let e = entry("2020-01-01T00:00:00Z", EntityKind::Object, "acct001");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["name"], "acct001");
        assert_eq!(json["entity"], "object");
        assert_eq!(json["timestamp"], "2020-01-01T00:00:00Z");
    }
}
