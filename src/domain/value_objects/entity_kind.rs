//! Entity kind value object - the three PREMIS entity types a provenance entry may describe
//!
//! - `Agent`: software or people that acted on the package
//! - `Event`: something that happened to the package
//! - `Object`: a thing the package contains or was derived from

use serde::{Deserialize, Serialize};

/// Kind of a provenance entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Agent,
    Event,
    Object,
}

impl EntityKind {
    /// All kinds in template order
    pub const ALL: [EntityKind; 3] = [EntityKind::Agent, EntityKind::Event, EntityKind::Object];

    /// The token used in the provenance log
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Agent => "agent",
            EntityKind::Event => "event",
            EntityKind::Object => "object",
        }
    }

    /// Parse a log token; only the exact lowercase names are accepted
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "agent" => Some(EntityKind::Agent),
            "event" => Some(EntityKind::Event),
            "object" => Some(EntityKind::Object),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
