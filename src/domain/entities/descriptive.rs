//! Descriptive record entity
//!
//! A named group of Dublin Core field/value pairs taken from one row of the
//! descriptive-metadata workbook, together with its pre-rendered RDF fragment.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// The fixed field vocabulary (the fifteen Dublin Core elements)
pub const DUBLIN_CORE_ELEMENTS: [&str; 15] = [
    "contributor",
    "coverage",
    "creator",
    "date",
    "description",
    "format",
    "identifier",
    "language",
    "publisher",
    "relation",
    "rights",
    "source",
    "subject",
    "title",
    "type",
];

/// One descriptive record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptiveRecord {
    name: String,
    /// (element, value) pairs in column order
    fields: Vec<(String, String)>,
    /// Serialized RDF/Dublin Core fragment
    xml: String,
}

impl DescriptiveRecord {
    pub fn new(name: impl Into<String>, fields: Vec<(String, String)>, xml: String) -> Self {
        Self {
            name: name.into(),
            fields,
            xml,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn field(&self, element: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == element)
            .map(|(_, v)| v.as_str())
    }

    pub fn xml(&self) -> &str {
        &self.xml
    }
}

/// Field list serialized as an ordered map
struct Fields<'a>(&'a [(String, String)]);

impl Serialize for Fields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for DescriptiveRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DescriptiveRecord", 3)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("fields", &Fields(&self.fields))?;
        s.serialize_field("xml", &self.xml)?;
        s.end()
    }
}

/// Whether `element` belongs to the recognized vocabulary
pub fn is_dublin_core_element(element: &str) -> bool {
    DUBLIN_CORE_ELEMENTS.contains(&element)
}
