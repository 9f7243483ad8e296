//! Domain Entities
//!
//! - `FileRecord` - one digested file in the package
//! - `ProvenanceEntry` / `ProvenanceLog` - normalized agents, events and objects
//! - `DescriptiveRecord` - one Dublin Core record with its RDF fragment
//! - `PackageContext` - the immutable view templates render against

mod descriptive;
mod file_record;
mod package_context;
mod provenance;

pub use descriptive::{is_dublin_core_element, DescriptiveRecord, DUBLIN_CORE_ELEMENTS};
pub use file_record::FileRecord;
pub use package_context::{PackageContext, PackageIdentity, Software};
pub use provenance::{ProvenanceEntry, ProvenanceLog, TIMESTAMP_ATTRIBUTE};
