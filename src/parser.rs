//! Metadata normalizers
//!
//! - `provenance`: the line-oriented agent/event/object log
//! - `descriptive`: the Dublin Core workbook

pub mod descriptive;
pub mod provenance;

pub use descriptive::{parse_sheets, parse_workbook, DescriptiveError};
pub use provenance::{parse_log, parse_log_file, ProvenanceError};
