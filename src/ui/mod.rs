//! Console and NDJSON output for the binary

pub mod json;
pub mod output;
