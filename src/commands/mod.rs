//! Subcommand implementations

pub mod events;
pub mod manifest;
pub mod package;
pub mod preprocess;
