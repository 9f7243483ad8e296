//! Domain Layer
//!
//! Pure types for the packager without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - File records, provenance, descriptive records, package context
//! - `value_objects/` - Immutable value types (digest, entity kind, template role)
//! - `ports/` - Interface definitions for infrastructure (clock)

pub mod entities;
pub mod ports;
pub mod value_objects;
