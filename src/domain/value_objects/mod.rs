//! Value Objects
//!
//! Immutable types that are defined by their values rather than identity.

mod digest;
mod entity_kind;
mod template_role;
mod transfer_mode;

pub use digest::ContentDigest;
pub use entity_kind::EntityKind;
pub use template_role::TemplateRole;
pub use transfer_mode::TransferMode;
