//! Configuration module
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (AIP_PACKAGER_*)
//! 3. Config file (`--config`, or `packager.toml` in the working directory)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{with_overrides_from, ConfigWarning, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use types::{Config, OutputConfig, SoftwareConfig, TemplatesConfig, TransferConfig};
