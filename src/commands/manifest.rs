use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use aip_packager::application::{load_template, ManifestEmitter};
use aip_packager::config::Config;
use aip_packager::domain::entities::PackageIdentity;
use aip_packager::domain::ports::SystemClock;
use aip_packager::domain::value_objects::TemplateRole;

use crate::ui::json::{self, events::*};

pub fn cmd_manifest(
    aip_dir: &Path,
    account: Option<String>,
    template: Option<PathBuf>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let account_id = match account {
        Some(account) => account,
        None => account_from_dir(aip_dir)?,
    };

    if json {
        json::emit_event(&StartEvent::new("manifest"))?;
    } else {
        println!("📄 Manifest for {} in {}", account_id, aip_dir.display());
    }

    let template_path = template
        .as_deref()
        .or_else(|| config.template_path(TemplateRole::Manifest));
    let identity = PackageIdentity::created_now(&account_id, config.software(), &SystemClock);

    let result = load_template(template_path, TemplateRole::Manifest)
        .and_then(|template| ManifestEmitter::new(template).emit(aip_dir, &identity));

    match result {
        Ok(path) => {
            if json {
                json::emit_event(&DocumentEvent::written("manifest", &path))?;
                json::emit_event(&CompleteEvent::success("manifest"))?;
            } else {
                println!("✓ manifest: {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            if json {
                json::emit_event(&DocumentEvent::failed("manifest", &e))?;
                json::emit_event(&CompleteEvent::failure("manifest"))?;
            }
            Err(e.into())
        }
    }
}

/// The account id of a package is the name of its root folder
fn account_from_dir(aip_dir: &Path) -> Result<String> {
    let canonical = aip_dir
        .canonicalize()
        .with_context(|| format!("cannot open {}", aip_dir.display()))?;
    canonical
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("cannot derive an account id from {}", aip_dir.display()))
}
