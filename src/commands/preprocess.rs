use std::path::Path;

use anyhow::{Context, Result};

use aip_packager::template::preprocess;

use crate::ui::json;

/// Print the template with `%%` markers rewritten and build comments removed
pub fn cmd_preprocess(template: &Path, json: bool) -> Result<()> {
    let source = std::fs::read_to_string(template)
        .with_context(|| format!("cannot read template {}", template.display()))?;
    let name = template.display().to_string();
    let output = preprocess(&name, &source)?;

    if json {
        json::emit(serde_json::json!({
            "event": "preprocessed",
            "template": name,
            "source": output,
        }))?;
    } else {
        print!("{}", output);
    }
    Ok(())
}
