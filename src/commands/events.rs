use std::path::Path;

use anyhow::Result;

use aip_packager::domain::value_objects::EntityKind;
use aip_packager::parser::parse_log_file;

use crate::ui::json::{self, events::*};

/// Print the normalized provenance log grouped by entity kind
pub fn cmd_events(log: &Path, json: bool) -> Result<()> {
    let provenance = parse_log_file(log)?;

    if json {
        json::emit_event(&StartEvent::new("events"))?;
        for kind in EntityKind::ALL {
            for entry in provenance.entries(kind) {
                json::emit(serde_json::json!({
                    "event": "entry",
                    "entity": kind.as_str(),
                    "name": entry.name(),
                    "timestamp": entry.timestamp(),
                    "attributes": entry,
                }))?;
            }
        }
        json::emit_event(&CompleteEvent::success("events"))?;
        return Ok(());
    }

    println!("📜 {} ({} entries)", log.display(), provenance.len());
    for kind in EntityKind::ALL {
        let entries = provenance.entries(kind);
        if entries.is_empty() {
            continue;
        }
        println!("\n{} ({}):", kind, entries.len());
        for entry in entries {
            println!("  {}  {}", entry.timestamp(), entry.name());
            for (key, value) in entry.attributes() {
                if matches!(key.as_str(), "name" | "entity" | "timestamp") {
                    continue;
                }
                let value = serde_json::to_string(value).unwrap_or_default();
                println!("      {} = {}", key, value);
            }
        }
    }
    Ok(())
}
