use aip_packager::config::ConfigWarning;

use super::json::{self, events::WarningEvent};

/// Report unknown config keys on stderr (or as JSON warning events)
pub fn print_config_warnings(warnings: &[ConfigWarning], json: bool) {
    for w in warnings {
        if json {
            // stdout may be closed; warnings are best effort
            let _ = json::emit_event(&WarningEvent::new(w.to_string()));
            continue;
        }

        match w.line {
            Some(line) => eprintln!("⚠ Unknown config key '{}' in {}:{}", w.key, w.file.display(), line),
            None => eprintln!("⚠ Unknown config key '{}' in {}", w.key, w.file.display()),
        }

        if let Some(suggestion) = &w.suggestion {
            eprintln!("   Did you mean '{}'?\n", suggestion);
        }
    }
}
