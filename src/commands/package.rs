use std::path::PathBuf;

use anyhow::{bail, Result};

use aip_packager::application::{DocumentOutcome, PackageOptions, PackageReport, Packager};
use aip_packager::config::Config;
use aip_packager::domain::value_objects::{TemplateRole, TransferMode};

use crate::ui::json::{self, events::*};

/// Arguments of `aip-packager package`
#[derive(Debug, Clone)]
pub struct PackageArgs {
    pub account_id: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub events: Option<PathBuf>,
    pub rdf: Option<PathBuf>,
    pub mets_template: Option<PathBuf>,
    pub manifest_template: Option<PathBuf>,
    pub copy: bool,
    pub no_mets: bool,
    pub no_manifest: bool,
    pub skip_structure: bool,
}

impl PackageArgs {
    /// Config values overridden by flags
    pub fn options(self, config: &Config) -> PackageOptions {
        let mut options =
            PackageOptions::from_config(self.account_id, self.source, self.destination, config)
                .with_events(self.events)
                .with_rdf(self.rdf)
                .with_structure(!self.skip_structure);
        if self.mets_template.is_some() {
            options.mets_template = self.mets_template;
        }
        if self.manifest_template.is_some() {
            options.manifest_template = self.manifest_template;
        }
        if self.copy {
            options.mode = TransferMode::Copy;
        }
        if self.no_mets {
            options.emit_mets = false;
        }
        if self.no_manifest {
            options.emit_manifest = false;
        }
        options
    }
}

pub fn cmd_package(args: PackageArgs, config: &Config, json: bool) -> Result<()> {
    let options = args.options(config);

    if json {
        json::emit_event(&StartEvent::new("package"))?;
    } else {
        println!("📦 AIP Packager");
        println!("Account: {}", options.account_id);
        println!("Source: {}", options.source.display());
        println!("Destination: {}", options.destination.display());
        if options.make_structure {
            println!("Mode: {}", options.mode);
        }
    }

    let report = match Packager::new(options).run() {
        Ok(report) => report,
        Err(e) => {
            if json {
                json::emit_event(&CompleteEvent::failure("package"))?;
            }
            return Err(e.into());
        }
    };

    print_report(&report, json)?;

    if !report.is_success() {
        bail!("one or more documents failed");
    }
    Ok(())
}

fn print_report(report: &PackageReport, json: bool) -> Result<()> {
    if json {
        if let Some(stats) = report.transfers {
            json::emit(serde_json::json!({
                "event": "transfers",
                "root": report.root.display().to_string(),
                "stats": stats,
                "valid": report.structure_valid,
            }))?;
        }
        for role in [TemplateRole::Mets, TemplateRole::Manifest] {
            let document = role.as_str();
            let event = match report.outcome(role) {
                DocumentOutcome::Written(path) => DocumentEvent::written(document, path),
                DocumentOutcome::Skipped => DocumentEvent::skipped(document),
                DocumentOutcome::Failed(e) => DocumentEvent::failed(document, e),
            };
            json::emit_event(&event)?;
        }
        let complete = if report.is_success() {
            CompleteEvent::success("package")
        } else {
            CompleteEvent::failure("package")
        };
        json::emit_event(&complete)?;
        return Ok(());
    }

    println!("\nAIP: {}", report.root.display());
    if let Some(stats) = report.transfers {
        println!("Transfers: {}", stats);
    }
    if report.structure_valid == Some(false) {
        println!("⚠ AIP structure appears to be invalid");
    }
    for role in [TemplateRole::Mets, TemplateRole::Manifest] {
        match report.outcome(role) {
            DocumentOutcome::Written(path) => println!("✓ {}: {}", role, path.display()),
            DocumentOutcome::Skipped => println!("- {}: skipped", role),
            DocumentOutcome::Failed(e) => println!("✗ {}: {}", role, e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PackageArgs {
        PackageArgs {
            account_id: "acct001".to_string(),
            source: PathBuf::from("hot"),
            destination: PathBuf::from("aips"),
            events: None,
            rdf: None,
            mets_template: None,
            manifest_template: None,
            copy: false,
            no_mets: false,
            no_manifest: false,
            skip_structure: false,
        }
    }

    #[test]
    fn flags_override_config() {
        let mut config = Config::default();
        config.templates.mets = Some(PathBuf::from("config_mets.xml"));
        config.templates.manifest = Some(PathBuf::from("config_manifest.xml"));

        let mut args = args();
        args.mets_template = Some(PathBuf::from("flag_mets.xml"));
        args.copy = true;
        args.no_manifest = true;
        let options = args.options(&config);

        assert_eq!(options.mets_template, Some(PathBuf::from("flag_mets.xml")));
        assert_eq!(options.manifest_template, Some(PathBuf::from("config_manifest.xml")));
        assert_eq!(options.mode, TransferMode::Copy);
        assert!(options.emit_mets);
        assert!(!options.emit_manifest);
    }

    #[test]
    fn config_mode_kept_without_copy_flag() {
        let mut config = Config::default();
        config.transfer.mode = TransferMode::Copy;
        let options = args().options(&config);
        assert_eq!(options.mode, TransferMode::Copy);
        assert!(options.make_structure);
    }
}
