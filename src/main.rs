//! aip-packager - builds archival information packages for email accounts
//!
//! Usage: aip-packager <COMMAND>
//!
//! Commands:
//!   package     Make the AIP structure and write the METS and manifest documents
//!   manifest    Regenerate the manifest of an existing package
//!   preprocess  Print a template after preprocessing
//!   events      Print the normalized provenance log

mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aip_packager::config::Config;

use cli::{Cli, Commands};
use commands::package::PackageArgs;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (config, warnings) = Config::load_or_default(cli.config.as_deref())?;
    ui::output::print_config_warnings(&warnings, cli.json);

    match cli.command {
        Commands::Package {
            account_id,
            source,
            destination,
            events,
            rdf,
            mets_template,
            manifest_template,
            copy,
            no_mets,
            no_manifest,
            skip_structure,
        } => {
            let args = PackageArgs {
                account_id,
                source,
                destination,
                events,
                rdf,
                mets_template,
                manifest_template,
                copy,
                no_mets,
                no_manifest,
                skip_structure,
            };
            commands::package::cmd_package(args, &config, cli.json)
        }
        Commands::Manifest {
            aip_dir,
            account,
            template,
        } => commands::manifest::cmd_manifest(&aip_dir, account, template, &config, cli.json),
        Commands::Preprocess { template } => commands::preprocess::cmd_preprocess(&template, cli.json),
        Commands::Events { log } => commands::events::cmd_events(&log, cli.json),
    }
}

/// `RUST_LOG` wins; otherwise verbosity picks the level for this crate
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("aip_packager={}", level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}
