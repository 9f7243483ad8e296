use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// aip-packager - build archival packages for email accounts
#[derive(Parser, Debug)]
#[command(name = "aip-packager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output NDJSON events instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./packager.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Make the AIP structure and write the METS and manifest documents
    Package {
        /// Account identifier (file prefix of the account's data)
        account_id: String,

        /// Folder holding pst/, mime/, eaxs/ and metadata/
        source: PathBuf,

        /// Folder in which <ACCOUNT_ID>/ is created
        destination: PathBuf,

        /// Provenance log (one `timestamp: {name, entity, ...}` per line)
        #[arg(long)]
        events: Option<PathBuf>,

        /// Descriptive metadata workbook (xlsx, xls, ods)
        #[arg(long)]
        rdf: Option<PathBuf>,

        /// METS template (default: built-in)
        #[arg(long)]
        mets_template: Option<PathBuf>,

        /// Manifest template (default: built-in)
        #[arg(long)]
        manifest_template: Option<PathBuf>,

        /// Copy source data instead of moving it
        #[arg(long)]
        copy: bool,

        /// Do not write the METS document
        #[arg(long)]
        no_mets: bool,

        /// Do not write the manifest
        #[arg(long)]
        no_manifest: bool,

        /// Package an existing <DESTINATION>/<ACCOUNT_ID> without transferring data
        #[arg(long)]
        skip_structure: bool,
    },

    /// Regenerate the manifest of an existing package
    Manifest {
        /// Package root
        aip_dir: PathBuf,

        /// Account identifier (default: name of AIP_DIR)
        #[arg(long)]
        account: Option<String>,

        /// Manifest template (default: built-in)
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Print a template after preprocessing
    Preprocess {
        template: PathBuf,
    },

    /// Print the normalized provenance log
    Events {
        log: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_package_defaults() {
        let cli = Cli::try_parse_from(["aip-packager", "package", "acct001", "hot", "aips"]).unwrap();
        if let Commands::Package {
            account_id,
            source,
            destination,
            events,
            copy,
            no_mets,
            no_manifest,
            skip_structure,
            ..
        } = cli.command
        {
            assert_eq!(account_id, "acct001");
            assert_eq!(source, PathBuf::from("hot"));
            assert_eq!(destination, PathBuf::from("aips"));
            assert_eq!(events, None);
            assert!(!copy);
            assert!(!no_mets);
            assert!(!no_manifest);
            assert!(!skip_structure);
        } else {
            panic!("Expected Package command");
        }
    }

    #[test]
    fn test_cli_parse_package_flags() {
        let cli = Cli::try_parse_from([
            "aip-packager",
            "package",
            "acct001",
            "hot",
            "aips",
            "--events",
            "events.log",
            "--rdf",
            "acct001.xlsx",
            "--copy",
            "--no-manifest",
        ])
        .unwrap();
        if let Commands::Package {
            events,
            rdf,
            copy,
            no_manifest,
            ..
        } = cli.command
        {
            assert_eq!(events, Some(PathBuf::from("events.log")));
            assert_eq!(rdf, Some(PathBuf::from("acct001.xlsx")));
            assert!(copy);
            assert!(no_manifest);
        } else {
            panic!("Expected Package command");
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "aip-packager",
            "events",
            "events.log",
            "--json",
            "-vv",
            "--config",
            "p.toml",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
    }

    #[test]
    fn test_cli_parse_manifest() {
        let cli = Cli::try_parse_from(["aip-packager", "manifest", "aips/acct001"]).unwrap();
        if let Commands::Manifest {
            aip_dir,
            account,
            template,
        } = cli.command
        {
            assert_eq!(aip_dir, PathBuf::from("aips/acct001"));
            assert_eq!(account, None);
            assert_eq!(template, None);
        } else {
            panic!("Expected Manifest command");
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["aip-packager"]).is_err());
    }
}
