//! Common test utilities for the CLI tests.
//!
//! - `bin()`: path of the built binary
//! - `HotFolder`: a temp source folder laid out for one account plus an empty
//!   destination
//! - Fixtures: provenance logs, xlsx workbooks

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

pub const ACCOUNT: &str = "acct001";

/// Provenance log with one agent, one object and one linked event
pub const EVENTS_LOG: &str = "\
# preservation events for acct001
2020-01-01T00:00:00Z: {name: tomes_converter, entity: agent, type: software}
2020-01-01T00:00:01Z: {name: acct001, entity: object}
2020-01-01T00:00:02Z: {name: pst_to_mime, entity: event, agent: tomes_converter, object: acct001}
";

/// Write an xlsx workbook; each sheet is a name and its rows of text cells
pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<&str>>)]) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    sheet.write_string(r as u32, c as u16, *cell).unwrap();
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

pub fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_aip-packager")
}

/// Run the binary with `args`, isolated from any `packager.toml` and
/// `AIP_PACKAGER_*` variables in the caller's environment
pub fn run(cwd: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(bin());
    cmd.current_dir(cwd).args(args);
    for (key, _) in std::env::vars() {
        if key.starts_with("AIP_PACKAGER_") || key == "RUST_LOG" {
            cmd.env_remove(key);
        }
    }
    cmd.output().unwrap()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Source and destination folders for one packaging run
pub struct HotFolder {
    pub dir: TempDir,
}

impl HotFolder {
    pub fn new() -> Self {
        let dir = tempdir().unwrap();
        let hot = dir.path().join("hot");
        fs::create_dir_all(hot.join("pst")).unwrap();
        fs::write(hot.join("pst").join(format!("{ACCOUNT}.pst")), b"!BDN").unwrap();
        fs::create_dir_all(hot.join("mime").join(ACCOUNT).join("Inbox")).unwrap();
        fs::write(
            hot.join("mime").join(ACCOUNT).join("Inbox/1.eml"),
            b"Subject: hi\r\n\r\nbody\r\n",
        )
        .unwrap();
        fs::create_dir_all(hot.join("eaxs").join(ACCOUNT)).unwrap();
        fs::write(
            hot.join("eaxs").join(ACCOUNT).join(format!("{ACCOUNT}.xml")),
            b"<Account/>",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("aips")).unwrap();
        fs::write(dir.path().join("events.log"), EVENTS_LOG).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.path().join("hot")
    }

    pub fn destination(&self) -> PathBuf {
        self.path().join("aips")
    }

    pub fn events(&self) -> PathBuf {
        self.path().join("events.log")
    }

    pub fn aip(&self) -> PathBuf {
        self.destination().join(ACCOUNT)
    }

    /// `package ACCOUNT hot aips` followed by `extra`
    pub fn package(&self, extra: &[&str]) -> Output {
        let mut args = vec!["package", ACCOUNT, "hot", "aips"];
        args.extend_from_slice(extra);
        run(self.path(), &args)
    }
}
