mod common;

use std::fs;

use sha2::{Digest, Sha256};
use tempfile::tempdir;

use common::*;

fn sha256_hex(content: &[u8]) -> String {
    Sha256::digest(content)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[test]
fn test_manifest_lists_files_in_order_with_digests() {
    let dir = tempdir().unwrap();
    let aip = dir.path().join("acct001");
    fs::create_dir_all(aip.join("a")).unwrap();
    fs::write(aip.join("a/1.txt"), b"abcd").unwrap();
    fs::write(aip.join("b.txt"), b"").unwrap();

    let output = run(dir.path(), &["manifest", "acct001"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let manifest = fs::read_to_string(aip.join("acct001.manifest.xml")).unwrap();
    let entries: Vec<&str> = manifest
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("<file "))
        .collect();

    assert_eq!(
        entries,
        [
            format!(
                "<file path=\"a/1.txt\" size=\"4\" checksum=\"{}\"/>",
                sha256_hex(b"abcd")
            ),
            format!(
                "<file path=\"b.txt\" size=\"0\" checksum=\"{}\"/>",
                sha256_hex(b"")
            ),
        ]
    );
    assert_eq!(manifest.matches("checksumAlgorithm=\"SHA-256\"").count(), 1);
}

#[test]
fn test_manifest_rerun_only_changes_created() {
    let dir = tempdir().unwrap();
    let aip = dir.path().join("acct001");
    fs::create_dir_all(aip.join("eaxs")).unwrap();
    fs::write(aip.join("eaxs/acct001.xml"), b"<Account/>").unwrap();

    let strip_created = |text: &str| -> String {
        text.lines()
            .map(|line| match line.find("created=\"") {
                Some(start) => {
                    let rest = &line[start + 9..];
                    let end = rest.find('"').unwrap();
                    format!("{}{}", &line[..start], &rest[end + 1..])
                }
                None => line.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    assert!(run(dir.path(), &["manifest", "acct001"]).status.success());
    let first = fs::read_to_string(aip.join("acct001.manifest.xml")).unwrap();
    assert!(run(dir.path(), &["manifest", "acct001"]).status.success());
    let second = fs::read_to_string(aip.join("acct001.manifest.xml")).unwrap();

    assert_eq!(strip_created(&first), strip_created(&second));
    assert!(!second.contains("path=\"acct001.manifest.xml\""));
}

#[test]
fn test_manifest_account_flag_and_custom_template() {
    let dir = tempdir().unwrap();
    let aip = dir.path().join("package");
    fs::create_dir_all(&aip).unwrap();
    fs::write(aip.join("x.txt"), b"x").unwrap();
    fs::write(
        dir.path().join("list.xml"),
        "<!--# plain listing #-->\n<files account=\"{{ account_id }}\">\n%% for file in files %%\n<f>{{ file.path }}</f>\n%% endfor %%\n</files>\n",
    )
    .unwrap();

    let output = run(
        dir.path(),
        &["manifest", "package", "--account", "acct002", "--template", "list.xml"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let manifest = fs::read_to_string(aip.join("acct002.manifest.xml")).unwrap();
    assert_eq!(manifest, "<files account=\"acct002\">\n<f>x.txt</f>\n</files>\n");
}

#[test]
fn test_manifest_missing_template_fails() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("acct001")).unwrap();

    let output = run(
        dir.path(),
        &["manifest", "acct001", "--template", "absent.xml"],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("template not found"), "stderr: {}", stderr(&output));
}
