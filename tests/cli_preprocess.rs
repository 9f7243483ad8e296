mod common;

use std::fs;

use tempfile::tempdir;

use common::*;

#[test]
fn test_preprocess_rewrites_markers_and_strips_build_comments() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("t.xml"),
        "<root>\n    <!--# build note #-->\n    <!-- kept -->\n    <!-- # also kept # -->\n    %% for f in files %%\n    <f>{{ f.path }}</f>\n    %% endfor %%\n</root>\n",
    )
    .unwrap();

    let output = run(dir.path(), &["preprocess", "t.xml"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    insta::assert_snapshot!(stdout(&output), @r###"
    <root>
        <!-- kept -->
        <!-- # also kept # -->
        {% for f in files %}
        <f>{{ f.path }}</f>
        {% endfor %}
    </root>
    "###);
}

#[test]
fn test_preprocess_unbalanced_marker_names_line() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("t.xml"), "<root>\n%% if x %%\n%% endif\n</root>\n").unwrap();

    let output = run(dir.path(), &["preprocess", "t.xml"]);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("unbalanced"), "stderr: {}", err);
    assert!(err.contains("line 3"), "stderr: {}", err);
}

#[test]
fn test_preprocess_json() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("t.xml"), "%% if a %%x%% endif %%").unwrap();

    let output = run(dir.path(), &["preprocess", "t.xml", "--json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let event: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(event["event"], "preprocessed");
    assert_eq!(event["source"], "{% if a %}x{% endif %}");
}
