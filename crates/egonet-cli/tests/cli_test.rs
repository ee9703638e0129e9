use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join("gedcom").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("egonet-cli"));
    cmd.current_dir(repo_root()).env("EGONET_LOG", "off");
    cmd
}

fn stdout_of(args: &[&str]) -> String {
    let out = cli().args(args).output().expect("run egonet-cli");
    assert!(
        out.status.success(),
        "egonet-cli {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).expect("utf-8 stdout")
}

#[test]
fn parse_prints_the_record_set() {
    let path = fixture("doe_family.ged");
    let json = stdout_of(&["parse", path.to_string_lossy().as_ref()]);
    let v: serde_json::Value = serde_json::from_str(&json).expect("json");

    let individuals = v["individuals"].as_object().unwrap();
    assert_eq!(individuals.len(), 10);
    assert_eq!(individuals.keys().next().map(String::as_str), Some("@I1@"));
    assert_eq!(v["individuals"]["@I3@"]["name"], "Jack Doe");
    assert_eq!(v["families"]["@F1@"]["children"][1], "@I3@");
}

#[test]
fn list_prints_one_line_per_individual() {
    let path = fixture("doe_family.ged");
    let text = stdout_of(&["list", path.to_string_lossy().as_ref()]);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "@I1@\tJohn Doe\t12 MAR 1920\t4 JUL 1990");
    assert_eq!(lines[9], "@I10@\tUnknown\tUnknown\tN/A");
}

#[test]
fn list_reads_stdin() {
    let bytes = fs::read(fixture("single_person.ged")).unwrap();
    let out = assert_cmd::Command::new(assert_cmd::cargo_bin!("egonet-cli"))
        .env("EGONET_LOG", "off")
        .args(["list", "-"])
        .write_stdin(bytes)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "@I1@\tSolo Person\tUnknown\tN/A\n"
    );
}

#[test]
fn layout_honors_canvas_overrides() {
    let path = fixture("doe_family.ged");
    let json = stdout_of(&[
        "layout",
        "--person",
        "@I3@",
        "--width",
        "800",
        "--height",
        "600",
        path.to_string_lossy().as_ref(),
    ]);
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    let nodes = v["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 9);
    let center = nodes.iter().find(|n| n["role"] == "center").unwrap();
    assert_eq!(center["id"], "@I3@");
    assert_eq!(center["x"], 400.0);
    assert_eq!(center["y"], 300.0);
}

#[test]
fn layout_reads_a_config_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = tmp.path().join("egonet.json");
    fs::write(&cfg, r#"{"layout":{"childSpacing":100},"canvas":{"width":600}}"#).unwrap();

    let path = fixture("doe_family.ged");
    let json = stdout_of(&[
        "layout",
        "--person",
        "@I1@",
        "--config",
        cfg.to_string_lossy().as_ref(),
        path.to_string_lossy().as_ref(),
    ]);
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    let xs: Vec<f64> = v["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["role"] == "child")
        .map(|n| n["x"].as_f64().unwrap())
        .collect();
    // marriage point at 300 + 40; three children 100 apart
    assert_eq!(xs, vec![240.0, 340.0, 440.0]);
}

#[test]
fn render_writes_svg_with_click_targets() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("jack.svg");
    let path = fixture("doe_family.ged");

    cli()
        .args([
            "render",
            "--person",
            "@I3@",
            "--out",
            out.to_string_lossy().as_ref(),
            path.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");
    let ids: Vec<_> = doc
        .descendants()
        .filter_map(|n| n.attribute("data-person-id"))
        .collect();
    assert_eq!(ids.len(), 8);
    assert!(!ids.contains(&"@I3@"));
    assert!(!ids.contains(&"@I9@"));
}

#[test]
fn render_png_defaults_next_to_the_input() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("family.ged");
    fs::copy(fixture("doe_family.ged"), &input).expect("copy fixture");

    cli()
        .args([
            "render",
            "--person",
            "@I1@",
            "--format",
            "png",
            input.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let bytes = fs::read(input.with_extension("png")).expect("read png");
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "output is not a PNG"
    );
}

#[test]
fn unknown_person_fails_with_the_lookup_message() {
    let path = fixture("doe_family.ged");
    let out = cli()
        .args(["render", "--person", "@I404@", path.to_string_lossy().as_ref()])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&out.stderr).trim_end(),
        "error: Person not found"
    );
}

#[test]
fn malformed_file_reports_the_line() {
    let path = fixture("malformed_level.ged");
    let out = cli()
        .args(["list", path.to_string_lossy().as_ref()])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("line 3"), "{stderr}");
}

#[test]
fn usage_errors_exit_with_two() {
    let path = fixture("doe_family.ged");
    for args in [
        vec!["layout", path.to_str().unwrap()],
        vec!["render", "--person", "@I1@", "--format", "gif"],
        vec!["render", "--person", "@I1@", "--width", "-3"],
        vec!["--bogus"],
    ] {
        let out = cli().args(&args).output().unwrap();
        assert_eq!(out.status.code(), Some(2), "{args:?}");
    }
}
