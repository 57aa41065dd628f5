//! End-to-end tests running the treelayout binary

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/trees")
        .join(name)
}

/// Run isolated from the user's config files and environment.
fn run(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_treelayout"))
        .args(args)
        .current_dir(cwd)
        .env("XDG_CONFIG_HOME", cwd.join("xdg"))
        .env("HOME", cwd)
        .env("NO_COLOR", "1")
        .env_remove("TREELAYOUT_CONFIG")
        .env_remove("TREELAYOUT_LAYOUT__NODE_WIDTH")
        .env_remove("TREELAYOUT_LAYOUT__NODE_HEIGHT")
        .env_remove("TREELAYOUT_LAYOUT__SPACE_X")
        .env_remove("TREELAYOUT_LAYOUT__SPACE_Y")
        .env_remove("TREELAYOUT_LAYOUT__ORIENTATION")
        .output()
        .expect("run treelayout")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn given_demo_tree_when_bound_then_prints_canvas_size() {
    let dir = TempDir::new().unwrap();
    let demo = resource("demo.json");

    let output = run(dir.path(), &["bound", demo.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "1280x640");
}

#[test]
fn given_flags_when_bound_then_flags_override_defaults() {
    let dir = TempDir::new().unwrap();
    let demo = resource("demo.toml");

    let output = run(
        dir.path(),
        &["bound", demo.to_str().unwrap(), "--orientation", "vertical"],
    );

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "820x1340");
}

#[test]
fn given_local_config_when_bound_then_picked_up_from_cwd() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".treelayout.toml"), "[layout]\nspace_x = 0\n").unwrap();
    let demo = resource("demo.json");

    let output = run(dir.path(), &["bound", demo.to_str().unwrap()]);

    assert!(output.status.success());
    // 9 leaves of 120 side by side, no gaps
    assert_eq!(stdout(&output).trim(), "1080x640");
}

#[test]
fn given_layout_json_with_insert_when_run_then_report_contains_new_node() {
    let dir = TempDir::new().unwrap();
    let demo = resource("demo.json");

    let output = run(
        dir.path(),
        &["layout", demo.to_str().unwrap(), "--insert", "2=Child M", "--format", "json"],
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["root"]["children"][0]["children"][0]["node"]["name"], "Child M");
}

#[test]
fn given_radial_orientation_when_layout_then_usage_exit_code() {
    let dir = TempDir::new().unwrap();
    let demo = resource("demo.json");

    let output = run(
        dir.path(),
        &["layout", demo.to_str().unwrap(), "--orientation", "radial"],
    );

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn given_missing_tree_file_when_layout_then_noinput_exit_code() {
    let dir = TempDir::new().unwrap();

    let output = run(dir.path(), &["layout", "missing.json"]);

    assert_eq!(output.status.code(), Some(66));
}

#[test]
fn given_duplicate_ids_when_measure_then_dataerr_exit_code() {
    let dir = TempDir::new().unwrap();
    let file = resource("duplicate_ids.json");

    let output = run(dir.path(), &["measure", file.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(65));
}

#[test]
fn given_config_init_when_run_twice_then_creates_once() {
    let dir = TempDir::new().unwrap();

    let first = run(dir.path(), &["config", "init"]);
    let second = run(dir.path(), &["config", "init"]);

    assert!(first.status.success());
    assert!(second.status.success());
    let written = std::fs::read_to_string(dir.path().join(".treelayout.toml")).unwrap();
    assert!(written.contains("[layout]"));
    assert!(String::from_utf8_lossy(&second.stderr).contains("already exists"));
}
