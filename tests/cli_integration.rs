//! Integration tests for the `eztood` CLI.
//!
//! Each test creates a temp data directory, runs `eztood` as a subprocess,
//! and verifies stdout and/or the contents of tabs.json.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;

/// Get the path to the built `eztood` binary.
fn eztood_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("eztood");
    path
}

/// Run `eztood` with data and config kept under `root`, returning
/// (stdout, stderr, success).
fn run(root: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(eztood_bin())
        .args(args)
        .env("EZTOOD_DATA_DIR", root.join("data"))
        .env("EZTOOD_CONFIG_DIR", root.join("config"))
        .env_remove("EZTOOD_LOG")
        .output()
        .expect("failed to run eztood");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `eztood` expecting success, return stdout.
fn run_ok(root: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run(root, args);
    if !success {
        panic!(
            "eztood {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `eztood` expecting failure, return stderr.
fn run_err(root: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run(root, args);
    if success {
        panic!("eztood {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

fn tabs_json(root: &Path) -> serde_json::Value {
    let text = fs::read_to_string(root.join("data").join("tabs.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn titles(root: &Path) -> Vec<String> {
    let out = run_ok(root, &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    parsed["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_fresh_start_has_home_tab() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_ok(tmp.path(), &["tabs"]);
    assert_eq!(out, "* Home  (0 open, 0 done)\n");
    let out = run_ok(tmp.path(), &["list"]);
    assert_eq!(out, "Home: no tasks\n");
    // Reading doesn't create the file
    assert!(!tmp.path().join("data").join("tabs.json").exists());
}

#[test]
fn test_data_dir_flag_overrides_env() {
    let tmp = tempfile::TempDir::new().unwrap();
    let other = tmp.path().join("elsewhere");
    let other_str = other.to_str().unwrap();
    run_ok(tmp.path(), &["--data-dir", other_str, "add", "over", "here"]);
    assert!(other.join("tabs.json").exists());
    assert!(!tmp.path().join("data").join("tabs.json").exists());
}

// ---------------------------------------------------------------------------
// Task command tests
// ---------------------------------------------------------------------------

#[test]
fn test_add_and_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_ok(tmp.path(), &["add", "buy", "milk"]);
    assert!(out.starts_with("added: 1. [ ] buy milk"));
    run_ok(tmp.path(), &["add", "walk the dog"]);

    let out = run_ok(tmp.path(), &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Home");
    assert!(lines[1].starts_with("  1. [ ] buy milk"));
    assert!(lines[2].starts_with("  2. [ ] walk the dog"));
}

#[test]
fn test_add_blank_title_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_err(tmp.path(), &["add", "   "]);
    assert!(err.contains("empty"));
    assert!(!tmp.path().join("data").join("tabs.json").exists());
}

#[test]
fn test_persisted_format() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "first"]);
    let json = tabs_json(tmp.path());
    let tabs = json["tabs"].as_array().unwrap();
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs[0]["name"], "Home");
    assert_eq!(json["selectedTabID"], tabs[0]["id"]);
    let task = &tabs[0]["tasks"][0];
    assert_eq!(task["title"], "first");
    assert_eq!(task["isDone"], false);
    assert!(task["id"].is_string());
}

#[test]
fn test_done_toggles() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "a"]);
    run_ok(tmp.path(), &["add", "b"]);

    let out = run_ok(tmp.path(), &["done", "2"]);
    assert!(out.starts_with("done: 2. [x] b"));
    assert_eq!(tabs_json(tmp.path())["tabs"][0]["tasks"][1]["isDone"], true);

    let out = run_ok(tmp.path(), &["done", "2"]);
    assert!(out.starts_with("not done: 2. [ ] b"));
}

#[test]
fn test_done_by_id_prefix() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "a"]);
    let id = tabs_json(tmp.path())["tabs"][0]["tasks"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    run_ok(tmp.path(), &["done", &id[..8]]);
    assert_eq!(tabs_json(tmp.path())["tabs"][0]["tasks"][0]["isDone"], true);
}

#[test]
fn test_unknown_task_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "a"]);
    let err = run_err(tmp.path(), &["rm", "7"]);
    assert!(err.contains("no task '7'"));
}

#[test]
fn test_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "a"]);
    run_ok(tmp.path(), &["add", "b"]);
    run_ok(tmp.path(), &["add", "c"]);
    let out = run_ok(tmp.path(), &["rm", "2"]);
    assert!(out.starts_with("deleted: 2. [ ] b"));
    assert_eq!(titles(tmp.path()), vec!["a", "c"]);
}

#[test]
fn test_mv_clamps() {
    let tmp = tempfile::TempDir::new().unwrap();
    for t in ["a", "b", "c", "d"] {
        run_ok(tmp.path(), &["add", t]);
    }
    run_ok(tmp.path(), &["mv", "1", "--by", "2"]);
    assert_eq!(titles(tmp.path()), vec!["b", "c", "a", "d"]);
    // Large deltas jump to the end
    run_ok(tmp.path(), &["mv", "1", "--by", "10"]);
    assert_eq!(titles(tmp.path()), vec!["c", "a", "d", "b"]);
    run_ok(tmp.path(), &["mv", "4", "--by", "-10"]);
    assert_eq!(titles(tmp.path()), vec!["b", "c", "a", "d"]);
}

// ---------------------------------------------------------------------------
// Tab command tests
// ---------------------------------------------------------------------------

#[test]
fn test_tab_add_suffixes_names() {
    let tmp = tempfile::TempDir::new().unwrap();
    assert_eq!(run_ok(tmp.path(), &["tab", "add"]), "added tab: Tab\n");
    assert_eq!(run_ok(tmp.path(), &["tab", "add"]), "added tab: Tab 2\n");
    assert_eq!(run_ok(tmp.path(), &["tab", "add", "Work"]), "added tab: Work\n");
    assert_eq!(run_ok(tmp.path(), &["tab", "add", "Work"]), "added tab: Work 2\n");

    let out = run_ok(tmp.path(), &["tabs"]);
    assert_eq!(
        out,
        "  Home  (0 open, 0 done)\n  Tab  (0 open, 0 done)\n  Tab 2  (0 open, 0 done)\n  Work  (0 open, 0 done)\n* Work 2  (0 open, 0 done)\n"
    );
}

#[test]
fn test_tab_scoped_task_commands() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["tab", "add", "Work"]);
    run_ok(tmp.path(), &["tab", "select", "Home"]);
    run_ok(tmp.path(), &["add", "report", "--tab", "Work"]);

    // Selection is untouched by --tab
    assert!(run_ok(tmp.path(), &["tabs"]).starts_with("* Home"));
    assert_eq!(titles(tmp.path()), Vec::<String>::new());

    let out = run_ok(tmp.path(), &["list", "--tab", "Work", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["tab"], "Work");
    assert_eq!(parsed["tasks"][0]["title"], "report");
}

#[test]
fn test_tab_close() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_err(tmp.path(), &["tab", "close", "Home"]);
    assert!(err.contains("only tab"));

    run_ok(tmp.path(), &["tab", "add", "Work"]);
    run_ok(tmp.path(), &["tab", "close", "Work"]);
    assert_eq!(run_ok(tmp.path(), &["tabs"]), "* Home  (0 open, 0 done)\n");

    let err = run_err(tmp.path(), &["tab", "close", "Nope"]);
    assert!(err.contains("no tab named 'Nope'"));
}

#[test]
fn test_tabs_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "a"]);
    run_ok(tmp.path(), &["done", "1"]);
    run_ok(tmp.path(), &["tab", "add", "Work"]);

    let out = run_ok(tmp.path(), &["tabs", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["name"], "Home");
    assert_eq!(arr[0]["done"], 1);
    assert_eq!(arr[0]["selected"], false);
    assert_eq!(arr[1]["selected"], true);
}

// ---------------------------------------------------------------------------
// Robustness
// ---------------------------------------------------------------------------

#[test]
fn test_corrupt_file_is_backed_up() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("tabs.json"), "{ not json").unwrap();

    run_ok(tmp.path(), &["add", "fresh"]);
    assert_eq!(titles(tmp.path()), vec!["fresh"]);
    let backups = fs::read_dir(&data)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("tabs.json.corrupt-"))
        .count();
    assert_eq!(backups, 1);
}

#[test]
fn test_dangling_selection_is_repaired() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("tabs.json"),
        r#"{"tabs":[{"id":"6F9619FF-8B86-D011-B42D-00C04FC964FF","name":"Saved","tasks":[]}],
            "selectedTabID":"00000000-0000-0000-0000-000000000000"}"#,
    )
    .unwrap();
    assert_eq!(run_ok(tmp.path(), &["tabs"]), "* Saved  (0 open, 0 done)\n");
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[test]
fn test_opacity_show_and_set() {
    let tmp = tempfile::TempDir::new().unwrap();
    assert_eq!(run_ok(tmp.path(), &["opacity"]), "opacity: 1.00\n");
    assert_eq!(run_ok(tmp.path(), &["opacity", "0.73"]), "opacity: 0.75\n");
    assert_eq!(run_ok(tmp.path(), &["opacity", "0.05"]), "opacity: 0.20\n");
    assert_eq!(run_ok(tmp.path(), &["opacity"]), "opacity: 0.20\n");

    let config = fs::read_to_string(tmp.path().join("config").join("config.toml")).unwrap();
    assert!(config.contains("[ui]"));
    assert!(config.contains("opacity = 0.2"));
}
