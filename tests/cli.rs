//! End-to-end tests for the `chatview` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The binary with a clean environment: no color, no user config.
fn chatview(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chatview"));
    cmd.env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", config_dir.path())
        .env("HOME", config_dir.path())
        .arg("--no-color");
    cmd
}

#[test]
fn show_renders_merged_timeline() {
    let home = tempfile::tempdir().unwrap();
    chatview(&home)
        .arg("show")
        .arg(fixture_path("family_chat.json"))
        .arg(fixture_path("work_chat.json"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("== 2 Conversations ==\n"))
        .stdout(predicate::str::contains("Happy birthday Sam!"))
        .stdout(predicate::str::contains("standup moved to 10"));
}

#[test]
fn search_highlights_current_match() {
    let home = tempfile::tempdir().unwrap();
    chatview(&home)
        .args(["search", "dinner", "--match", "1"])
        .arg(fixture_path("family_chat.json"))
        .arg(fixture_path("work_chat.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("search: dinner (2 of 2)"))
        .stdout(predicate::str::contains("[Dinner] at 7?"))
        .stdout(predicate::str::contains("family [[dinner]]"));
}

#[test]
fn search_huge_match_step_wraps() {
    let home = tempfile::tempdir().unwrap();
    chatview(&home)
        .args(["search", "dinner", "--match", "9223372036854775807"])
        .arg(fixture_path("family_chat.json"))
        .arg(fixture_path("work_chat.json"))
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("search: dinner (2 of 2)"));
}

#[test]
fn search_json_output() {
    let home = tempfile::tempdir().unwrap();
    let output = chatview(&home)
        .args(["--json", "search", "welcome"])
        .arg(fixture_path("work_chat.json"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["title"], "Standup");
    assert_eq!(value["status"], "1 of 1");
    assert_eq!(value["messages"][0]["segments"][0]["kind"], "current_match");
}

#[test]
fn participants_lists_names_once() {
    let home = tempfile::tempdir().unwrap();
    chatview(&home)
        .arg("participants")
        .arg(fixture_path("family_chat.json"))
        .arg(fixture_path("work_chat.json"))
        .assert()
        .success()
        .stdout("Mom\nDad\nSam\nLee\n");
}

#[test]
fn broken_file_warns_and_continues() {
    let home = tempfile::tempdir().unwrap();
    chatview(&home)
        .arg("show")
        .arg(fixture_path("broken.json"))
        .arg(fixture_path("work_chat.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("broken.json"))
        .stdout(predicate::str::contains("Welcome back"));
}

#[test]
fn strict_mode_fails_with_parse_exit_code() {
    let home = tempfile::tempdir().unwrap();
    chatview(&home)
        .args(["--strict", "show"])
        .arg(fixture_path("broken.json"))
        .arg(fixture_path("work_chat.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid JSON in file broken.json"));
}

#[test]
fn missing_input_exit_code() {
    let home = tempfile::tempdir().unwrap();
    chatview(&home)
        .args(["show", "does/not/exist.json"])
        .assert()
        .code(3);
}

#[test]
fn directory_input_picks_up_json_files() {
    let home = tempfile::tempdir().unwrap();
    let archive = tempfile::tempdir().unwrap();
    let inbox = archive.path().join("inbox").join("standup");
    std::fs::create_dir_all(&inbox).unwrap();
    std::fs::copy(fixture_path("work_chat.json"), inbox.join("message_1.json")).unwrap();
    std::fs::write(inbox.join("notes.txt"), "not a thread").unwrap();

    chatview(&home)
        .arg("show")
        .arg(archive.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("== Standup ==\n"));
}

#[test]
fn config_file_sets_current_user() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("viewer.toml");
    std::fs::write(&config, "[viewer]\ncurrent_user = \"Lee\"\n").unwrap();

    chatview(&home)
        .arg("--config")
        .arg(&config)
        .arg("show")
        .arg(fixture_path("work_chat.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("> Welcome back"))
        .stdout(predicate::str::contains("Lee\n").not());
}

#[test]
fn invalid_config_exit_code() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("viewer.toml");
    std::fs::write(&config, "[viewer\n").unwrap();

    chatview(&home)
        .arg("--config")
        .arg(&config)
        .arg("show")
        .arg(fixture_path("work_chat.json"))
        .assert()
        .code(5);
}

#[test]
fn interactive_evaluates_last_query_and_navigates() {
    let home = tempfile::tempdir().unwrap();
    chatview(&home)
        .args(["interactive", "--debounce-ms", "2000"])
        .arg(fixture_path("family_chat.json"))
        .arg(fixture_path("work_chat.json"))
        .write_stdin("din\ndinner\n:n\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("search: dinner (2 of 2)"))
        .stdout(predicate::str::contains("search: din (").not());
}

#[test]
fn completions_generate() {
    let home = tempfile::tempdir().unwrap();
    chatview(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chatview"));
}
