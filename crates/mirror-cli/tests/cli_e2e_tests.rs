//! CLI end-to-end tests that invoke the compiled `media-mirror` binary.

use assert_cmd::Command;
use mirror_test_utils::TestTree;
use predicates::prelude::*;

/// Get a Command for the media-mirror binary
fn mirror_cmd() -> Command {
    let mut cmd = Command::cargo_bin("media-mirror").expect("Failed to find media-mirror binary");
    cmd.env_remove("MEDIA_MIRROR_CONFIG").env("NO_COLOR", "1");
    cmd
}

fn sync_args(tree: &TestTree) -> Vec<String> {
    vec![
        "sync".to_string(),
        "--source".to_string(),
        tree.source().to_string_lossy().to_string(),
        "--target".to_string(),
        tree.target().to_string_lossy().to_string(),
        "--source-audio-extensions".to_string(),
        "mp3".to_string(),
        "--target-audio-extension".to_string(),
        "mp3".to_string(),
    ]
}

// ============================================================================
// Help and argument errors
// ============================================================================

#[test]
fn test_help_exits_zero() {
    mirror_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("records"));
}

#[test]
fn test_version_flag() {
    mirror_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("media-mirror"));
}

#[test]
fn test_missing_roots_exit_nonzero() {
    mirror_cmd()
        .arg("sync")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Source directory must be specified"));
}

// ============================================================================
// Sync runs
// ============================================================================

#[test]
fn test_sync_copies_then_skips() {
    let tree = TestTree::new();
    tree.write_source("song.mp3", b"0123456789");

    mirror_cmd()
        .args(sync_args(&tree))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 copied"))
        .stderr(predicate::str::contains("copy"));
    tree.assert_target_exists("song.mp3");

    mirror_cmd()
        .args(sync_args(&tree))
        .assert()
        .success()
        .stdout(predicate::str::contains("0 copied"))
        .stdout(predicate::str::contains("1 skipped"))
        .stderr(predicate::str::contains("skip"));
}

#[test]
fn test_sync_json_report() {
    let tree = TestTree::new();
    tree.write_source("song.mp3", b"x");

    let output = mirror_cmd()
        .args(sync_args(&tree))
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["success"], true);
    assert_eq!(report["actions"][0]["kind"], "copied");
    assert_eq!(report["actions"][0]["path"], "song.mp3");
}

#[test]
fn test_sync_dry_run_changes_nothing() {
    let tree = TestTree::new();
    tree.write_source("song.mp3", b"x");

    mirror_cmd()
        .args(sync_args(&tree))
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run complete"));

    assert!(!tree.target().exists());
}

#[cfg(unix)]
#[test]
fn test_failed_command_prints_command_and_output() {
    let tree = TestTree::new();
    tree.write_source("song.flac", b"x");

    mirror_cmd()
        .args([
            "sync",
            "--source",
            tree.source().to_str().unwrap(),
            "--target",
            tree.target().to_str().unwrap(),
            "--audio-command",
            r#"sh -c "echo decoder exploded >&2; exit 4""#,
        ])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("song.flac"))
        .stdout(predicate::str::contains("command: sh -c"))
        .stdout(predicate::str::contains("decoder exploded"))
        .stderr(predicate::str::contains("Synchronization failed"));

    // The record is still written, just without the failed file
    assert_eq!(tree.record_json()["entries"].as_array().unwrap().len(), 0);
}

#[test]
fn test_sync_from_config_file_with_delete() {
    let tree = TestTree::new();
    tree.write_source("A.mp3", b"a");
    tree.write_source("B.mp3", b"b");
    let config_path = tree.root().join("mirror.toml");
    std::fs::write(
        &config_path,
        format!(
            "source = {:?}\ntarget = {:?}\ndelete_removed = true\n\n[audio]\nextensions = [\"mp3\"]\ntarget_extension = \"mp3\"\n",
            tree.source().to_string_lossy(),
            tree.target().to_string_lossy()
        ),
    )
    .unwrap();

    mirror_cmd()
        .args(["sync", "--config", config_path.to_str().unwrap()])
        .assert()
        .success();

    tree.remove_source("A.mp3");

    mirror_cmd()
        .args(["sync", "--config", config_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 deleted"));

    tree.assert_target_missing("A.mp3");
    tree.assert_target_exists("B.mp3");
    tree.assert_target_exists(".syncdb.json");
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn test_records_lists_entries() {
    let tree = TestTree::new();
    tree.write_source("dir/song.mp3", b"x");
    mirror_cmd().args(sync_args(&tree)).assert().success();

    mirror_cmd()
        .args(["records", "--target", tree.target().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 recorded file(s)"))
        .stdout(predicate::str::contains("dir/song.mp3"));
}

#[test]
fn test_records_without_record() {
    let tree = TestTree::new();
    mirror_cmd()
        .args(["records", "--target", tree.source().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sync record"));
}
