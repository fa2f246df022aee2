//! Command-line behaviour of the binary

use std::process::Command;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_segment-leaderboard"))
}

#[test]
fn test_failure_is_reported_once_with_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");

    let output = binary()
        .arg("check")
        .arg("--config")
        .arg(&missing)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("failed to load").count(), 1, "stderr: {}", stderr);
    assert!(!stderr.contains("Error: "), "stderr: {}", stderr);
}

#[test]
fn test_check_accepts_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.json");
    std::fs::write(
        &path,
        r#"{
            "segments": [1, "2"],
            "points": [10, 5],
            "participation_points": 1,
            "unmatched_participation_points": 1,
            "runs": [{"output_file": "overall.csv", "options": ["filter=overall"]}]
        }"#,
    )
    .unwrap();

    let output = binary().arg("check").arg("--config").arg(&path).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Would crawl 2 segment/option pairs"));
}
