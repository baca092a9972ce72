use std::{fs, process::Command};

fn maze_rescue() -> Command {
    Command::new(env!("CARGO_BIN_EXE_maze-rescue"))
}

#[test]
fn short_run_prints_an_unsettled_json_report() {
    let output = maze_rescue()
        .args(["--max-frames", "30", "--json", "--mute"])
        .output()
        .expect("failed to launch maze-rescue");

    assert!(output.status.success(), "short run should exit cleanly");
    let stdout = String::from_utf8(output.stdout).expect("report is utf-8");
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("report is json");
    assert_eq!(report["frames"], 30);
    assert_eq!(report["stage"], 1);
    assert_eq!(report["phase"], "Playing");
    assert!(
        report["outcome"].is_null(),
        "run cannot settle in 30 frames"
    );
}

#[test]
fn unknown_stage_is_reported() {
    let output = maze_rescue()
        .args(["--stage", "9"])
        .output()
        .expect("failed to launch maze-rescue");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("stage 9"),
        "error should name the stage: {stderr}"
    );
}

#[test]
fn malformed_tuning_file_is_rejected() {
    let name = format!("maze-rescue-tuning-{}.toml", std::process::id());
    let path = std::env::temp_dir().join(name);
    fs::write(&path, "player_speed = 3\n").expect("temp file is writable");

    let output = maze_rescue()
        .arg("--tuning")
        .arg(&path)
        .output()
        .expect("failed to launch maze-rescue");
    let _ = fs::remove_file(&path);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid tuning file"), "stderr: {stderr}");
}
