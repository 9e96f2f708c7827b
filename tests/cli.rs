use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mapscriber_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mapscriber").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd
}

fn write_script(dir: &TempDir, lines: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join("script.jsonl");
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}

#[test]
fn mapscriber_help_prints_usage() {
    let temp = TempDir::new().unwrap();
    mapscriber_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Replay map editor input against the gesture dispatcher",
        ));
}

#[test]
fn no_flags_prints_usage() {
    let temp = TempDir::new().unwrap();
    mapscriber_cmd(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("mapscriber --replay <FILE>"));
}

#[test]
fn replay_reports_click_on_feature() {
    let temp = TempDir::new().unwrap();
    let script = write_script(
        &temp,
        &[
            r#"{"type":"feature","feature":{"id":"a"},"center":{"x":10.0,"y":10.0},"radius":5.0}"#,
            r#"{"type":"mousedown","point":{"x":10.0,"y":10.0},"time":0}"#,
            r#"{"type":"mouseup","point":{"x":11.0,"y":10.0},"time":40}"#,
        ],
    );

    mapscriber_cmd(&temp)
        .arg("--replay")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""callback":"click""#))
        .stdout(predicate::str::contains(r#""feature":"a""#))
        .stdout(predicate::str::contains(r#""type":"actionable""#))
        .stdout(predicate::str::contains(r#""callback":"mouseup""#).not());
}

#[test]
fn replay_reports_drag_and_mode_change() {
    let temp = TempDir::new().unwrap();
    let script = write_script(
        &temp,
        &[
            "# press, drag far, release",
            r#"{"type":"mousedown","point":{"x":0.0,"y":0.0},"time":0}"#,
            r#"{"type":"mousemove","point":{"x":60.0,"y":0.0},"time":80,"buttons":1}"#,
            r#"{"type":"mouseup","point":{"x":60.0,"y":0.0},"time":120}"#,
            r#"{"type":"change_mode","mode":"static"}"#,
        ],
    );

    mapscriber_cmd(&temp)
        .arg("--replay")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""callback":"drag""#))
        .stdout(predicate::str::contains(r#""callback":"mouseup""#))
        .stdout(predicate::str::contains(r#"{"type":"modechange","mode":"static"}"#));
}

#[test]
fn no_touch_ignores_touch_input() {
    let temp = TempDir::new().unwrap();
    let script = write_script(
        &temp,
        &[
            r#"{"type":"touchstart","point":{"x":0.0,"y":0.0},"time":0}"#,
            r#"{"type":"touchend","point":{"x":0.0,"y":0.0},"time":10}"#,
        ],
    );

    mapscriber_cmd(&temp)
        .args(["--no-touch", "--replay"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("touch").not())
        .stdout(predicate::str::contains(r#""callback":"tap""#).not());
}

#[test]
fn config_file_sets_start_mode() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("custom.toml");
    std::fs::write(&config, "[interaction]\ndefault_mode = \"static\"\n").unwrap();
    let script = write_script(&temp, &[r#"{"type":"fire","name":"keydown","event":{"key":"a"}}"#]);

    mapscriber_cmd(&temp)
        .arg("--config")
        .arg(&config)
        .arg("--replay")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""mode":"static","callback":"start""#))
        .stdout(predicate::str::contains(r#""callback":"keydown""#));
}

#[test]
fn unknown_start_mode_fails() {
    let temp = TempDir::new().unwrap();
    let script = write_script(&temp, &[]);

    mapscriber_cmd(&temp)
        .args(["--mode", "draw_circle", "--replay"])
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("draw_circle is not a valid mode"));
}

#[test]
fn malformed_script_line_fails_with_location() {
    let temp = TempDir::new().unwrap();
    let script = write_script(
        &temp,
        &[
            r#"{"type":"mouseout","point":{"x":0.0,"y":0.0}}"#,
            "not json",
        ],
    );

    mapscriber_cmd(&temp)
        .arg("--replay")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("script.jsonl:2"))
        .stderr(predicate::str::contains("Invalid JSON"));
}
