//! Integration tests for the memo-lab binary

use super::common::{advance, render, write_tape};
use assert_cmd::Command;
use memo_lab::ScriptEvent;
use predicates::prelude::*;
use tempfile::TempDir;

fn memo_lab(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("memo-lab").expect("binary builds");
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

#[test]
fn test_lists_bundled_walkthroughs() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    memo_lab(&dir)
        .arg("steps")
        .assert()
        .success()
        .stdout(predicate::str::contains("broken-memo"))
        .stdout(predicate::str::contains("context-memo"))
        .stdout(predicate::str::contains("children-memo"))
        .stdout(predicate::str::contains("component-composition"))
        .stdout(predicate::str::contains("effective-memo"))
        .stdout(predicate::str::contains("latest-ref"));

    // First run writes the example config
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_lists_steps_of_walkthrough() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    memo_lab(&dir)
        .args(["steps", "broken-memo"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1. Baseline (baseline) next=memoiseProp [needs trigger]",
        ))
        .stdout(predicate::str::contains(
            "4. Prop with dependency (memoisePropWithDependency) back=memoiseComponent",
        ));
}

#[test]
fn test_unknown_walkthrough_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    memo_lab(&dir)
        .args(["steps", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown walkthrough: missing"));
}

#[test]
fn test_replay_prints_trace() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = dir.path().join("fast.toml");
    std::fs::write(&config, "[tracker]\ndecay_ms = 20\n").expect("write config");

    let tape = write_tape(
        dir.path(),
        vec![
            render("ProductList"),
            render("ProductList"),
            advance(200),
            ScriptEvent::Back,
        ],
    );

    memo_lab(&dir)
        .arg("--config")
        .arg(&config)
        .arg("replay")
        .arg("broken-memo")
        .arg(&tape)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "#1 render ProductList | baseline | ProductList=1\n",
        ))
        .stdout(predicate::str::contains(
            "#2 render ProductList | baseline | ProductList=2*\n",
        ))
        .stdout(predicate::str::contains(
            "#3 advance 200ms | baseline | ProductList=2\n",
        ))
        .stdout(predicate::str::contains(
            "error: No back transition from step baseline",
        ));
}

#[test]
fn test_replay_json_output() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let tape = write_tape(dir.path(), vec![ScriptEvent::Trigger { step: None }]);

    memo_lab(&dir)
        .arg("replay")
        .arg("broken-memo")
        .arg(&tape)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""event":{"type":"trigger"}"#))
        .stdout(predicate::str::contains(r#""trigger_observed":true"#))
        .stdout(predicate::str::contains(r#""can_advance":true"#));
}

#[test]
fn test_replay_rejects_tape_without_header() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let tape = dir.path().join("bad.jsonl");
    std::fs::write(&tape, "{\"type\":\"next\"}\n").expect("write tape");

    memo_lab(&dir)
        .arg("replay")
        .arg("broken-memo")
        .arg(&tape)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read script tape"));
}

#[test]
fn test_decay_flag_overrides_config() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let tape = write_tape(
        dir.path(),
        vec![render("ProductList"), render("ProductList"), advance(30)],
    );

    memo_lab(&dir)
        .args(["--decay-ms", "20", "replay", "broken-memo"])
        .arg(&tape)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "#2 render ProductList | baseline | ProductList=2*\n",
        ))
        .stdout(predicate::str::contains(
            "#3 advance 30ms | baseline | ProductList=2\n",
        ));
}

#[test]
fn test_walkthroughs_flag_loads_custom_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let lessons = dir.path().join("lessons.toml");
    std::fs::write(
        &lessons,
        "[[walkthrough]]\nid = \"custom\"\ntitle = \"Custom lesson\"\n\n\
         [[walkthrough.step]]\nid = \"only\"\nlabel = \"Only step\"\n",
    )
    .expect("write walkthroughs");

    memo_lab(&dir)
        .arg("--walkthroughs")
        .arg(&lessons)
        .arg("steps")
        .assert()
        .success()
        .stdout(predicate::str::contains("custom\tCustom lesson"))
        .stdout(predicate::str::contains("broken-memo").not());
}
