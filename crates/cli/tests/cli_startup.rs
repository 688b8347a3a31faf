// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Startup paths of the binary that finish before the terminal UI opens.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::write_temp;

fn palaver() -> Command {
    let mut cmd = Command::cargo_bin("palaver").unwrap();
    cmd.env_remove("PALAVER_CONFIG");
    cmd
}

#[test]
fn help_lists_flags() {
    palaver()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--script"))
        .stdout(predicate::str::contains("--no-tools"))
        .stdout(predicate::str::contains("--history-file"));
}

#[test]
fn version_is_printed() {
    palaver()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("palaver "));
}

#[test]
fn unknown_theme_is_rejected_by_the_parser() {
    palaver()
        .args(["--theme", "neon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("neon"));
}

#[test]
fn unparsable_config_exits_nonzero() {
    let config = write_temp("provider = [not toml", ".toml");
    palaver()
        .arg("--config")
        .arg(config.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn unknown_config_field_exits_nonzero() {
    let config = write_temp("colour = \"red\"\n", ".toml");
    palaver()
        .arg("--config")
        .arg(config.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("colour"));
}

#[test]
fn missing_config_file_exits_nonzero() {
    palaver()
        .args(["--config", "/nonexistent/palaver.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn broken_script_exits_nonzero() {
    let script = write_temp("[[rules]]\npattern = 3\n", ".toml");
    palaver()
        .arg("--script")
        .arg(script.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse script"));
}
