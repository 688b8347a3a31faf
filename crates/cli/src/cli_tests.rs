// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

#[test]
fn parses_without_arguments() {
    let cli = Cli::try_parse_from(["palaver"]).unwrap();
    assert!(cli.provider.is_none());
    assert!(cli.model.is_none());
    assert!(!cli.no_tools);
}

#[test]
fn parses_session_flags() {
    let cli = Cli::try_parse_from([
        "palaver",
        "--provider",
        "scripted",
        "--model",
        "echo-large",
        "--auth",
        "api-key",
        "--theme",
        "light",
        "--emoji-filter",
        "warn",
    ])
    .unwrap();
    assert_eq!(cli.provider.as_deref(), Some("scripted"));
    assert_eq!(cli.model.as_deref(), Some("echo-large"));
    assert_eq!(cli.auth, Some(AuthMethod::ApiKey));
    assert_eq!(cli.theme, Some(ThemeName::Light));
    assert_eq!(cli.emoji_filter, Some(EmojiFilter::Warn));
}

#[test]
fn parses_paths_and_no_tools() {
    let cli = Cli::try_parse_from([
        "palaver",
        "--script",
        "s.toml",
        "--history-file",
        "h.jsonl",
        "--log-file",
        "p.log",
        "--cwd",
        "/tmp",
        "--no-tools",
    ])
    .unwrap();
    assert_eq!(cli.script, Some(PathBuf::from("s.toml")));
    assert_eq!(cli.history_file, Some(PathBuf::from("h.jsonl")));
    assert_eq!(cli.log_file, Some(PathBuf::from("p.log")));
    assert_eq!(cli.cwd, Some(PathBuf::from("/tmp")));
    assert!(cli.no_tools);
}

#[test]
fn rejects_unknown_auth() {
    assert!(Cli::try_parse_from(["palaver", "--auth", "password"]).is_err());
}
