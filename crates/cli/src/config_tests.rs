// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use clap::Parser;
use rstest::rstest;
use std::io::Write;

fn complete_session() -> SessionConfig {
    SessionConfig {
        provider: Some("scripted".into()),
        model: Some("echo-small".into()),
        auth: Some(AuthMethod::Local),
        ..SessionConfig::default()
    }
}

#[test]
fn complete_session_has_no_missing_fields() {
    assert!(validate_session_config(&complete_session()).is_empty());
}

#[test]
fn empty_session_reports_every_missing_field_in_order() {
    let missing = validate_session_config(&SessionConfig::default());
    assert_eq!(
        missing,
        vec![
            "No provider selected (use /provider)",
            "No model selected (use /model)",
            "No authentication method selected (use /auth)",
        ]
    );
}

#[test]
fn blank_model_counts_as_missing() {
    let config = SessionConfig {
        model: Some("  ".into()),
        ..complete_session()
    };
    assert_eq!(
        validate_session_config(&config),
        vec!["No model selected (use /model)"]
    );
}

#[rstest]
#[case("auto", EmojiFilter::Auto)]
#[case("ALLOWED", EmojiFilter::Allowed)]
#[case(" warn ", EmojiFilter::Warn)]
fn emoji_filter_parses_case_insensitively(#[case] raw: &str, #[case] expected: EmojiFilter) {
    assert_eq!(raw.parse::<EmojiFilter>().unwrap(), expected);
}

#[test]
fn unknown_choice_lists_expected_values() {
    let err = "sepia".parse::<ThemeName>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unknown theme 'sepia': expected one of dark, light, mono"
    );
}

#[test]
fn auth_method_round_trips_through_display() {
    for method in AuthMethod::ALL {
        assert_eq!(method.to_string().parse::<AuthMethod>().unwrap(), *method);
    }
}

#[test]
fn parses_full_config_file() {
    let config = PalaverConfig::parse(
        r#"
        provider = "scripted"
        model = "echo-large"
        auth = "oauth"
        theme = "light"
        emoji_filter = "warn"
        show_thinking = false

        [streaming]
        tokens_per_second = 0
        chunk_size = 8
        "#,
    )
    .unwrap();

    assert_eq!(config.provider.as_deref(), Some("scripted"));
    assert_eq!(config.auth, Some(AuthMethod::OAuth));
    assert_eq!(config.theme, Some(ThemeName::Light));
    assert_eq!(config.emoji_filter, Some(EmojiFilter::Warn));
    assert!(!config.show_thinking);
    assert_eq!(config.streaming.tokens_per_second, 0);
    assert_eq!(config.streaming.chunk_size, 8);
    assert_eq!(config.streaming.line_delay_ms, DEFAULT_LINE_DELAY_MS);
}

#[test]
fn rejects_unknown_fields() {
    assert!(PalaverConfig::parse("colour = \"red\"").is_err());
    assert!(PalaverConfig::parse("[streaming]\nspeed = 3").is_err());
}

#[test]
fn empty_file_uses_defaults() {
    let config = PalaverConfig::parse("").unwrap();
    assert!(config.show_thinking);
    assert_eq!(config.streaming, StreamingSettings::default());
}

#[test]
fn load_resolves_relative_paths_against_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("palaver.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "script = \"script.toml\"").unwrap();
    writeln!(file, "history_file = \"/abs/history.jsonl\"").unwrap();
    drop(file);

    let config = PalaverConfig::load(&path).unwrap();
    assert_eq!(config.script, Some(dir.path().join("script.toml")));
    assert_eq!(config.history_file, Some(PathBuf::from("/abs/history.jsonl")));
}

#[test]
fn load_reports_missing_file() {
    let err = PalaverConfig::load(Path::new("/nonexistent/palaver.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn load_reports_parse_errors_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "provider = [").unwrap();
    let err = PalaverConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn cli_flags_override_file_values() {
    let cli = Cli::try_parse_from([
        "palaver",
        "--model",
        "echo-large",
        "--theme",
        "mono",
        "--no-tools",
        "--cwd",
        "/work",
    ])
    .unwrap();
    let file = PalaverConfig {
        provider: Some("scripted".into()),
        model: Some("echo-small".into()),
        theme: Some(ThemeName::Light),
        ..PalaverConfig::default()
    };

    let settings = Settings::resolve(&cli, file);
    assert_eq!(settings.session.provider.as_deref(), Some("scripted"));
    assert_eq!(settings.session.model.as_deref(), Some("echo-large"));
    assert_eq!(settings.session.theme, ThemeName::Mono);
    assert_eq!(settings.session.emoji_filter, EmojiFilter::Auto);
    assert!(settings.session.show_thinking);
    assert!(!settings.tools_enabled);
    assert_eq!(settings.working_directory, PathBuf::from("/work"));
}
