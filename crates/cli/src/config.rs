// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Configuration: the TOML config file, its merge with CLI flags, and the
//! [`SessionConfig`] contract handed to the backend.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use clap::ValueEnum;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;
use crate::env;

/// Default pacing for scripted text deltas
pub const DEFAULT_TOKENS_PER_SECOND: u32 = 60;
/// Default characters per scripted text delta
pub const DEFAULT_CHUNK_SIZE: usize = 4;
/// Default delay between shell output lines
pub const DEFAULT_LINE_DELAY_MS: u64 = 30;
/// Default random jitter added to each shell line delay
pub const DEFAULT_LINE_JITTER_MS: u64 = 20;

/// Errors raised while loading or interpreting configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unknown {kind} '{value}': expected one of {expected}")]
    UnknownValue {
        kind: &'static str,
        value: String,
        expected: String,
    },
}

fn unknown_value<T: Choice>(kind: &'static str, value: &str) -> ConfigError {
    ConfigError::UnknownValue {
        kind,
        value: value.to_string(),
        expected: T::ALL
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// A closed set of named settings values
pub trait Choice: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn parse_choice(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
    }
}

/// How the session authenticates with its provider
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethod {
    /// API key from the environment
    ApiKey,
    /// Browser-based OAuth login
    #[value(name = "oauth")]
    #[serde(rename = "oauth")]
    OAuth,
    /// Local model, no credentials
    Local,
}

impl Choice for AuthMethod {
    const ALL: &'static [Self] = &[AuthMethod::ApiKey, AuthMethod::OAuth, AuthMethod::Local];

    fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::ApiKey => "api-key",
            AuthMethod::OAuth => "oauth",
            AuthMethod::Local => "local",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            AuthMethod::ApiKey => "API key from the environment",
            AuthMethod::OAuth => "Sign in through the browser",
            AuthMethod::Local => "Local model, no credentials",
        }
    }
}

/// Color theme for the terminal UI
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    Mono,
}

impl Choice for ThemeName {
    const ALL: &'static [Self] = &[ThemeName::Dark, ThemeName::Light, ThemeName::Mono];

    fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Dark => "dark",
            ThemeName::Light => "light",
            ThemeName::Mono => "mono",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ThemeName::Dark => "Light text on a dark terminal",
            ThemeName::Light => "Dark text on a light terminal",
            ThemeName::Mono => "No colors",
        }
    }
}

/// Emoji handling for model text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EmojiFilter {
    /// Strip emoji before display
    #[default]
    Auto,
    /// Show emoji unchanged
    Allowed,
    /// Show emoji and warn once per response
    Warn,
}

impl Choice for EmojiFilter {
    const ALL: &'static [Self] = &[EmojiFilter::Auto, EmojiFilter::Allowed, EmojiFilter::Warn];

    fn as_str(&self) -> &'static str {
        match self {
            EmojiFilter::Auto => "auto",
            EmojiFilter::Allowed => "allowed",
            EmojiFilter::Warn => "warn",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            EmojiFilter::Auto => "Strip emoji from responses",
            EmojiFilter::Allowed => "Show emoji unchanged",
            EmojiFilter::Warn => "Show emoji, warn once per response",
        }
    }
}

macro_rules! choice_impls {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Choice>::parse_choice(s).ok_or_else(|| unknown_value::<$ty>($kind, s))
            }
        }
    };
}

choice_impls!(AuthMethod, "auth method");
choice_impls!(ThemeName, "theme");
choice_impls!(EmojiFilter, "emoji filter");

/// Configuration the backend collaborator consumes for each turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub auth: Option<AuthMethod>,
    pub emoji_filter: EmojiFilter,
    pub show_thinking: bool,
    pub theme: ThemeName,
}

/// Session config shared between the UI, commands and the controller
pub type SharedSessionConfig = Arc<Mutex<SessionConfig>>;

/// Human-readable messages for every required field that is missing.
///
/// An empty list means the session can talk to the backend.
pub fn validate_session_config(config: &SessionConfig) -> Vec<String> {
    let mut missing = Vec::new();
    if config.provider.as_deref().map_or(true, |p| p.trim().is_empty()) {
        missing.push("No provider selected (use /provider)".to_string());
    }
    if config.model.as_deref().map_or(true, |m| m.trim().is_empty()) {
        missing.push("No model selected (use /model)".to_string());
    }
    if config.auth.is_none() {
        missing.push("No authentication method selected (use /auth)".to_string());
    }
    missing
}

fn default_show_thinking() -> bool {
    true
}

/// Pacing settings for simulated output
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct StreamingSettings {
    /// Text chunks emitted per second (0 = instant)
    pub tokens_per_second: u32,
    /// Characters per text chunk
    pub chunk_size: usize,
    /// Base delay between shell output lines
    pub line_delay_ms: u64,
    /// Random extra delay per shell line, up to this value
    pub line_jitter_ms: u64,
}

impl Default for StreamingSettings {
    fn default() -> Self {
        Self {
            tokens_per_second: DEFAULT_TOKENS_PER_SECOND,
            chunk_size: DEFAULT_CHUNK_SIZE,
            line_delay_ms: DEFAULT_LINE_DELAY_MS,
            line_jitter_ms: DEFAULT_LINE_JITTER_MS,
        }
    }
}

/// Contents of the TOML config file
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PalaverConfig {
    #[serde(default)]
    pub provider: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub auth: Option<AuthMethod>,

    #[serde(default)]
    pub theme: Option<ThemeName>,

    #[serde(default)]
    pub emoji_filter: Option<EmojiFilter>,

    /// Show thinking deltas in the transcript (default: true)
    #[serde(default = "default_show_thinking")]
    pub show_thinking: bool,

    #[serde(default)]
    pub history_file: Option<PathBuf>,

    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Scripted backend file, relative to this config file
    #[serde(default)]
    pub script: Option<PathBuf>,

    #[serde(default)]
    pub working_directory: Option<PathBuf>,

    #[serde(default)]
    pub streaming: StreamingSettings,
}

impl Default for PalaverConfig {
    fn default() -> Self {
        Self {
            provider: None,
            model: None,
            auth: None,
            theme: None,
            emoji_filter: None,
            show_thinking: default_show_thinking(),
            history_file: None,
            log_file: None,
            script: None,
            working_directory: None,
            streaming: StreamingSettings::default(),
        }
    }
}

impl PalaverConfig {
    /// Load and parse a config file.
    ///
    /// Relative paths inside the file resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.resolve_relative_paths(base);
        }
        Ok(config)
    }

    /// Parse TOML text without touching the filesystem
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn resolve_relative_paths(&mut self, base: &Path) {
        for path in [
            &mut self.script,
            &mut self.history_file,
            &mut self.log_file,
            &mut self.working_directory,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Locate the config file for this invocation.
    ///
    /// `--config` must exist; `PALAVER_CONFIG` and the default location are
    /// used only when present.
    pub fn discover(cli: &Cli) -> Result<Self, ConfigError> {
        if let Some(ref path) = cli.config {
            return Self::load(path);
        }
        let candidate = env::config_file().or_else(env::default_config_file);
        match candidate {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// Fully resolved settings: CLI flags over config file over defaults
#[derive(Clone, Debug)]
pub struct Settings {
    pub session: SessionConfig,
    pub history_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub working_directory: PathBuf,
    pub streaming: StreamingSettings,
    pub tools_enabled: bool,
}

impl Settings {
    pub fn resolve(cli: &Cli, file: PalaverConfig) -> Self {
        let session = SessionConfig {
            provider: cli.provider.clone().or(file.provider),
            model: cli.model.clone().or(file.model),
            auth: cli.auth.or(file.auth),
            emoji_filter: cli.emoji_filter.or(file.emoji_filter).unwrap_or_default(),
            show_thinking: file.show_thinking,
            theme: cli.theme.or(file.theme).unwrap_or_default(),
        };

        let working_directory = cli
            .cwd
            .clone()
            .or(file.working_directory)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            session,
            history_file: cli
                .history_file
                .clone()
                .or(file.history_file)
                .or_else(env::history_file),
            log_file: cli.log_file.clone().or(file.log_file),
            script: cli.script.clone().or(file.script),
            working_directory,
            streaming: file.streaming,
            tools_enabled: !cli.no_tools,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
