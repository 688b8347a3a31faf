// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Environment variables read by palaver.
//!
//! Use these accessors instead of calling `std::env::var()` directly.

/// Generated env var name constants.
mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

pub use names::*;

use std::path::PathBuf;

/// `PALAVER_CONFIG`: config file used when `--config` is absent.
pub fn config_file() -> Option<PathBuf> {
    var_path(names::PALAVER_CONFIG)
}

/// `PALAVER_HISTORY_FILE`: history file used when neither flag nor config names one.
pub fn history_file() -> Option<PathBuf> {
    var_path(names::PALAVER_HISTORY_FILE)
}

/// `PALAVER_SHELL_LINE_DELAY_MS`: pacing between shell output lines.
pub fn shell_line_delay_ms() -> Option<u64> {
    parse_u64(std::env::var(names::PALAVER_SHELL_LINE_DELAY_MS).ok())
}

/// `HOME`: User's home directory.
pub fn home() -> Option<PathBuf> {
    var_path(names::HOME)
}

/// Default config location under the home directory.
pub fn default_config_file() -> Option<PathBuf> {
    home().map(|h| h.join(".config").join("palaver").join("config.toml"))
}

fn var_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn parse_u64(value: Option<String>) -> Option<u64> {
    value.and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
