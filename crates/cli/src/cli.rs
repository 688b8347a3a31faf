// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{AuthMethod, EmojiFilter, ThemeName};

/// Terminal chat client
#[derive(Parser, Clone, Debug, Default)]
#[command(name = "palaver", version, about = "Terminal chat client")]
pub struct Cli {
    /// Config file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Provider to talk to
    #[arg(long)]
    pub provider: Option<String>,

    /// Model to use
    #[arg(long)]
    pub model: Option<String>,

    /// Authentication method
    #[arg(long, value_enum)]
    pub auth: Option<AuthMethod>,

    /// Color theme
    #[arg(long, value_enum)]
    pub theme: Option<ThemeName>,

    /// Emoji handling for model output
    #[arg(long = "emoji-filter", value_enum)]
    pub emoji_filter: Option<EmojiFilter>,

    /// Script file for the built-in scripted backend (TOML or JSON)
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Prompt history file (JSONL)
    #[arg(long, value_name = "PATH")]
    pub history_file: Option<PathBuf>,

    /// Write logs to this file (filter with PALAVER_LOG)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Working directory for tools and @-mentions
    #[arg(long = "cwd", value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Disable tool execution
    #[arg(long)]
    pub no_tools: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
