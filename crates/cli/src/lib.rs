// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Palaver: a terminal chat client for streaming LLM backends.
//!
//! The crate is split into a terminal-independent coordination layer
//! ([`session`], [`input`], [`completion`], [`commands`], [`viewport`]) and
//! the iocraft front end in [`tui`]. Backends and tool executors plug in
//! through the traits in [`backend`] and [`tools`]; the built-in
//! [`backend::ScriptedBackend`] replays canned replies from a script file.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod emoji;
pub mod env;
pub mod history;
pub mod input;
pub mod logging;
pub mod output;
pub mod session;
pub mod shell;
pub mod time;
pub mod tools;
pub mod transcript;
pub mod tui;
pub mod viewport;
