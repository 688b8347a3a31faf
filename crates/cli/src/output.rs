// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Diagnostics printed to stderr outside the TUI.
//!
//! Once the terminal UI owns the screen, errors go to the transcript
//! instead; these helpers cover startup and shutdown.

use std::io::{self, IsTerminal, Write};

/// Severity of a diagnostic line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Error => "Error",
            Level::Warning => "Warning",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warning => "\x1b[33m",
        }
    }
}

/// Print an error to stderr, in red on a terminal.
pub fn print_error(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_diagnostic(&mut io::stderr(), Level::Error, msg, is_tty);
}

/// Print a warning to stderr, in yellow on a terminal.
pub fn print_warning(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_diagnostic(&mut io::stderr(), Level::Warning, msg, is_tty);
}

fn write_diagnostic<W: Write>(
    writer: &mut W,
    level: Level,
    msg: impl std::fmt::Display,
    is_terminal: bool,
) {
    if is_terminal {
        let _ = writeln!(writer, "{}{}: {}\x1b[0m", level.color(), level.label(), msg);
    } else {
        let _ = writeln!(writer, "{}: {}", level.label(), msg);
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
