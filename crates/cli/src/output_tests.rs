// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

fn render(level: Level, msg: &str, is_terminal: bool) -> String {
    let mut buf = Vec::new();
    write_diagnostic(&mut buf, level, msg, is_terminal);
    String::from_utf8(buf).unwrap()
}

#[yare::parameterized(
    error_plain = { Level::Error, false, "Error: bad config\n" },
    error_tty = { Level::Error, true, "\x1b[31mError: bad config\x1b[0m\n" },
    warning_plain = { Level::Warning, false, "Warning: bad config\n" },
    warning_tty = { Level::Warning, true, "\x1b[33mWarning: bad config\x1b[0m\n" },
)]
fn formats_diagnostics(level: Level, tty: bool, expected: &str) {
    assert_eq!(render(level, "bad config", tty), expected);
}
