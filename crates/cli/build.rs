// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

// Build scripts are expected to panic on failure.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io::Write;

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let path = std::path::Path::new(&out_dir).join("env_names.rs");
    let mut f = std::fs::File::create(path).unwrap();

    let vars = [
        ("PALAVER_CONFIG", "PALAVER_CONFIG"),
        ("PALAVER_LOG", "PALAVER_LOG"),
        ("PALAVER_HISTORY_FILE", "PALAVER_HISTORY_FILE"),
        ("PALAVER_SHELL_LINE_DELAY_MS", "PALAVER_SHELL_LINE_DELAY_MS"),
        ("HOME", "HOME"),
    ];

    for (const_name, env_name) in vars {
        writeln!(f, "pub const {const_name}: &str = \"{env_name}\";").unwrap();
    }
}
