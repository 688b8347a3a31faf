// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

#[test]
fn advance_supersedes_previous_run() {
    let generation = Generation::new();
    let first = generation.advance();
    assert!(generation.is_current(first));
    let second = generation.advance();
    assert!(second > first);
    assert!(!generation.is_current(first));
    assert!(generation.is_current(second));
}

#[test]
fn clones_share_the_counter() {
    let generation = Generation::new();
    let run = generation.advance();
    generation.clone().advance();
    assert!(!generation.is_current(run));
}

#[test]
fn run_id_display() {
    assert_eq!(RunId(7).to_string(), "run-7");
}
