// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

#[test]
fn frames_advance_and_wrap() {
    let mut spinner = Spinner::with_verb("Musing");
    assert_eq!(spinner.frame(), "⠋");
    spinner.advance();
    assert_eq!(spinner.frame(), "⠙");

    for _ in 1..FRAMES.len() {
        spinner.advance();
    }
    assert_eq!(spinner.frame(), "⠋");
}

#[test]
fn advancing_keeps_the_verb() {
    let mut spinner = Spinner::start();
    let verb = spinner.verb();
    assert!(VERBS.contains(&verb));
    spinner.advance();
    assert_eq!(spinner.verb(), verb);
}
