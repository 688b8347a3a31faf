// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use parking_lot::Mutex;

use super::*;

fn history() -> PromptHistory {
    PromptHistory::new(vec!["newest".into(), "middle".into(), "oldest".into()])
}

#[test]
fn persisted_entries_are_reversed() {
    assert_eq!(history().entries(), ["oldest", "middle", "newest"]);
}

#[test]
fn session_entries_follow_persisted_ones() {
    let mut history = history();
    history.record("first");
    history.record("second");
    assert_eq!(history.len(), 5);
    assert_eq!(history.session_entries(), ["first", "second"]);
    assert_eq!(history.navigate(Direction::Up).as_deref(), Some("second"));
}

#[test]
fn navigate_up_and_back_down() {
    let mut history = history();
    assert_eq!(history.navigate(Direction::Down), None);
    assert_eq!(history.navigate(Direction::Up).as_deref(), Some("newest"));
    assert_eq!(history.navigate(Direction::Up).as_deref(), Some("middle"));
    assert_eq!(history.navigate(Direction::Up).as_deref(), Some("oldest"));
    assert_eq!(history.navigate(Direction::Up), None);
    assert_eq!(history.navigate(Direction::Down).as_deref(), Some("middle"));
    assert_eq!(history.navigate(Direction::Down).as_deref(), Some("newest"));
    assert_eq!(history.navigate(Direction::Down).as_deref(), Some(""));
    assert!(!history.is_browsing());
}

#[test]
fn empty_history_never_navigates() {
    let mut history = PromptHistory::new(Vec::new());
    assert_eq!(history.navigate(Direction::Up), None);
}

#[test]
fn record_skips_blank_and_repeated_prompts() {
    let mut history = PromptHistory::new(Vec::new());
    history.record("  ");
    history.record("same");
    history.record("same");
    assert_eq!(history.entries(), ["same"]);
}

#[test]
fn recorder_sees_every_submitted_prompt() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut history = PromptHistory::new(Vec::new())
        .with_recorder(Box::new(move |p: &str| sink.lock().push(p.to_string())));
    history.record("one");
    history.record("");
    history.record("two");
    assert_eq!(*seen.lock(), vec!["one", "two"]);
}

#[test]
fn record_resets_navigation() {
    let mut history = history();
    history.navigate(Direction::Up);
    history.record("fresh");
    assert!(!history.is_browsing());
}

#[yare::parameterized(
    quick = { 0, 150, true },
    at_window_edge = { 1000, 1400, true },
    too_slow = { 0, 401, false },
)]
fn double_press_window(first: u64, second: u64, fires: bool) {
    let mut gate = DoublePressGate::new();
    assert!(!gate.press(Direction::Up, first));
    assert_eq!(gate.press(Direction::Up, second), fires);
}

#[test]
fn stale_press_rearms_the_window() {
    let mut gate = DoublePressGate::new();
    assert!(!gate.press(Direction::Up, 0));
    assert!(!gate.press(Direction::Up, 500));
    assert!(gate.is_armed());
    assert!(gate.press(Direction::Up, 600));
    assert!(!gate.is_armed());
}

#[test]
fn switching_direction_rearms() {
    let mut gate = DoublePressGate::new();
    assert!(!gate.press(Direction::Up, 0));
    assert!(!gate.press(Direction::Down, 100));
    assert!(gate.press(Direction::Down, 200));
}
