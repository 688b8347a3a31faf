// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

fn buffer(text: &str, cursor: usize) -> InputBuffer {
    let mut buffer = InputBuffer::new();
    buffer.set_text(text, cursor);
    buffer
}

#[test]
fn insert_and_backspace_handle_multibyte() {
    let mut input = InputBuffer::new();
    input.insert_char('h');
    input.insert_char('é');
    input.insert_str("llo");
    assert_eq!(input.text(), "héllo");
    assert_eq!(input.cursor(), 6);

    for _ in 0..4 {
        input.move_left();
    }
    assert_eq!(input.cursor(), 1);
    assert!(input.delete());
    assert_eq!(input.text(), "hllo");
    assert!(input.backspace());
    assert_eq!(input.text(), "llo");
    assert!(!input.backspace());
}

#[test]
fn movement_stops_at_edges() {
    let mut input = buffer("ab", 2);
    assert!(!input.move_right());
    input.move_to_start();
    assert!(!input.move_left());
    assert!(input.delete());
    assert_eq!(input.text(), "b");
}

#[test]
fn delete_word_before_cursor() {
    let mut input = buffer("/stats model  ", 14);
    input.delete_word_before_cursor();
    assert_eq!(input.text(), "/stats ");
    assert_eq!(input.cursor(), 7);
    input.delete_word_before_cursor();
    assert_eq!(input.text(), "");
}

#[yare::parameterized(
    before = { true, "world" },
    after = { false, "hello " },
)]
fn line_clears(before: bool, expected: &str) {
    let mut input = buffer("hello world", 6);
    if before {
        input.clear_before_cursor();
    } else {
        input.clear_after_cursor();
    }
    assert_eq!(input.text(), expected);
}

#[test]
fn set_text_clamps_cursor() {
    let input = buffer("é", 1);
    assert_eq!(input.cursor_offset(), 0);
    let input = buffer("abc", 42);
    assert_eq!(input.cursor_offset(), 3);
}

#[test]
fn focus_and_clear() {
    let mut input = buffer("abc", 3);
    input.focus();
    assert!(input.is_focused());
    input.clear();
    assert!(input.is_empty());
    assert_eq!(input.cursor_offset(), 0);
}
