// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use parking_lot::Mutex;

use super::*;
use crate::completion::slash::CommandNode;
use crate::input::{InputBuffer, TextInput};

const MODES: &[CommandNode] = &[
    CommandNode::leaf("fast", "Go fast"),
    CommandNode::leaf("slow", "Go slow"),
];

const ROOTS: &[CommandNode] = &[
    CommandNode::leaf("help", "Show help"),
    CommandNode::branch("mode", "Pick a mode", MODES),
    CommandNode::leaf("exit", "Quit"),
];

fn setup(text: &str) -> (Arc<Mutex<InputBuffer>>, CompletionManager) {
    let buffer = Arc::new(Mutex::new(InputBuffer::new()));
    buffer.lock().set_text(text, text.len());
    let index = SuggestionIndex::new(
        ["docs/", "docs/guide.md", "main.rs"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    let manager = CompletionManager::new(
        InputHandle::attached(buffer.clone()),
        SlashTree::new(ROOTS),
        index,
    );
    (buffer, manager)
}

fn labels(manager: &CompletionManager) -> Vec<String> {
    manager
        .state()
        .suggestions
        .iter()
        .map(|s| s.label().to_string())
        .collect()
}

#[test]
fn slash_refresh_lists_matches() {
    let (_buffer, mut manager) = setup("/");
    manager.refresh();
    assert_eq!(manager.mode(), CompletionMode::Slash);
    assert_eq!(labels(&manager), vec!["/help", "/mode", "/exit"]);
    assert_eq!(manager.state().replace_span, Some(Span { start: 0, end: 1 }));
}

#[test]
fn refresh_is_idempotent_and_resets_selection() {
    let (_buffer, mut manager) = setup("/");
    manager.refresh();
    manager.move_selection(2);
    assert_eq!(manager.state().selected, 2);

    manager.refresh();
    let first = manager.state().clone();
    manager.refresh();
    assert_eq!(manager.state(), &first);
    assert_eq!(manager.state().selected, 0);
}

#[test]
fn move_selection_clamps() {
    let (_buffer, mut manager) = setup("/");
    manager.refresh();
    manager.move_selection(-3);
    assert_eq!(manager.state().selected, 0);
    manager.move_selection(10);
    assert_eq!(manager.state().selected, 2);
}

#[test]
fn move_selection_on_empty_list_is_noop() {
    let (_buffer, mut manager) = setup("plain text");
    manager.refresh();
    manager.move_selection(1);
    assert_eq!(manager.state(), &CompletionState::default());
}

#[test]
fn applying_branch_drills_down() {
    let (buffer, mut manager) = setup("/mo");
    manager.refresh();
    assert!(manager.apply_selection());
    assert_eq!(buffer.lock().text(), "/mode ");
    assert_eq!(buffer.lock().cursor(), 6);
    assert_eq!(labels(&manager), vec!["/mode fast", "/mode slow"]);
}

#[test]
fn applying_leaf_closes_menu() {
    let (buffer, mut manager) = setup("/mode sl");
    manager.refresh();
    assert!(manager.apply_selection());
    assert_eq!(buffer.lock().text(), "/mode slow ");
    assert!(!manager.is_open());
    assert_eq!(manager.mode(), CompletionMode::None);
}

#[test]
fn slash_apply_keeps_text_after_cursor() {
    let (buffer, mut manager) = setup("/he");
    buffer.lock().set_text("/he\nnext line", 3);
    manager.refresh();
    assert!(manager.apply_selection());
    assert_eq!(buffer.lock().text(), "/help \nnext line");
    assert_eq!(buffer.lock().cursor(), 6);
}

#[test]
fn mention_file_gets_trailing_space() {
    let (buffer, mut manager) = setup("see @ma");
    manager.refresh();
    assert_eq!(manager.mode(), CompletionMode::Mention);
    assert_eq!(manager.state().replace_span, None);
    assert!(manager.apply_selection());
    assert_eq!(buffer.lock().text(), "see @main.rs ");
    assert!(!manager.is_open());
}

#[test]
fn mention_directory_drills_down_without_space() {
    let (buffer, mut manager) = setup("@do");
    manager.refresh();
    assert!(manager.apply_selection());
    assert_eq!(buffer.lock().text(), "@docs/");
    assert_eq!(labels(&manager), vec!["docs/guide.md"]);
}

#[test]
fn detached_input_makes_everything_a_noop() {
    let (_buffer, mut manager) = setup("/");
    manager.refresh();
    manager.input.detach();

    manager.move_selection(1);
    assert_eq!(manager.state().selected, 0);
    assert!(!manager.apply_selection());
    manager.refresh();
    assert!(!manager.is_open());
}

#[test]
fn visible_window_follows_selection() {
    let (_buffer, manager) = setup("/");
    let mut manager = manager.with_page_size(50);
    manager.refresh();
    let (start, rows) = manager.visible(2);
    assert_eq!((start, rows.len()), (0, 2));
    manager.move_selection(2);
    let (start, rows) = manager.visible(2);
    assert_eq!(start, 1);
    assert_eq!(rows[1].label(), "/exit");
}
