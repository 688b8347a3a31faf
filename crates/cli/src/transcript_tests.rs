// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use serde_json::json;

fn transcript() -> Transcript {
    Transcript::new(IdGenerator::new())
}

#[test]
fn ids_are_monotonic_across_entry_kinds() {
    let mut t = transcript();
    let a = t.append_message(Role::User, "hi");
    let b = t.append_tool_call("c1", "read_file", json!({}));
    let c = t.append_tool_block(ToolBlockOptions::default());
    assert!(a < b && b < c);
}

#[test]
fn generators_are_independent() {
    let mut first = Transcript::new(IdGenerator::new());
    let mut second = Transcript::new(IdGenerator::new());
    assert_eq!(first.append_message(Role::User, "a"), EntryId(0));
    assert_eq!(second.append_message(Role::User, "b"), EntryId(0));
}

#[test]
fn shared_generator_keeps_ids_unique() {
    let ids = IdGenerator::starting_at(10);
    let mut first = Transcript::new(ids.clone());
    let mut second = Transcript::new(ids);
    assert_eq!(first.append_message(Role::User, "a"), EntryId(10));
    assert_eq!(second.append_message(Role::User, "b"), EntryId(11));
}

#[test]
fn append_to_message_grows_text_in_place() {
    let mut t = transcript();
    let id = t.append_message(Role::Model, "Hel");
    t.append_message(Role::System, "note");
    assert!(t.append_to_message(id, "lo"));

    assert_eq!(
        t.entries()[0],
        ChatEntry::Message {
            id,
            role: Role::Model,
            text: "Hello".into()
        }
    );
    assert_eq!(t.len(), 2);
}

#[test]
fn append_to_non_message_is_rejected() {
    let mut t = transcript();
    let block = t.append_tool_block(ToolBlockOptions::default());
    assert!(!t.append_to_message(block, "x"));
    assert!(!t.append_to_message(EntryId(99), "x"));
}

#[test]
fn tool_block_streams_lines_then_finishes() {
    let mut t = transcript();
    let id = t.append_tool_block(ToolBlockOptions {
        scrollable: true,
        max_height: Some(10),
        ..ToolBlockOptions::default()
    });
    t.append_tool_block_line(id, "one");
    t.append_tool_block_line(id, "two");
    assert!(t.finish_tool_block(id));

    let ChatEntry::ToolBlock(block) = &t.entries()[0] else {
        panic!("expected tool block");
    };
    assert_eq!(block.lines, vec!["one", "two"]);
    assert!(!block.streaming);
    assert_eq!(block.max_height, Some(10));
}

#[test]
fn update_tool_call_merges_partial_fields() {
    let mut t = transcript();
    t.append_tool_call("c1", "read_file", json!({"path": "a"}));

    assert!(t.update_tool_call(
        "c1",
        ToolCallUpdate::status(ToolStatus::Confirming).with_confirmation("Read a?")
    ));
    assert!(t.update_tool_call(
        "c1",
        ToolCallUpdate::status(ToolStatus::Complete).with_output("contents")
    ));

    let call = t.find_tool_call("c1").unwrap();
    assert_eq!(call.status, ToolStatus::Complete);
    assert_eq!(call.output.as_deref(), Some("contents"));
    assert_eq!(call.confirmation.as_deref(), Some("Read a?"));
    assert!(call.error_message.is_none());
}

#[test]
fn update_unknown_call_is_reported() {
    let mut t = transcript();
    let before = t.revision();
    assert!(!t.update_tool_call("missing", ToolCallUpdate::status(ToolStatus::Error)));
    assert_eq!(t.revision(), before);
}

#[test]
fn lookup_by_call_id_ignores_order() {
    let mut t = transcript();
    t.append_tool_call("b", "list_dir", json!({}));
    t.append_tool_call("a", "read_file", json!({}));
    t.update_tool_call("b", ToolCallUpdate::status(ToolStatus::Error).with_error("boom"));

    assert_eq!(t.find_tool_call("b").unwrap().status, ToolStatus::Error);
    assert_eq!(t.find_tool_call("a").unwrap().status, ToolStatus::Pending);
    assert_eq!(t.tool_calls().count(), 2);
}

#[test]
fn revision_tracks_every_mutation() {
    let mut t = transcript();
    let id = t.append_message(Role::Model, "a");
    t.append_to_message(id, "b");
    assert_eq!(t.revision(), 2);
}

#[test]
fn terminal_statuses() {
    let terminal: Vec<_> = ToolStatus::ALL
        .into_iter()
        .filter(|s| s.is_terminal())
        .collect();
    assert_eq!(
        terminal,
        vec![ToolStatus::Complete, ToolStatus::Error, ToolStatus::Cancelled]
    );
}
