// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use iocraft::prelude::KeyEventKind;
use parking_lot::Mutex;
use serde_json::json;

use super::*;
use crate::backend::{
    BackendEvent, RulePattern, Script, ScriptRule, ScriptedBackend, StreamingConfig,
};
use crate::completion::SuggestionIndex;
use crate::config::{AuthMethod, SessionConfig, ThemeName};
use crate::history::PromptHistory;
use crate::input::InputHandle;
use crate::shell::{ShellPacing, ShellRunner};
use crate::time::FakeClock;
use crate::tools::BuiltinTools;
use crate::transcript::{ChatEntry, IdGenerator, Role, ToolCallEntry, ToolStatus, Transcript};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(KeyEventKind::Press, code)
}

fn ctrl(ch: char) -> KeyEvent {
    let mut event = KeyEvent::new(KeyEventKind::Press, KeyCode::Char(ch));
    event.modifiers = KeyModifiers::CONTROL;
    event
}

fn readme_script() -> Script {
    Script {
        rules: vec![ScriptRule {
            pattern: RulePattern::new("readme").unwrap(),
            events: vec![BackendEvent::ToolPending {
                call_id: "t1".into(),
                name: "read_file".into(),
                params: json!({"path": "README.md"}),
            }],
            continuation: vec![BackendEvent::TextDelta {
                text: "Done.".into(),
            }],
            fail: None,
        }],
        ..Script::default()
    }
}

/// Poll `done` in real time; tool calls finish on the blocking pool.
async fn wait_until(what: &str, done: impl Fn() -> bool) {
    let poll = async {
        while !done() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    };
    if tokio::time::timeout(Duration::from_secs(5), poll).await.is_err() {
        panic!("{what}");
    }
}

struct Harness {
    state: TuiAppState,
    approvals: ApprovalQueue,
    _dir: tempfile::TempDir,
}

fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README.md"), "# Demo\n").unwrap();

    let clock = FakeClock::new(1_000);
    let transcript = Transcript::shared(IdGenerator::new());
    let config = SessionConfig {
        provider: Some("scripted".into()),
        model: Some("echo-small".into()),
        auth: Some(AuthMethod::Local),
        theme: ThemeName::Mono,
        ..SessionConfig::default()
    };
    let approvals = ApprovalQueue::new();
    let session = SessionController::new(
        Arc::new(ScriptedBackend::new(
            readme_script(),
            StreamingConfig::instant(),
            clock.clone().into(),
        )),
        Arc::new(BuiltinTools::new(dir.path())),
        Arc::new(approvals.clone()),
        transcript.clone(),
        Arc::new(Mutex::new(config)),
    );

    let buffer = Arc::new(Mutex::new(InputBuffer::new()));
    let manager = InputManager::new(
        InputHandle::attached(buffer.clone()),
        session,
        PromptHistory::new(Vec::new()),
        SuggestionIndex::new(vec!["README.md".into()]),
        ShellRunner::new(
            transcript,
            clock.clone().into(),
            ShellPacing::instant(),
            dir.path().to_path_buf(),
        ),
        clock.into(),
    );
    Harness {
        state: TuiAppState::new(buffer, manager, approvals.clone(), (60, 20)),
        approvals,
        _dir: dir,
    }
}

impl Harness {
    fn type_text(&self, text: &str) {
        for c in text.chars() {
            self.state.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    fn press(&self, code: KeyCode) {
        self.state.handle_key_event(key(code));
    }

    fn entries(&self) -> Vec<ChatEntry> {
        self.state.session().transcript().lock().entries().to_vec()
    }

    fn tool_call(&self, call_id: &str) -> ToolCallEntry {
        let session = self.state.session();
        let transcript = session.transcript().lock();
        transcript.find_tool_call(call_id).cloned().unwrap()
    }

    async fn settle(&self) {
        wait_until("run never finished", || !self.state.session().is_streaming()).await;
    }

    async fn wait_for_approval(&self) {
        wait_until("no approval was requested", || !self.approvals.is_empty()).await;
    }
}

#[tokio::test]
async fn typing_and_enter_streams_a_reply() {
    let h = harness();
    h.type_text("hello");
    assert_eq!(h.state.input_text(), "hello");

    h.press(KeyCode::Enter);
    assert_eq!(h.state.input_text(), "");
    h.settle().await;

    let entries = h.entries();
    assert!(matches!(
        &entries[0],
        ChatEntry::Message { role: Role::User, text, .. } if text == "hello"
    ));
    assert!(matches!(
        &entries[1],
        ChatEntry::Message { role: Role::Model, text, .. } if text == "You said: hello"
    ));
}

#[test]
fn finished_command_submits_on_enter() {
    let h = harness();
    h.type_text("/help");
    h.press(KeyCode::Enter);

    assert_eq!(h.state.input_text(), "");
    let entries = h.entries();
    assert!(matches!(
        entries.last(),
        Some(ChatEntry::Message { role: Role::System, .. })
    ));
}

#[test]
fn partial_command_is_completed_on_enter() {
    let h = harness();
    h.type_text("/the");
    h.press(KeyCode::Enter);
    assert_eq!(h.state.input_text().trim_end(), "/theme");
    assert!(h.entries().is_empty());
}

#[test]
fn theme_picker_applies_choice() {
    let h = harness();
    h.type_text("/theme");
    h.press(KeyCode::Enter);

    let Some(Modal::Settings { picker, .. }) = h.state.modal() else {
        panic!("expected the theme picker");
    };
    assert_eq!(picker.selected_value(), Some("mono"));

    h.press(KeyCode::Down);
    h.press(KeyCode::Enter);

    assert!(h.state.modal().is_none());
    assert_eq!(h.state.session().config().lock().theme, ThemeName::Dark);
}

#[test]
fn escape_closes_picker_without_change() {
    let h = harness();
    h.type_text("/theme");
    h.press(KeyCode::Enter);
    assert!(h.state.modal().is_some());

    h.press(KeyCode::Down);
    h.press(KeyCode::Esc);

    assert!(h.state.modal().is_none());
    assert_eq!(h.state.session().config().lock().theme, ThemeName::Mono);
}

#[test]
fn ctrl_d_on_empty_input_exits() {
    let h = harness();
    h.state.handle_key_event(ctrl('d'));
    assert_eq!(h.state.exit_reason(), Some(ExitReason::EndOfInput));
}

#[test]
fn ctrl_d_with_text_deletes_forward() {
    let h = harness();
    h.type_text("ab");
    h.press(KeyCode::Home);
    h.state.handle_key_event(ctrl('d'));
    assert_eq!(h.state.input_text(), "b");
    assert!(!h.state.should_exit());
}

#[test]
fn ctrl_c_clears_then_exits() {
    let h = harness();
    h.type_text("draft");
    h.state.handle_key_event(ctrl('c'));
    assert_eq!(h.state.input_text(), "");
    assert!(!h.state.should_exit());

    h.state.handle_key_event(ctrl('c'));
    assert_eq!(h.state.exit_reason(), Some(ExitReason::Interrupted));
}

#[test]
fn raw_ascii_control_codes_are_understood() {
    let h = harness();
    h.state.handle_key_event(key(KeyCode::Char('\x04')));
    assert_eq!(h.state.exit_reason(), Some(ExitReason::EndOfInput));
}

#[test]
fn exit_command_stops_the_app() {
    let h = harness();
    h.type_text("/exit");
    h.press(KeyCode::Enter);
    assert_eq!(h.state.exit_reason(), Some(ExitReason::Command));
}

#[test]
fn ctrl_w_deletes_previous_word() {
    let h = harness();
    h.type_text("one two");
    h.state.handle_key_event(ctrl('w'));
    assert_eq!(h.state.input_text(), "one ");
}

#[tokio::test]
async fn escape_cancels_a_running_turn() {
    let h = harness();
    h.type_text("hello");
    h.press(KeyCode::Enter);
    assert!(h.state.session().is_streaming());

    h.press(KeyCode::Esc);
    assert!(!h.state.session().is_streaming());
    assert!(!h.state.should_exit());
}

#[tokio::test]
async fn approval_dialog_runs_tool_on_yes() {
    let h = harness();
    h.type_text("show the readme");
    h.press(KeyCode::Esc);
    h.press(KeyCode::Enter);
    h.wait_for_approval().await;

    h.state.tick();
    let Some(Modal::Approval { call_id, picker }) = h.state.modal() else {
        panic!("expected an approval dialog");
    };
    assert_eq!(call_id, "t1");
    assert!(picker.title().contains("Read file README.md?"));

    h.state.handle_key_event(key(KeyCode::Char('y')));
    assert!(h.state.modal().is_none());
    h.settle().await;

    let call = h.tool_call("t1");
    assert_eq!(call.status, ToolStatus::Complete);
    assert!(call.output.as_deref().unwrap_or_default().contains("# Demo"));
    assert!(h.entries().iter().any(|e| matches!(
        e,
        ChatEntry::Message { role: Role::Model, text, .. } if text == "Done."
    )));
}

#[tokio::test]
async fn escape_on_approval_denies() {
    let h = harness();
    h.type_text("readme please");
    h.press(KeyCode::Esc);
    h.press(KeyCode::Enter);
    h.wait_for_approval().await;
    h.state.tick();
    assert!(h.state.modal().is_some());

    h.press(KeyCode::Esc);
    h.settle().await;

    assert_eq!(h.tool_call("t1").status, ToolStatus::Cancelled);
    assert!(h.approvals.is_empty());
}

#[tokio::test]
async fn stale_approval_dialog_closes_on_tick() {
    let h = harness();
    h.type_text("readme");
    h.press(KeyCode::Esc);
    h.press(KeyCode::Enter);
    h.wait_for_approval().await;
    h.state.tick();
    assert!(h.state.modal().is_some());

    h.approvals.deny_all();
    h.state.tick();
    assert!(h.state.modal().is_none());
}

#[test]
fn render_state_lays_out_a_frame() {
    let h = harness();
    h.type_text("hi");
    let frame = h.state.render_state();

    assert!(frame.header.starts_with("palaver"));
    assert!(frame.header.contains("scripted · echo-small · mono"));
    assert_eq!(frame.input, "› hi ");
    assert!(frame.body.is_empty());
    assert!(frame.modal.is_none());
    assert!(frame.status.starts_with("0 turns · 0 words"));
}

#[test]
fn render_state_shows_menu_and_picker() {
    let h = harness();
    h.type_text("/");
    let frame = h.state.render_state();
    assert!(!frame.menu.is_empty());
    assert!(frame.menu.len() <= MENU_ROWS);

    h.type_text("theme");
    h.press(KeyCode::Enter);
    let frame = h.state.render_state();
    let modal = frame.modal.unwrap();
    assert_eq!(modal[0], "Select theme");
    assert!(frame.menu.is_empty());
}

#[tokio::test]
async fn body_is_clipped_to_the_bottom() {
    let h = harness();
    h.state.set_size(60, 10);
    for i in 0..6 {
        h.type_text(&format!("message {i}"));
        h.press(KeyCode::Esc);
        h.press(KeyCode::Enter);
        h.settle().await;
    }
    let frame = h.state.render_state();
    assert_eq!(frame.body.len(), 5);
    assert_eq!(frame.body.last().map(String::as_str), Some("  You said: message 5"));
}

#[tokio::test]
async fn shutdown_detaches_and_unmounts() {
    let h = harness();
    h.type_text("readme");
    h.press(KeyCode::Esc);
    h.press(KeyCode::Enter);
    h.wait_for_approval().await;

    h.state.shutdown();
    assert!(!h.state.session().is_mounted());
    assert!(h.approvals.is_empty());

    h.type_text("ignored");
    h.press(KeyCode::Enter);
    assert!(h.entries().iter().all(|e| !matches!(
        e,
        ChatEntry::Message { role: Role::User, text, .. } if text == "ignored"
    )));
}
