// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Front-end state and key handling, independent of the terminal.

use std::sync::Arc;

use iocraft::prelude::{KeyCode, KeyEvent, KeyModifiers};
use parking_lot::Mutex;

use super::colors::Palette;
use super::modal::{approval_decision, approval_picker, settings_picker, Modal};
use super::render::{self, MENU_ROWS};
use super::spinner::Spinner;
use crate::commands::CommandOutcome;
use crate::completion::Suggestion;
use crate::history::Direction;
use crate::input::{InputBuffer, InputManager, SubmitOutcome};
use crate::session::SessionController;
use crate::tools::{ApprovalDecision, ApprovalQueue};
use crate::viewport::ViewportHandle;

/// Fallback when the terminal size is unknown
pub const DEFAULT_TERMINAL_SIZE: (u16, u16) = (80, 24);

/// Rows outside the transcript: header, two separators, input and status
const CHROME_ROWS: usize = 5;

/// Matches a control key sent either as raw ASCII or as char + CONTROL.
macro_rules! ctrl_key {
    ($ch:literal, $ascii:literal, $modifiers:expr, $code:expr) => {
        matches!($code, KeyCode::Char($ascii))
            || (matches!($code, KeyCode::Char($ch)) && $modifiers.contains(KeyModifiers::CONTROL))
    };
}

/// Why the app stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    /// `/exit`
    Command,
    /// Ctrl+C while idle with an empty input
    Interrupted,
    /// Ctrl+D on an empty input
    EndOfInput,
}

/// Everything the component needs for one frame
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderState {
    pub header: String,
    pub separator: String,
    pub body: Vec<String>,
    pub menu: Vec<String>,
    pub input: String,
    pub status: String,
    /// Dialog lines; replaces the menu and input while open
    pub modal: Option<Vec<String>>,
}

struct Inner {
    buffer: Arc<Mutex<InputBuffer>>,
    manager: InputManager,
    approvals: ApprovalQueue,
    modal: Option<Modal>,
    spinner: Spinner,
    size: (u16, u16),
    exit: Option<ExitReason>,
}

/// Shared app state; clones see the same session.
#[derive(Clone)]
pub struct TuiAppState {
    inner: Arc<Mutex<Inner>>,
}

impl TuiAppState {
    /// `buffer` must be the input attached to `manager`'s handle.
    pub fn new(
        buffer: Arc<Mutex<InputBuffer>>,
        manager: InputManager,
        approvals: ApprovalQueue,
        size: (u16, u16),
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                buffer,
                manager,
                approvals,
                modal: None,
                spinner: Spinner::start(),
                size,
                exit: None,
            })),
        }
    }

    pub fn session(&self) -> SessionController {
        self.inner.lock().manager.session().clone()
    }

    pub fn input_text(&self) -> String {
        self.inner.lock().buffer.lock().text().to_string()
    }

    pub fn modal(&self) -> Option<Modal> {
        self.inner.lock().modal.clone()
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.inner.lock().exit
    }

    pub fn should_exit(&self) -> bool {
        self.exit_reason().is_some()
    }

    pub fn set_size(&self, width: u16, height: u16) {
        self.inner.lock().size = (width, height);
    }

    /// The screen is gone: fence off running turns and release waiters.
    pub fn shutdown(&self) {
        let inner = self.inner.lock();
        inner.manager.input().detach();
        inner.manager.session().unmount();
        inner.approvals.deny_all();
    }

    /// Periodic timer: advance the spinner and surface pending approvals.
    pub fn tick(&self) {
        let mut inner = self.inner.lock();
        inner.spinner.advance();
        let shown = match &inner.modal {
            Some(Modal::Approval { call_id, .. }) => Some(call_id.clone()),
            Some(Modal::Settings { .. }) => return,
            None => None,
        };
        match (shown, inner.approvals.front()) {
            (None, Some(pending)) => {
                tracing::debug!(call_id = %pending.call_id, "showing approval dialog");
                inner.modal = Some(Modal::Approval {
                    call_id: pending.call_id.clone(),
                    picker: approval_picker(&pending),
                });
            }
            // Answered elsewhere or dropped by a cancel
            (Some(shown), front) if front.as_ref().map_or(true, |p| p.call_id != shown) => {
                inner.modal = None;
            }
            _ => {}
        }
    }

    pub fn handle_key_event(&self, key: KeyEvent) {
        let mut inner = self.inner.lock();
        if inner.modal.is_some() {
            Self::handle_modal_key(&mut inner, key);
        } else {
            Self::handle_input_key(&mut inner, key);
        }
    }

    fn handle_modal_key(inner: &mut Inner, key: KeyEvent) {
        let KeyEvent { code, modifiers, .. } = key;
        let Some(modal) = inner.modal.as_mut() else {
            return;
        };
        let is_approval = matches!(modal, Modal::Approval { .. });

        if ctrl_key!('c', '\x03', modifiers, code) || code == KeyCode::Esc {
            if is_approval {
                inner.approvals.respond_front(ApprovalDecision::Deny);
            }
            inner.modal = None;
            return;
        }

        match code {
            KeyCode::Up => modal.picker_mut().move_up(),
            KeyCode::Down | KeyCode::Tab => modal.picker_mut().move_down(),
            KeyCode::Char('y') if is_approval => {
                inner.approvals.respond_front(ApprovalDecision::Approve);
                inner.modal = None;
            }
            KeyCode::Char('n') if is_approval => {
                inner.approvals.respond_front(ApprovalDecision::Deny);
                inner.modal = None;
            }
            KeyCode::Enter => match inner.modal.take() {
                Some(Modal::Settings { kind, picker }) => {
                    if let Some(value) = picker.selected_value() {
                        inner.manager.dispatcher().apply_choice(kind, value);
                    }
                }
                Some(Modal::Approval { picker, .. }) => {
                    inner.approvals.respond_front(approval_decision(&picker));
                }
                None => {}
            },
            _ => {}
        }
    }

    fn handle_input_key(inner: &mut Inner, key: KeyEvent) {
        let KeyEvent { code, modifiers, .. } = key;

        if ctrl_key!('c', '\x03', modifiers, code) {
            Self::interrupt(inner);
            return;
        }
        if ctrl_key!('d', '\x04', modifiers, code) {
            if inner.buffer.lock().is_empty() {
                inner.exit = Some(ExitReason::EndOfInput);
            } else {
                Self::edit(inner, |b| {
                    b.delete();
                });
            }
            return;
        }
        if ctrl_key!('w', '\x17', modifiers, code) {
            return Self::edit(inner, InputBuffer::delete_word_before_cursor);
        }
        if ctrl_key!('u', '\x15', modifiers, code) {
            return Self::edit(inner, InputBuffer::clear_before_cursor);
        }
        if ctrl_key!('k', '\x0b', modifiers, code) {
            return Self::edit(inner, InputBuffer::clear_after_cursor);
        }
        if ctrl_key!('a', '\x01', modifiers, code) {
            return Self::edit(inner, InputBuffer::move_to_start);
        }
        if ctrl_key!('e', '\x05', modifiers, code) {
            return Self::edit(inner, InputBuffer::move_to_end);
        }

        match code {
            KeyCode::Enter => Self::enter(inner),
            KeyCode::Tab => {
                inner.manager.completion_mut().apply_selection();
            }
            KeyCode::Up => {
                inner.manager.arrow(Direction::Up);
            }
            KeyCode::Down => {
                inner.manager.arrow(Direction::Down);
            }
            KeyCode::Esc => {
                if inner.manager.completion().is_open() {
                    inner.manager.completion_mut().clear();
                } else if inner.manager.session().is_streaming() {
                    Self::cancel(inner);
                }
            }
            KeyCode::PageUp => inner.manager.viewport_mut().page_up(),
            KeyCode::PageDown => inner.manager.viewport_mut().page_down(),
            KeyCode::Left => Self::edit(inner, |b| {
                b.move_left();
            }),
            KeyCode::Right => Self::edit(inner, |b| {
                b.move_right();
            }),
            KeyCode::Home => Self::edit(inner, InputBuffer::move_to_start),
            KeyCode::End => Self::edit(inner, InputBuffer::move_to_end),
            KeyCode::Backspace => Self::edit(inner, |b| {
                b.backspace();
            }),
            KeyCode::Delete => Self::edit(inner, |b| {
                b.delete();
            }),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                Self::edit(inner, |b| b.insert_char(c));
            }
            _ => {}
        }
    }

    /// Apply `f` to the buffer, then let completion and history react.
    fn edit(inner: &mut Inner, f: impl FnOnce(&mut InputBuffer)) {
        f(&mut inner.buffer.lock());
        inner.manager.on_edit();
    }

    /// Enter applies the highlighted suggestion unless it is the complete
    /// command already typed, in which case it submits.
    fn enter(inner: &mut Inner) {
        if let Some(selected) = inner.manager.completion().selected() {
            let typed = inner.buffer.lock().text().trim().to_string();
            let finished = matches!(
                selected,
                Suggestion::Slash(s) if !s.has_children && s.full_path == typed
            );
            if !finished {
                inner.manager.completion_mut().apply_selection();
                return;
            }
        }

        match inner.manager.submit() {
            SubmitOutcome::Command(CommandOutcome::OpenPicker(kind)) => {
                let picker = settings_picker(kind, inner.manager.session());
                inner.modal = Some(Modal::Settings { kind, picker });
            }
            SubmitOutcome::Command(CommandOutcome::Exit) => {
                inner.exit = Some(ExitReason::Command);
            }
            SubmitOutcome::Streaming(_) => inner.spinner = Spinner::start(),
            SubmitOutcome::Command(_) | SubmitOutcome::Shell(_) | SubmitOutcome::Ignored => {}
        }
    }

    fn interrupt(inner: &mut Inner) {
        if inner.manager.session().is_streaming() {
            Self::cancel(inner);
        } else if !inner.buffer.lock().is_empty() {
            Self::edit(inner, |b| {
                b.move_to_end();
                b.clear_before_cursor();
            });
        } else {
            inner.exit = Some(ExitReason::Interrupted);
        }
    }

    fn cancel(inner: &mut Inner) {
        inner.manager.session().cancel();
        inner.approvals.deny_all();
    }

    /// Lay out one frame and keep the viewport in step with it.
    pub fn render_state(&self) -> RenderState {
        let mut inner = self.inner.lock();
        let (width, height) = inner.size;
        let width = usize::from(width).max(1);

        let session = inner.manager.session().clone();
        let config = session.config().lock().clone();
        let palette = Palette::for_theme(config.theme);

        let lines = render::transcript_lines(
            session.transcript().lock().entries(),
            config.show_thinking,
            &palette,
            width,
        );

        let (menu, input, modal) = match &inner.modal {
            Some(modal) => (
                Vec::new(),
                String::new(),
                Some(render::picker_lines(modal.picker(), &palette, width)),
            ),
            None => {
                let (text, cursor) = {
                    let buffer = inner.buffer.lock();
                    (buffer.text().to_string(), buffer.cursor())
                };
                (
                    render::menu_lines(inner.manager.completion(), &palette, width),
                    render::input_line(&text, cursor, &palette),
                    None,
                )
            }
        };

        let below = modal.as_ref().map_or(menu.len().min(MENU_ROWS), Vec::len);
        let body_height = usize::from(height).saturating_sub(CHROME_ROWS + below).max(1);
        let viewport = inner.manager.viewport_mut();
        viewport.set_viewport_height(body_height);
        viewport.set_content_height(lines.len());
        let top = viewport.view().scroll_top();
        let body = lines.into_iter().skip(top).take(body_height).collect();

        RenderState {
            header: render::header_line(&config, &palette),
            separator: render::separator(width, &palette),
            body,
            menu,
            input,
            status: render::status_line(
                session.is_streaming(),
                inner.spinner.frame(),
                inner.spinner.verb(),
                session.stats(),
                &palette,
            ),
            modal,
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
