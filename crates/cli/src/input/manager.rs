// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Submit pipeline, completion and history on top of one text input.

use super::InputHandle;
use crate::commands::{CommandDispatcher, CommandOutcome, COMMAND_TREE};
use crate::completion::{CompletionManager, SuggestionIndex};
use crate::history::{Direction, DoublePressGate, PromptHistory};
use crate::session::{RunId, SessionController};
use crate::shell::ShellRunner;
use crate::time::{Clock, ClockHandle};
use crate::transcript::EntryId;
use crate::viewport::ViewportManager;

/// What a submission turned into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input or no input mounted
    Ignored,
    Command(CommandOutcome),
    /// A `!command` writing into this tool block
    Shell(EntryId),
    Streaming(RunId),
}

/// Coordinates the input line with the rest of the session.
#[derive(Debug)]
pub struct InputManager {
    input: InputHandle,
    completion: CompletionManager,
    history: PromptHistory,
    gate: DoublePressGate,
    clock: ClockHandle,
    session: SessionController,
    dispatcher: CommandDispatcher,
    shell: ShellRunner,
    viewport: ViewportManager,
}

impl InputManager {
    pub fn new(
        input: InputHandle,
        session: SessionController,
        history: PromptHistory,
        index: SuggestionIndex,
        shell: ShellRunner,
        clock: ClockHandle,
    ) -> Self {
        Self {
            completion: CompletionManager::new(input.clone(), COMMAND_TREE, index),
            input,
            history,
            gate: DoublePressGate::new(),
            clock,
            dispatcher: CommandDispatcher::new(session.clone()),
            session,
            shell,
            viewport: ViewportManager::default(),
        }
    }

    pub fn input(&self) -> &InputHandle {
        &self.input
    }

    pub fn completion(&self) -> &CompletionManager {
        &self.completion
    }

    pub fn completion_mut(&mut self) -> &mut CompletionManager {
        &mut self.completion
    }

    pub fn history(&self) -> &PromptHistory {
        &self.history
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn viewport(&self) -> &ViewportManager {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportManager {
        &mut self.viewport
    }

    /// The user changed the text or moved the cursor.
    pub fn on_edit(&mut self) {
        self.history.reset_navigation();
        self.gate.reset();
        self.completion.refresh();
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        let Some(raw) = self.input.text() else {
            return SubmitOutcome::Ignored;
        };
        let prompt = raw.trim();
        if prompt.is_empty() {
            return SubmitOutcome::Ignored;
        }

        if prompt.starts_with('/') {
            let outcome = self.dispatcher.dispatch(prompt);
            if outcome != CommandOutcome::NotCommand {
                self.reset_input();
                self.viewport.follow();
                return SubmitOutcome::Command(outcome);
            }
        }

        if let Some(command) = prompt.strip_prefix('!').map(str::trim) {
            if command.is_empty() {
                return SubmitOutcome::Ignored;
            }
            self.history.record(prompt);
            self.reset_input();
            self.viewport.follow();
            return SubmitOutcome::Shell(self.shell.start(command));
        }

        let prompt = prompt.to_string();
        self.history.record(&prompt);
        self.reset_input();
        self.viewport.follow();
        SubmitOutcome::Streaming(self.session.send(prompt))
    }

    /// Up/Down outside the completion menu.
    ///
    /// From a fresh input the first press only arms the gate; a second
    /// press in the same direction within the window starts browsing.
    /// Once browsing, every press steps. Returns true when the text changed.
    pub fn history_key(&mut self, direction: Direction) -> bool {
        if !self.history.is_browsing() {
            let empty = self.input.text().is_some_and(|t| t.is_empty());
            if !empty || !self.gate.press(direction, self.clock.now_millis()) {
                return false;
            }
        }
        let Some(text) = self.history.navigate(direction) else {
            return false;
        };
        self.input.set_text(&text, text.len());
        self.completion.clear();
        true
    }

    /// Up/Down: move the menu selection when it is open, otherwise history.
    pub fn arrow(&mut self, direction: Direction) -> bool {
        if self.completion.is_open() {
            self.completion.move_selection(match direction {
                Direction::Up => -1,
                Direction::Down => 1,
            });
            return true;
        }
        self.history_key(direction)
    }

    fn reset_input(&mut self) {
        self.input.clear();
        self.completion.clear();
        self.gate.reset();
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
