// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Text input handle and the submit pipeline built on it.

mod buffer;
mod manager;

pub use buffer::InputBuffer;
pub use manager::{InputManager, SubmitOutcome};

use std::sync::Arc;

use parking_lot::Mutex;

/// The text-input surface the coordination layer edits.
pub trait TextInput {
    fn plain_text(&self) -> String;
    /// Cursor as a byte offset into [`TextInput::plain_text`]
    fn cursor_offset(&self) -> usize;
    fn set_text(&mut self, text: &str, cursor: usize);
    fn clear(&mut self);
    fn focus(&mut self);
}

/// A mounted text input
pub type SharedInput = Arc<Mutex<dyn TextInput + Send>>;

/// Slot holding the current text input, if one is mounted.
///
/// Every accessor returns `None` while detached.
#[derive(Clone, Default)]
pub struct InputHandle {
    slot: Arc<Mutex<Option<SharedInput>>>,
}

impl InputHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached(input: SharedInput) -> Self {
        let handle = Self::new();
        handle.attach(input);
        handle
    }

    pub fn attach(&self, input: SharedInput) {
        *self.slot.lock() = Some(input);
    }

    pub fn detach(&self) {
        *self.slot.lock() = None;
    }

    pub fn is_attached(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Run `f` against the mounted input
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn TextInput) -> R) -> Option<R> {
        let input = self.slot.lock().clone()?;
        let mut guard = input.lock();
        Some(f(&mut *guard))
    }

    pub fn text(&self) -> Option<String> {
        self.with(|input| input.plain_text())
    }

    pub fn cursor(&self) -> Option<usize> {
        self.with(|input| input.cursor_offset())
    }

    pub fn set_text(&self, text: &str, cursor: usize) {
        self.with(|input| input.set_text(text, cursor));
    }

    pub fn clear(&self) {
        self.with(|input| input.clear());
    }
}

impl std::fmt::Debug for InputHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
