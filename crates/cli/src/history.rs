// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Prompt history navigation.
//!
//! Persisted prompts arrive newest first from the history store and are
//! reversed so the whole sequence runs oldest to newest, followed by the
//! prompts submitted in this session.

use std::fmt;

/// Maximum gap between two presses that counts as a double press
pub const DOUBLE_PRESS_WINDOW_MS: u64 = 400;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Callback that persists a newly submitted prompt
pub type Recorder = Box<dyn Fn(&str) + Send + Sync>;

/// Navigable prompt history
pub struct PromptHistory {
    entries: Vec<String>,
    persisted: usize,
    cursor: Option<usize>,
    recorder: Option<Recorder>,
}

impl PromptHistory {
    /// `newest_first` is the persisted history as the store returns it.
    pub fn new(newest_first: Vec<String>) -> Self {
        let mut entries = newest_first;
        entries.reverse();
        Self {
            persisted: entries.len(),
            entries,
            cursor: None,
            recorder: None,
        }
    }

    pub fn with_recorder(mut self, recorder: Recorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Prompts submitted since startup, oldest first
    pub fn session_entries(&self) -> &[String] {
        &self.entries[self.persisted..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry is currently shown in the input
    pub fn is_browsing(&self) -> bool {
        self.cursor.is_some()
    }

    /// Add a submitted prompt and pass it to the recorder.
    ///
    /// Blank prompts are ignored. Navigation restarts from the newest entry.
    pub fn record(&mut self, prompt: &str) {
        self.cursor = None;
        if prompt.trim().is_empty() {
            return;
        }
        if self.entries.last().map(String::as_str) != Some(prompt) {
            self.entries.push(prompt.to_string());
        }
        if let Some(recorder) = &self.recorder {
            recorder(prompt);
        }
    }

    /// Step through history.
    ///
    /// Returns the text the input should now show, or `None` when nothing
    /// changes. Stepping down past the newest entry returns an empty string.
    pub fn navigate(&mut self, direction: Direction) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        let next = match (self.cursor, direction) {
            (None, Direction::Up) => last,
            (None, Direction::Down) => return None,
            (Some(0), Direction::Up) => return None,
            (Some(i), Direction::Up) => i - 1,
            (Some(i), Direction::Down) if i < last => i + 1,
            (Some(_), Direction::Down) => {
                self.cursor = None;
                return Some(String::new());
            }
        };
        self.cursor = Some(next);
        self.entries.get(next).cloned()
    }

    pub fn reset_navigation(&mut self) {
        self.cursor = None;
    }
}

impl fmt::Debug for PromptHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptHistory")
            .field("entries", &self.entries)
            .field("persisted", &self.persisted)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

/// Confirms history navigation with a second press of the same arrow.
///
/// A first press only arms the gate. A second press in the same direction
/// within the window fires; a late or different press re-arms instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DoublePressGate {
    armed: bool,
    armed_at: u64,
    direction: Option<Direction>,
}

impl DoublePressGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Register a press at `now_ms`; true when it completes a double press.
    pub fn press(&mut self, direction: Direction, now_ms: u64) -> bool {
        let fires = self.armed
            && self.direction == Some(direction)
            && now_ms.saturating_sub(self.armed_at) <= DOUBLE_PRESS_WINDOW_MS;
        if fires {
            self.reset();
        } else {
            self.armed = true;
            self.armed_at = now_ms;
            self.direction = Some(direction);
        }
        fires
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
