// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Suggestion state driven by the text under the cursor.
//!
//! The mode is never set directly: every refresh re-runs [`extract`] on
//! the current text and cursor and rebuilds the suggestion list.

use crate::input::InputHandle;

use super::context::{extract, CompletionContext, Span};
use super::mention::{MentionSuggestion, SuggestionIndex};
use super::slash::{SlashSuggestion, SlashTree};

/// Suggestions kept per refresh
pub const PAGE_SIZE: usize = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompletionMode {
    #[default]
    None,
    Mention,
    Slash,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Suggestion {
    Slash(SlashSuggestion),
    Mention(MentionSuggestion),
}

impl Suggestion {
    /// Text shown in the menu
    pub fn label(&self) -> &str {
        match self {
            Suggestion::Slash(s) => &s.full_path,
            Suggestion::Mention(m) => &m.path,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Suggestion::Slash(s) => Some(s.description),
            Suggestion::Mention(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompletionState {
    pub suggestions: Vec<Suggestion>,
    pub selected: usize,
    pub mode: CompletionMode,
    /// Only set in slash mode; mention spans are recomputed on apply
    pub replace_span: Option<Span>,
}

/// Owns the completion menu for one text input.
#[derive(Debug)]
pub struct CompletionManager {
    input: InputHandle,
    tree: SlashTree,
    index: SuggestionIndex,
    page_size: usize,
    state: CompletionState,
}

impl CompletionManager {
    pub fn new(input: InputHandle, tree: SlashTree, index: SuggestionIndex) -> Self {
        Self {
            input,
            tree,
            index,
            page_size: PAGE_SIZE,
            state: CompletionState::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn set_index(&mut self, index: SuggestionIndex) {
        self.index = index;
    }

    pub fn state(&self) -> &CompletionState {
        &self.state
    }

    pub fn mode(&self) -> CompletionMode {
        self.state.mode
    }

    /// Whether there is anything to show
    pub fn is_open(&self) -> bool {
        !self.state.suggestions.is_empty()
    }

    pub fn selected(&self) -> Option<&Suggestion> {
        self.state.suggestions.get(self.state.selected)
    }

    pub fn clear(&mut self) {
        self.state = CompletionState::default();
    }

    /// Re-extract the context and rebuild the suggestion list.
    pub fn refresh(&mut self) {
        let Some((text, cursor)) = self
            .input
            .with(|input| (input.plain_text(), input.cursor_offset()))
        else {
            self.clear();
            return;
        };

        self.state = match extract(&text, cursor) {
            None => CompletionState::default(),
            Some(CompletionContext::Slash { span, parts }) => CompletionState {
                suggestions: self
                    .tree
                    .suggest(&parts, self.page_size)
                    .into_iter()
                    .map(Suggestion::Slash)
                    .collect(),
                selected: 0,
                mode: CompletionMode::Slash,
                replace_span: Some(span),
            },
            Some(CompletionContext::Mention { query, .. }) => CompletionState {
                suggestions: self
                    .index
                    .rank(&query, self.page_size)
                    .into_iter()
                    .map(Suggestion::Mention)
                    .collect(),
                selected: 0,
                mode: CompletionMode::Mention,
                replace_span: None,
            },
        };
    }

    /// Move the highlight by `delta`, clamped to the list.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.state.suggestions.len();
        if len == 0 || !self.input.is_attached() {
            return;
        }
        let max = (len - 1) as isize;
        self.state.selected = (self.state.selected as isize + delta).clamp(0, max) as usize;
    }

    /// Splice the highlighted suggestion into the input.
    ///
    /// Returns false when nothing was applied.
    pub fn apply_selection(&mut self) -> bool {
        let Some(choice) = self.selected().cloned() else {
            return false;
        };
        let Some((text, cursor)) = self
            .input
            .with(|input| (input.plain_text(), input.cursor_offset()))
        else {
            self.clear();
            return false;
        };

        let (span, insert, drill_down) = match choice {
            Suggestion::Slash(s) => {
                let Some(span) = self.state.replace_span else {
                    self.clear();
                    return false;
                };
                (span, format!("{} ", s.full_path), s.has_children)
            }
            Suggestion::Mention(m) => {
                let Some(CompletionContext::Mention { span, .. }) = extract(&text, cursor) else {
                    self.clear();
                    return false;
                };
                let insert = if m.is_dir {
                    format!("@{}", m.path)
                } else {
                    format!("@{} ", m.path)
                };
                (span, insert, m.is_dir)
            }
        };

        let mut updated = String::with_capacity(text.len() + insert.len());
        updated.push_str(&text[..span.start]);
        updated.push_str(&insert);
        updated.push_str(&text[span.end..]);
        self.input.set_text(&updated, span.start + insert.len());

        if drill_down {
            self.refresh();
        } else {
            self.clear();
        }
        true
    }

    /// Up to `rows` suggestions around the selection, with the index of
    /// the first one shown.
    pub fn visible(&self, rows: usize) -> (usize, &[Suggestion]) {
        let suggestions = &self.state.suggestions;
        if suggestions.len() <= rows {
            return (0, suggestions);
        }
        let start = self
            .state
            .selected
            .saturating_sub(rows / 2)
            .min(suggestions.len() - rows);
        (start, &suggestions[start..start + rows])
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
