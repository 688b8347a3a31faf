// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Mention and slash-command completion.

mod context;
mod manager;
mod mention;
mod slash;

pub use context::{extract, CompletionContext, Span};
pub use manager::{CompletionManager, CompletionMode, CompletionState, Suggestion, PAGE_SIZE};
pub use mention::{fuzzy_match_score, MentionSuggestion, SuggestionIndex};
pub use slash::{CommandNode, SlashSuggestion, SlashTree};
