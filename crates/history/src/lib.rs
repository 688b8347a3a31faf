// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Persisted prompt history.
//!
//! Prompts are stored one JSON object per line, oldest first on disk.
//! Readers get them newest first, which is the order the chat client
//! expects when it merges persisted history with the current session.

mod entry;
mod store;

pub use entry::HistoryEntry;
pub use store::{HistoryError, HistoryStore, DEFAULT_MAX_ENTRIES};
