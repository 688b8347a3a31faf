// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! History record type.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// One submitted prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Sequence number within the file
    pub seq: u64,

    /// Wall-clock time of submission
    pub timestamp: SystemTime,

    /// The prompt text as typed
    pub prompt: String,
}

impl HistoryEntry {
    pub fn new(seq: u64, prompt: impl Into<String>) -> Self {
        Self {
            seq,
            timestamp: SystemTime::now(),
            prompt: prompt.into(),
        }
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
