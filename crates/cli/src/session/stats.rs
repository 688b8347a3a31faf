// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Session counters reported by `/stats`.

use crate::transcript::{ToolStatus, Transcript};

/// Cumulative counters for the session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Prompts that reached the backend
    pub turns: u64,
    /// Words streamed by the model, thinking included
    pub words: u64,
    /// Tool-response continuations sent back to the backend
    pub continuations: u64,
}

/// Tool calls in a transcript, grouped by status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToolCallCounts {
    counts: [usize; ToolStatus::ALL.len()],
}

impl ToolCallCounts {
    pub fn from_transcript(transcript: &Transcript) -> Self {
        let mut counts = Self::default();
        for call in transcript.tool_calls() {
            counts.counts[index(call.status)] += 1;
        }
        counts
    }

    pub fn get(&self, status: ToolStatus) -> usize {
        self.counts[index(status)]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Non-zero counts in status order
    pub fn iter(&self) -> impl Iterator<Item = (ToolStatus, usize)> + '_ {
        ToolStatus::ALL
            .into_iter()
            .map(|status| (status, self.get(status)))
            .filter(|(_, n)| *n > 0)
    }
}

fn index(status: ToolStatus) -> usize {
    ToolStatus::ALL
        .iter()
        .position(|s| *s == status)
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
