// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Run-id fencing.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one streaming run
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Counter naming the current run.
///
/// Advancing it invalidates every earlier [`RunId`]: their effects must be
/// dropped. Clones share the counter.
#[derive(Clone, Debug, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and return its id
    pub fn advance(&self) -> RunId {
        RunId(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn current(&self) -> RunId {
        RunId(self.0.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, run: RunId) -> bool {
        self.current() == run
    }
}

#[cfg(test)]
#[path = "generation_tests.rs"]
mod tests;
