// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Status-line spinner shown while a run is streaming.

/// Braille frames, one per UI tick
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Status verbs; each run draws one
pub const VERBS: &[&str] = &[
    "Thinking",
    "Composing",
    "Pondering",
    "Drafting",
    "Musing",
    "Deliberating",
];

/// Animation state of the streaming status
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spinner {
    verb: &'static str,
    tick: u64,
}

impl Spinner {
    /// Spinner for a new run, with a freshly drawn verb
    pub fn start() -> Self {
        Self::with_verb(VERBS[fastrand::usize(..VERBS.len())])
    }

    pub fn with_verb(verb: &'static str) -> Self {
        Self { verb, tick: 0 }
    }

    pub fn advance(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn verb(&self) -> &'static str {
        self.verb
    }

    pub fn frame(&self) -> &'static str {
        FRAMES[(self.tick % FRAMES.len() as u64) as usize]
    }
}

#[cfg(test)]
#[path = "spinner_tests.rs"]
mod tests;
