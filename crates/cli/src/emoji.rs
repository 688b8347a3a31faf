// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Emoji detection and stripping for model output, plus streaming word counts.

/// Whether `c` renders as (or is part of) an emoji sequence.
pub fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF      // pictographs, emoticons, transport, flags
            | 0x2600..=0x27BF  // misc symbols and dingbats
            | 0x2B50 | 0x2B55 | 0x2B1B | 0x2B1C
            | 0x200D           // zero-width joiner
            | 0xFE0F           // emoji presentation selector
            | 0x20E3 // keycap
    )
}

pub fn contains_emoji(text: &str) -> bool {
    text.chars().any(is_emoji)
}

/// Remove every emoji code point from `text`
pub fn strip_emoji(text: &str) -> String {
    text.chars().filter(|c| !is_emoji(*c)).collect()
}

/// Counts words across arbitrarily split text deltas.
///
/// A word split over two deltas is counted once.
#[derive(Clone, Debug, Default)]
pub struct WordCounter {
    in_word: bool,
    words: u64,
}

impl WordCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a delta; returns how many new words started in it.
    pub fn feed(&mut self, delta: &str) -> u64 {
        let mut started = 0;
        for c in delta.chars() {
            if c.is_whitespace() {
                self.in_word = false;
            } else if !self.in_word {
                self.in_word = true;
                started += 1;
            }
        }
        self.words += started;
        started
    }

    /// Mark a hard boundary, e.g. between two messages.
    pub fn break_word(&mut self) {
        self.in_word = false;
    }

    pub fn words(&self) -> u64 {
        self.words
    }
}

#[cfg(test)]
#[path = "emoji_tests.rs"]
mod tests;
