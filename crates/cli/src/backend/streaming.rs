// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Pacing for simulated token streaming.

use std::time::Duration;

use crate::config::StreamingSettings;

/// How fast and in what sizes text is emitted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamingConfig {
    /// Chunks per second (0 = instant, single chunk)
    pub tokens_per_second: u32,

    /// Characters per chunk
    pub chunk_size: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self::from(&StreamingSettings::default())
    }
}

impl From<&StreamingSettings> for StreamingConfig {
    fn from(settings: &StreamingSettings) -> Self {
        Self {
            tokens_per_second: settings.tokens_per_second,
            chunk_size: settings.chunk_size.max(1),
        }
    }
}

impl StreamingConfig {
    /// No delays, whole text in one chunk
    pub fn instant() -> Self {
        Self {
            tokens_per_second: 0,
            chunk_size: usize::MAX,
        }
    }

    /// Delay before each chunk, or `None` when instant
    pub fn delay(&self) -> Option<Duration> {
        match self.tokens_per_second {
            0 => None,
            tps => Some(Duration::from_millis(1000 / u64::from(tps))),
        }
    }

    /// Split `text` into chunks of this config's size
    pub fn chunks(&self, text: &str) -> ChunkedText {
        let chunk_size = if self.tokens_per_second == 0 {
            usize::MAX
        } else {
            self.chunk_size.max(1)
        };
        ChunkedText {
            text: text.to_string(),
            position: 0,
            chunk_size,
        }
    }
}

/// Iterator over char-aligned chunks of a text
#[derive(Clone, Debug)]
pub struct ChunkedText {
    text: String,
    position: usize,
    chunk_size: usize,
}

impl Iterator for ChunkedText {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let rest = self.text.get(self.position..)?;
        if rest.is_empty() {
            return None;
        }
        let end = rest
            .char_indices()
            .nth(self.chunk_size)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let chunk = rest[..end].to_string();
        self.position += end;
        Some(chunk)
    }
}

#[cfg(test)]
#[path = "streaming_tests.rs"]
mod tests;
