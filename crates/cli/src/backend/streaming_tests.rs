// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

#[test]
fn instant_config_emits_one_chunk() {
    let chunks: Vec<_> = StreamingConfig::instant().chunks("Hello, world!").collect();
    assert_eq!(chunks, vec!["Hello, world!"]);
    assert!(StreamingConfig::instant().delay().is_none());
}

#[test]
fn chunks_respect_size() {
    let config = StreamingConfig {
        tokens_per_second: 100,
        chunk_size: 4,
    };
    let chunks: Vec<_> = config.chunks("Hello!").collect();
    assert_eq!(chunks, vec!["Hell", "o!"]);
    assert_eq!(config.delay(), Some(Duration::from_millis(10)));
}

#[test]
fn chunks_never_split_a_char() {
    let config = StreamingConfig {
        tokens_per_second: 10,
        chunk_size: 2,
    };
    let chunks: Vec<_> = config.chunks("héllo✓").collect();
    assert_eq!(chunks, vec!["hé", "ll", "o✓"]);
    assert_eq!(chunks.concat(), "héllo✓");
}

#[test]
fn empty_text_yields_nothing() {
    assert_eq!(StreamingConfig::default().chunks("").count(), 0);
}

#[test]
fn zero_chunk_size_is_clamped() {
    let settings = StreamingSettings {
        chunk_size: 0,
        ..StreamingSettings::default()
    };
    assert_eq!(StreamingConfig::from(&settings).chunk_size, 1);
}
