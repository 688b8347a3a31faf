// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]
use super::*;

#[test]
fn test_entry_serializes_as_single_line() {
    let entry = HistoryEntry::new(3, "explain\nthis diff");
    let json = serde_json::to_string(&entry).unwrap();
    assert!(!json.contains('\n'));

    let back: HistoryEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(back, entry);
}
