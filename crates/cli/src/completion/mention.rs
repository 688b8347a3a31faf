// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! File-path candidates for `@` mentions.

use std::cmp::Ordering;
use std::path::Path;

use ignore::WalkBuilder;

/// Directory levels walked by [`SuggestionIndex::scan`]
pub const SCAN_MAX_DEPTH: usize = 8;
/// Candidates kept by [`SuggestionIndex::scan`]
pub const SCAN_MAX_ENTRIES: usize = 5_000;

/// A ranked mention candidate
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MentionSuggestion {
    /// Relative path with `/` separators. Directories end in `/`.
    pub path: String,
    pub is_dir: bool,
}

/// Static list of relative paths ranked against a query.
#[derive(Clone, Debug, Default)]
pub struct SuggestionIndex {
    candidates: Vec<String>,
}

#[derive(Debug)]
struct Scored<'a> {
    path: &'a str,
    is_prefix: bool,
    score: i32,
}

impl SuggestionIndex {
    /// Build from explicit paths. Directory paths must end in `/`.
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    /// Walk `root`, honouring ignore files, and index what is found.
    pub fn scan(root: &Path) -> Self {
        let walker = WalkBuilder::new(root)
            .require_git(false)
            .max_depth(Some(SCAN_MAX_DEPTH))
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut candidates = Vec::new();
        for entry in walker.filter_map(Result::ok) {
            if entry.depth() == 0 {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let mut path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if entry.file_type().is_some_and(|t| t.is_dir()) {
                path.push('/');
            }
            candidates.push(path);
            if candidates.len() >= SCAN_MAX_ENTRIES {
                tracing::debug!(root = %root.display(), "mention index truncated");
                break;
            }
        }
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Rank candidates for `query`.
    ///
    /// Entries directly inside the query's directory are ranked by their
    /// base name first. Only when none match does the whole path get
    /// fuzzy-matched across every level.
    pub fn rank(&self, query: &str, limit: usize) -> Vec<MentionSuggestion> {
        let (dir, base) = match query.rfind('/') {
            Some(idx) => query.split_at(idx + 1),
            None => ("", query),
        };

        let mut scored: Vec<Scored<'_>> = self
            .candidates
            .iter()
            .filter_map(|path| {
                let rest = path.strip_prefix(dir)?;
                let name = rest.strip_suffix('/').unwrap_or(rest);
                if name.is_empty() || name.contains('/') {
                    return None;
                }
                let (is_prefix, score) = fuzzy_match_score(name, base)?;
                Some(Scored {
                    path,
                    is_prefix,
                    score,
                })
            })
            .collect();

        if scored.is_empty() && !query.is_empty() {
            scored = self
                .candidates
                .iter()
                .filter_map(|path| {
                    let (is_prefix, score) =
                        fuzzy_match_score(path.trim_end_matches('/'), query)?;
                    Some(Scored {
                        path,
                        is_prefix,
                        score,
                    })
                })
                .collect();
        }

        scored.sort_by(compare);
        scored
            .into_iter()
            .take(limit)
            .map(|s| MentionSuggestion {
                path: s.path.to_string(),
                is_dir: s.path.ends_with('/'),
            })
            .collect()
    }
}

fn compare(a: &Scored<'_>, b: &Scored<'_>) -> Ordering {
    b.is_prefix
        .cmp(&a.is_prefix)
        .then_with(|| b.score.cmp(&a.score))
        .then_with(|| a.path.cmp(b.path))
}

fn clamp_to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Score `candidate` against `query`, case-insensitively.
///
/// Returns whether the match is a prefix match, and a score where higher
/// is better. `None` means no match at all.
pub fn fuzzy_match_score(candidate: &str, query: &str) -> Option<(bool, i32)> {
    let query = query.trim();
    if query.is_empty() {
        return Some((true, 0));
    }

    let cand = candidate.to_lowercase();
    let query = query.to_lowercase();

    if cand.starts_with(&query) {
        let extra = clamp_to_i32(cand.len()).saturating_sub(clamp_to_i32(query.len()));
        return Some((true, 1_000 - extra));
    }

    if let Some(idx) = cand.find(&query) {
        return Some((false, 700 - clamp_to_i32(idx)));
    }

    // Subsequence match, penalised by the gaps between matched chars
    let mut score = 500i32;
    let mut from = 0usize;
    for q in query.chars() {
        let pos = cand[from..].find(q)?;
        score -= clamp_to_i32(pos);
        from += pos + q.len_utf8();
    }
    score -= clamp_to_i32(cand.len()) / 10;
    Some((false, score))
}

#[cfg(test)]
#[path = "mention_tests.rs"]
mod tests;
