// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Read-only tools scoped to the working directory.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use ignore::WalkBuilder;
use regex::Regex;

use super::{ToolError, ToolExecutor, ToolRequest};

/// Output longer than this is truncated
pub const MAX_OUTPUT_BYTES: usize = 16 * 1024;
/// `search` stops after this many matching lines
pub const MAX_SEARCH_MATCHES: usize = 50;

/// `read_file`, `list_dir` and `search`
#[derive(Clone, Debug)]
pub struct BuiltinTools {
    root: PathBuf,
}

impl BuiltinTools {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` under the root.
    ///
    /// `..` and leading `/` components are dropped, so the result never
    /// leaves the root.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let normalized: PathBuf = Path::new(path)
            .components()
            .filter(|c| matches!(c, Component::Normal(_) | Component::CurDir))
            .collect();
        self.root.join(normalized)
    }

    async fn read_file(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let path = request.require_str("path")?;
        let resolved = self.resolve_path(path);
        let content = tokio::fs::read_to_string(&resolved)
            .await
            .map_err(|source| ToolError::Io {
                path: path.to_string(),
                source,
            })?;
        Ok(truncate(content))
    }

    async fn list_dir(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let path = request.str_param("path").unwrap_or(".");
        let io_err = |source| ToolError::Io {
            path: path.to_string(),
            source,
        };

        let mut dir = tokio::fs::read_dir(self.resolve_path(path))
            .await
            .map_err(io_err)?;
        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(io_err)? {
            let mut name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
                name.push('/');
            }
            names.push(name);
        }
        names.sort();
        Ok(truncate(names.join("\n")))
    }

    async fn search(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let pattern = request.require_str("pattern")?;
        let regex = Regex::new(pattern).map_err(|e| ToolError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        let start = self.resolve_path(request.str_param("path").unwrap_or("."));
        let glob = request
            .str_param("glob")
            .map(|g| {
                glob::Pattern::new(g).map_err(|e| ToolError::InvalidGlob {
                    pattern: g.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?;
        let root = self.root.clone();

        tokio::task::spawn_blocking(move || search_tree(&root, &start, &regex, glob.as_ref()))
            .await
            .map_err(|e| ToolError::Task(e.to_string()))
    }
}

fn search_tree(root: &Path, start: &Path, regex: &Regex, glob: Option<&glob::Pattern>) -> String {
    let mut matches = Vec::new();
    let walker = WalkBuilder::new(start)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    'files: for entry in walker.filter_map(Result::ok) {
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if let Some(glob) = glob {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !glob.matches(name) {
                continue;
            }
        }
        // Binary and unreadable files are skipped
        let Ok(content) = std::fs::read_to_string(path) else {
            continue;
        };
        let display = path.strip_prefix(root).unwrap_or(path);
        for (idx, line) in content.lines().enumerate() {
            if regex.is_match(line) {
                matches.push(format!("{}:{}: {}", display.display(), idx + 1, line.trim()));
                if matches.len() >= MAX_SEARCH_MATCHES {
                    break 'files;
                }
            }
        }
    }

    if matches.is_empty() {
        format!("No matches for '{}'", regex.as_str())
    } else {
        truncate(matches.join("\n"))
    }
}

fn truncate(mut text: String) -> String {
    if text.len() <= MAX_OUTPUT_BYTES {
        return text;
    }
    let mut end = MAX_OUTPUT_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
    text.push_str("\n[output truncated]");
    text
}

#[async_trait]
impl ToolExecutor for BuiltinTools {
    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        tracing::debug!(call_id = %request.call_id, tool = %request.name, "executing builtin tool");
        match request.name.as_str() {
            "read_file" => self.read_file(request).await,
            "list_dir" => self.list_dir(request).await,
            "search" => self.search(request).await,
            other => Err(ToolError::Unknown(other.to_string())),
        }
    }

    fn confirmation(&self, request: &ToolRequest) -> Option<String> {
        match request.name.as_str() {
            "read_file" => Some(format!(
                "Read file {}?",
                request.str_param("path").unwrap_or("?")
            )),
            "search" => Some(format!(
                "Search for '{}' in {}?",
                request.str_param("pattern").unwrap_or(""),
                request.str_param("path").unwrap_or(".")
            )),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "builtin"
    }
}

#[cfg(test)]
#[path = "builtin_tests.rs"]
mod tests;
